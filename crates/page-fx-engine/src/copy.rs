use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CopyError {
    #[error("Could not find code block to copy")]
    MissingTarget,
    #[error("Failed to copy text: {0}")]
    ClipboardWrite(String),
}

/// What happens when a trigger is clicked while its "copied" feedback is still showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevertPolicy {
    /// Copy again and restart the revert countdown; only the latest click can revert
    #[default]
    Restart,
    /// Ignore clicks until the pending revert has fired
    IgnoreWhilePending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopySettings {
    pub idle_label: String,
    pub copied_label: String,
    pub marker_class: String,
    pub revert_delay_ms: u64,
    pub revert_policy: RevertPolicy,
}

impl Default for CopySettings {
    fn default() -> Self {
        Self {
            idle_label: "Copy".to_string(),
            copied_label: "Copied!".to_string(),
            marker_class: "copied".to_string(),
            revert_delay_ms: 2000,
            revert_policy: RevertPolicy::Restart,
        }
    }
}

impl CopySettings {
    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }
}

/// How a trigger names the element whose text it copies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    /// Element with this id anywhere in the document
    Id(String),
    /// The element immediately before the trigger
    PrecedingSibling,
}

impl TargetRef {
    /// Build from the trigger's target attribute; blank or absent falls back to the sibling
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(id) if !id.is_empty() => TargetRef::Id(id.trim_start_matches('#').to_string()),
            _ => TargetRef::PrecedingSibling,
        }
    }
}

/// Identifies one scheduled revert. Only the most recently issued ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RevertTicket(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied { ticket: RevertTicket },
}

/// A change the host must apply to the trigger element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyEffect {
    SetLabel(String),
    AddClass(String),
    RemoveClass(String),
    /// Run `revert(ticket)` after `after`; replaces any previously scheduled revert
    ScheduleRevert {
        ticket: RevertTicket,
        after: Duration,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Write this text to the clipboard, then report back
    Write(String),
    Ignored,
}

/// Per-trigger copy feedback state machine.
///
/// ```rust
/// # use page_fx_engine::copy::*;
/// let mut button = CopyButton::new(CopySettings::default());
/// let outcome = button.click(Some("cargo build".to_string())).unwrap();
/// assert_eq!(outcome, ClickOutcome::Write("cargo build".to_string()));
///
/// let effects = button.write_succeeded();
/// assert_eq!(effects[0], CopyEffect::SetLabel("Copied!".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct CopyButton {
    settings: CopySettings,
    state: CopyState,
    next_ticket: u64,
}

impl CopyButton {
    pub fn new(settings: CopySettings) -> Self {
        Self {
            settings,
            state: CopyState::Idle,
            next_ticket: 0,
        }
    }

    pub fn state(&self) -> CopyState {
        self.state
    }

    pub fn is_revert_pending(&self) -> bool {
        matches!(self.state, CopyState::Copied { .. })
    }

    /// Handle a click. `target_text` is the full text of the resolved target, if any.
    pub fn click(&mut self, target_text: Option<String>) -> Result<ClickOutcome, CopyError> {
        let text = target_text.ok_or(CopyError::MissingTarget)?;

        if self.settings.revert_policy == RevertPolicy::IgnoreWhilePending
            && self.is_revert_pending()
        {
            return Ok(ClickOutcome::Ignored);
        }

        Ok(ClickOutcome::Write(text))
    }

    /// The clipboard accepted the text
    pub fn write_succeeded(&mut self) -> Vec<CopyEffect> {
        self.next_ticket += 1;
        let ticket = RevertTicket(self.next_ticket);
        self.state = CopyState::Copied { ticket };

        vec![
            CopyEffect::SetLabel(self.settings.copied_label.clone()),
            CopyEffect::AddClass(self.settings.marker_class.clone()),
            CopyEffect::ScheduleRevert {
                ticket,
                after: self.settings.revert_delay(),
            },
        ]
    }

    /// The clipboard rejected the text. Label and state are left as they were.
    pub fn write_failed(&self, reason: impl Into<String>) -> CopyError {
        CopyError::ClipboardWrite(reason.into())
    }

    /// A scheduled revert fired. Stale tickets produce no effects.
    pub fn revert(&mut self, ticket: RevertTicket) -> Vec<CopyEffect> {
        match self.state {
            CopyState::Copied { ticket: current } if current == ticket => {
                self.state = CopyState::Idle;
                vec![
                    CopyEffect::SetLabel(self.settings.idle_label.clone()),
                    CopyEffect::RemoveClass(self.settings.marker_class.clone()),
                ]
            }
            _ => Vec::new(),
        }
    }
}
