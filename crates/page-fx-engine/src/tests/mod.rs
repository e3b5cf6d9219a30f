//! Test helpers: a simulated page host for the engine cores.

use crate::copy::{ClickOutcome, CopyButton, CopyEffect, CopyError, CopySettings, RevertTicket};

/// A copy trigger driven by a virtual clock.
///
/// Mirrors how the web binding interprets effects: one revert timer slot per
/// trigger, and scheduling a new revert replaces (cancels) the old one.
pub struct SimTrigger {
    pub button: CopyButton,
    pub target: Option<String>,
    pub label: String,
    pub classes: Vec<String>,
    pub clipboard: Option<String>,
    pub errors: Vec<CopyError>,
    now_ms: u64,
    timer: Option<(u64, RevertTicket)>,
}

impl SimTrigger {
    pub fn new(settings: CopySettings, target: Option<&str>) -> Self {
        Self {
            label: settings.idle_label.clone(),
            button: CopyButton::new(settings),
            target: target.map(str::to_string),
            classes: Vec::new(),
            clipboard: None,
            errors: Vec::new(),
            now_ms: 0,
            timer: None,
        }
    }

    /// Click with a clipboard that accepts the write
    pub fn click_and_grant(&mut self) {
        match self.button.click(self.target.clone()) {
            Err(e) => self.errors.push(e),
            Ok(ClickOutcome::Ignored) => {}
            Ok(ClickOutcome::Write(text)) => {
                self.clipboard = Some(text);
                let effects = self.button.write_succeeded();
                self.apply(effects);
            }
        }
    }

    /// Click with a clipboard that rejects the write
    pub fn click_and_deny(&mut self, reason: &str) {
        match self.button.click(self.target.clone()) {
            Err(e) => self.errors.push(e),
            Ok(ClickOutcome::Ignored) => {}
            Ok(ClickOutcome::Write(_)) => {
                let error = self.button.write_failed(reason);
                self.errors.push(error);
            }
        }
    }

    pub fn advance_ms(&mut self, ms: u64) {
        self.now_ms += ms;
        if let Some((due, ticket)) = self.timer
            && due <= self.now_ms
        {
            self.timer = None;
            let effects = self.button.revert(ticket);
            self.apply(effects);
        }
    }

    pub fn pending_timers(&self) -> usize {
        usize::from(self.timer.is_some())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn apply(&mut self, effects: Vec<CopyEffect>) {
        for effect in effects {
            match effect {
                CopyEffect::SetLabel(label) => self.label = label,
                CopyEffect::AddClass(class) => {
                    if !self.has_class(&class) {
                        self.classes.push(class);
                    }
                }
                CopyEffect::RemoveClass(class) => self.classes.retain(|c| *c != class),
                CopyEffect::ScheduleRevert { ticket, after } => {
                    let due = self.now_ms + after.as_millis() as u64;
                    self.timer = Some((due, ticket));
                }
            }
        }
    }
}
