use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealSettings {
    pub visible_class: String,
    /// Fraction of the section's area that must be in the viewport
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            visible_class: "is-visible".to_string(),
            threshold: 0.1,
            root_margin: "0px".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    /// Terminal; a revealed section is never hidden or watched again
    Revealed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(pub usize);

/// One entry from an intersection batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionSample {
    pub section: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// Slack below the threshold still accepted; browsers report ratios
/// computed from rounded pixel boxes, e.g. 0.0999 for a 10% crossing
const RATIO_TOLERANCE: f64 = 0.001;

/// Tracks the one-shot reveal of every registered section.
#[derive(Debug)]
pub struct RevealTracker {
    threshold: f64,
    states: Vec<RevealState>,
}

impl RevealTracker {
    /// `threshold` is the visible fraction a section needs before it is revealed
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            states: Vec::new(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn register(&mut self) -> SectionId {
        self.states.push(RevealState::Pending);
        SectionId(self.states.len() - 1)
    }

    pub fn state(&self, id: SectionId) -> Option<RevealState> {
        self.states.get(id.0).copied()
    }

    pub fn pending(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == RevealState::Pending)
            .count()
    }

    /// Every section has been revealed; the observer has nothing left to watch
    pub fn is_settled(&self) -> bool {
        self.pending() == 0
    }

    /// Apply a batch of samples and return the sections revealed by it, in delivery order.
    ///
    /// A sample reveals its section when it is intersecting by at least the
    /// threshold. Samples for unknown or already revealed sections are
    /// ignored, so a repeated delivery never reveals the same section twice.
    pub fn process<I>(&mut self, batch: I) -> Vec<SectionId>
    where
        I: IntoIterator<Item = IntersectionSample>,
    {
        let mut revealed = Vec::new();
        for sample in batch {
            if !self.is_visible_enough(&sample) {
                continue;
            }
            if let Some(state) = self.states.get_mut(sample.section.0)
                && *state == RevealState::Pending
            {
                *state = RevealState::Revealed;
                revealed.push(sample.section);
            }
        }
        revealed
    }

    fn is_visible_enough(&self, sample: &IntersectionSample) -> bool {
        sample.is_intersecting && sample.ratio + RATIO_TOLERANCE >= self.threshold
    }
}
