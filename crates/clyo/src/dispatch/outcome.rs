//! Structured results produced for every dispatched line.

use crate::property::{PropertyError, ValueChange};

/// How a line was classified and acted upon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Current values were read from every object.
    Inquired {
        /// Property identifier.
        property: String,
        /// Display label of the property.
        label: String,
    },
    /// One value was applied to every object.
    BulkSet {
        /// Property identifier.
        property: String,
        /// Display label of the property.
        label: String,
        /// Raw value text.
        value: String,
    },
    /// One value was applied to a single object.
    TargetedSet {
        /// Property identifier.
        property: String,
        /// Display label of the property.
        label: String,
        /// Targeted object name.
        object: String,
        /// Raw value text.
        value: String,
    },
    /// An event signal was set.
    EventTriggered {
        /// Event identifier.
        event: String,
    },
    /// Stop hooks ran and the stop signal was set.
    Stopped,
    /// Nothing matched; no state changed.
    Unrecognized {
        /// The trimmed input line.
        line: String,
    },
}

/// Result of reading or writing one object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetStatus {
    /// The current value was read.
    Read {
        /// Rendered value.
        value: String,
    },
    /// The value was replaced.
    Updated(ValueChange),
    /// The read or write failed; the object's value is unchanged.
    Failed(PropertyError),
}

/// Per-object entry of a [`DispatchResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    /// Object name.
    pub object: String,
    /// What happened to the object.
    pub status: TargetStatus,
}

impl TargetOutcome {
    pub(crate) fn new(object: impl Into<String>, status: TargetStatus) -> Self {
        Self {
            object: object.into(),
            status,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&PropertyError> {
        match &self.status {
            TargetStatus::Failed(error) => Some(error),
            TargetStatus::Read { .. } | TargetStatus::Updated(_) => None,
        }
    }
}

/// Everything that happened while dispatching one line.
///
/// `targets` lists one entry per object touched, in registration order. It is
/// empty for events, stops and unrecognised lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    /// Classification of the line.
    pub outcome: Outcome,
    /// Per-object results.
    pub targets: Vec<TargetOutcome>,
}

impl DispatchResult {
    pub(crate) const fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            targets: Vec::new(),
        }
    }

    pub(crate) fn with_targets(outcome: Outcome, targets: Vec<TargetOutcome>) -> Self {
        Self { outcome, targets }
    }

    /// Returns `true` when the line stopped the console.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        matches!(self.outcome, Outcome::Stopped)
    }

    /// Returns `true` when no object reported a failure.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.targets.iter().all(|target| target.error().is_none())
    }

    /// Returns the entry for `object`, if it was touched.
    #[must_use]
    pub fn target(&self, object: &str) -> Option<&TargetOutcome> {
        self.targets.iter().find(|target| target.object == object)
    }
}
