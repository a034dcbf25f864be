//! Errors raised while assembling the console at startup.
//!
//! Construction failures are fatal: they indicate a host configuration bug
//! and abort before the first operator line is read. Per-object failures that
//! occur while dispatching live in [`crate::property`].

use thiserror::Error;

/// Errors raised while building the command table or registering objects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// A command token is claimed by more than one property, event or stop
    /// spec.
    #[error("command token '{token}' is bound more than once")]
    DuplicateCommandToken {
        /// Token that collided.
        token: String,
    },

    /// A spec omitted a required field.
    #[error("{spec} is missing required field '{field}'")]
    MissingRequiredSpecField {
        /// Identifier of the offending spec, or a positional description
        /// when the identifier itself is missing.
        spec: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A spec lists an empty or whitespace-only command token.
    #[error("{spec} lists a blank command token")]
    BlankCommandToken {
        /// Identifier of the offending spec.
        spec: String,
    },

    /// Two property specs or two event specs share an identifier.
    #[error("identifier '{identifier}' is declared more than once")]
    DuplicateIdentifier {
        /// Identifier that was repeated.
        identifier: String,
    },

    /// More than one event spec is marked as the stop event.
    #[error("only one stop event may be declared (found '{first}' and '{second}')")]
    MultipleStopEvents {
        /// Identifier of the first stop spec.
        first: String,
        /// Identifier of the second stop spec.
        second: String,
    },

    /// Two managed objects share a name.
    #[error("managed object '{name}' is registered more than once")]
    DuplicateObjectName {
        /// Name that was repeated.
        name: String,
    },
}

impl ConstructionError {
    /// Creates a duplicate token error.
    pub fn duplicate_token(token: impl Into<String>) -> Self {
        Self::DuplicateCommandToken {
            token: token.into(),
        }
    }

    /// Creates a missing field error.
    pub fn missing_field(spec: impl Into<String>, field: &'static str) -> Self {
        Self::MissingRequiredSpecField {
            spec: spec.into(),
            field,
        }
    }

    /// Creates a blank token error.
    pub fn blank_token(spec: impl Into<String>) -> Self {
        Self::BlankCommandToken { spec: spec.into() }
    }

    /// Creates a duplicate identifier error.
    pub fn duplicate_identifier(identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Creates a duplicate object name error.
    pub fn duplicate_object(name: impl Into<String>) -> Self {
        Self::DuplicateObjectName { name: name.into() }
    }
}
