//! Per-object failures reported while reading or writing properties.
//!
//! None of these are fatal. The dispatcher records them against the object
//! that produced them and carries on with the next object.

use thiserror::Error;

/// The named object or property is not reachable.
///
/// This points at a host wiring mistake rather than operator input, so it is
/// kept apart from [`ConversionError`] when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No managed object carries the given name.
    #[error("unknown object '{object}'")]
    UnknownObject {
        /// Requested object name.
        object: String,
    },

    /// The object has no binding for the property.
    #[error("object '{object}' does not expose property '{property}'")]
    UnknownProperty {
        /// Object name.
        object: String,
        /// Requested property identifier.
        property: String,
    },
}

/// Operator-supplied text could not be converted to the property's type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' not a valid {label} ({property}): {reason}")]
pub struct ConversionError {
    /// Raw value text as typed.
    pub value: String,
    /// Display label of the property.
    pub label: String,
    /// Property identifier.
    pub property: String,
    /// Converter's explanation.
    pub reason: String,
}

/// The object refused a converted value; its previous value is retained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{object} rejected {label} '{value}': {reason}")]
pub struct AssignmentError {
    /// Object name.
    pub object: String,
    /// Display label of the property.
    pub label: String,
    /// Raw value text as typed.
    pub value: String,
    /// Setter's explanation.
    pub reason: String,
}

/// Any failure of a single property read or write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// Object or property lookup failed.
    #[error(transparent)]
    Access(#[from] AccessError),
    /// Value text failed conversion.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    /// The object rejected the converted value.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
}
