//! Conversion error types.

use thiserror::Error;

/// Errors raised while turning a record into BSON.
///
/// Paths are dotted, with array positions as segments (`tags.2.name`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// JSON integer beyond what BSON can store.
    #[error("Integer at '{path}' does not fit in a signed 64-bit value: {value}")]
    IntegerOverflow { path: String, value: String },

    /// BSON keys are C strings.
    #[error("Field name at '{path}' contains a NUL byte")]
    InvalidFieldName { path: String },

    /// Top-level name an update would read as a path or an operator.
    #[error("Field name '{0}' cannot be written by an upsert: it contains '.' or starts with '$'")]
    ReservedFieldName(String),

    /// A field needed to build a filter is absent from the record.
    #[error("Field '{0}' is missing from the record")]
    MissingField(String),
}
