use thiserror::Error;

/// A cell, row or column token that cannot be turned into a position
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid cell id: {0}")]
    InvalidCell(String),

    #[error("invalid column: {0}")]
    InvalidColumn(String),

    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// Empty, or carrying whitespace that would split the command line
    #[error("invalid target: {0:?}")]
    InvalidTarget(String),

    #[error("not a range: {0}")]
    NotARange(String),

    /// Range targets are expanded by the codec into one operation per cell
    #[error("range target must be expanded before use: {0}")]
    UnexpandedRange(String),
}

/// A `set` field that cannot be written as one command line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid attribute: {0:?}")]
    InvalidAttribute(String),

    #[error("value spans more than one line: {0:?}")]
    MultilineValue(String),

    /// The target does not print back as the same target
    #[error("target is not a command token: {0:?}")]
    InvalidTarget(String),
}

/// Errors raised when operations cross the record boundary
#[derive(Error, Debug)]
pub enum OtError {
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),

    #[error("Unknown operation type: {0}")]
    UnknownType(String),

    #[error("Malformed operation record: {0}")]
    Record(#[from] serde_json::Error),
}
