use gridot_core::{AddressError, FieldError};
use thiserror::Error;

/// Errors raised while decoding a recognized command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    #[error("Invalid field: {0}")]
    Field(#[from] FieldError),

    #[error("Malformed {keyword} command: {line}")]
    Malformed { keyword: &'static str, line: String },

    #[error("Range {range} spans {count} entries, limit is {limit}")]
    RangeTooLarge { range: String, count: u64, limit: u64 },
}
