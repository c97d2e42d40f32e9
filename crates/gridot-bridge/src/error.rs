use gridot_codec::CodecError;
use gridot_core::OtError;
use thiserror::Error;

/// A failure reported by the document engine itself
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct EngineError(pub String);

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Bridge error type
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to load snapshot: {0}")]
    Load(#[source] EngineError),

    /// `index` is the position of the failing operation in the batch
    #[error("Command {index} failed ({command}): {source}")]
    Execution {
        index: usize,
        command: String,
        source: EngineError,
    },

    #[error("Failed to export snapshot: {0}")]
    Export(#[source] EngineError),

    #[error("Operation error: {0}")]
    Operation(#[from] OtError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),
}
