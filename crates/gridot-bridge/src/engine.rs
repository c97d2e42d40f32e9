use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

/// A fully serialized document state, opaque to this crate
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Snapshot {
    fn from(data: String) -> Self {
        Self(data)
    }
}

/// The spreadsheet engine that owns the real document.
///
/// An engine holds one mutable document. Loading a snapshot and running
/// commands are separate steps with no atomicity, so a handle must not be shared
/// between concurrent callers.
pub trait DocumentEngine {
    /// Replace the current document with an empty one
    fn reset(&mut self);

    /// Replace the current document with a previously exported snapshot
    fn load(&mut self, snapshot: &Snapshot) -> Result<(), EngineError>;

    /// Run a single textual command against the current document
    fn execute(&mut self, command: &str) -> Result<(), EngineError>;

    /// Serialize the current document
    fn export(&self) -> Result<Snapshot, EngineError>;
}

impl<E: DocumentEngine + ?Sized> DocumentEngine for Box<E> {
    fn reset(&mut self) {
        (**self).reset()
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        (**self).load(snapshot)
    }

    fn execute(&mut self, command: &str) -> Result<(), EngineError> {
        (**self).execute(command)
    }

    fn export(&self) -> Result<Snapshot, EngineError> {
        (**self).export()
    }
}
