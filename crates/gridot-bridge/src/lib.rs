//! Connects gridot operations to a spreadsheet document engine.
//!
//! [`Bridge`] owns a [`DocumentEngine`] and turns snapshots plus operation
//! batches into new snapshots. [`records`] exposes the transform, compose and
//! edit codec functions over structured JSON records.

pub mod bridge;
pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod records;
pub mod telemetry;

pub use bridge::Bridge;
pub use config::Config;
pub use engine::{DocumentEngine, Snapshot};
pub use error::{BridgeError, EngineError};
pub use memory::MemoryEngine;
pub use telemetry::init_tracing;
