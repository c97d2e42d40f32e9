pub mod client;
pub mod error;

pub use client::{ClientState, SyncState};
pub use error::SyncError;
