use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("Acknowledgement received with no batch in flight (revision {0})")]
    NothingInFlight(u64),
}
