use gridot_core::{compose, transform_x, Operation, Side};

use crate::error::SyncError;

/// Where a client stands relative to the server
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SyncState {
    /// Every local edit has been acknowledged
    #[default]
    Synchronized,
    /// One batch sent, waiting for the acknowledgement
    AwaitingAck { in_flight: Vec<Operation> },
    /// One batch sent and further local edits queued behind it
    AwaitingWithBuffer {
        in_flight: Vec<Operation>,
        buffer: Vec<Operation>,
    },
}

/// Tracks a single client's unacknowledged edits.
///
/// At most one batch is in flight at a time; edits made while waiting are composed
/// into a buffer. Local batches always take the `Left` side against server batches.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    /// Number of server batches this client has incorporated, its own included
    revision: u64,
    state: SyncState,
}

impl ClientState {
    pub fn new(revision: u64) -> Self {
        Self {
            revision,
            state: SyncState::Synchronized,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn state(&self) -> &SyncState {
        &self.state
    }

    pub fn is_synchronized(&self) -> bool {
        self.state == SyncState::Synchronized
    }

    /// The batch the server has not acknowledged yet
    pub fn in_flight(&self) -> Option<&[Operation]> {
        match &self.state {
            SyncState::Synchronized => None,
            SyncState::AwaitingAck { in_flight } | SyncState::AwaitingWithBuffer { in_flight, .. } => {
                Some(in_flight.as_slice())
            }
        }
    }

    /// Local edits not sent yet
    pub fn buffer(&self) -> Option<&[Operation]> {
        match &self.state {
            SyncState::AwaitingWithBuffer { buffer, .. } => Some(buffer.as_slice()),
            _ => None,
        }
    }

    /// Record a batch the user just applied locally.
    ///
    /// Returns the batch to send to the server, or `None` when it was queued behind the
    /// batch already in flight.
    pub fn apply_local(&mut self, ops: Vec<Operation>) -> Option<Vec<Operation>> {
        let (state, outgoing) = match std::mem::take(&mut self.state) {
            SyncState::Synchronized => (
                SyncState::AwaitingAck {
                    in_flight: ops.clone(),
                },
                Some(ops),
            ),
            SyncState::AwaitingAck { in_flight } => (
                SyncState::AwaitingWithBuffer {
                    in_flight,
                    buffer: ops,
                },
                None,
            ),
            SyncState::AwaitingWithBuffer { in_flight, buffer } => (
                SyncState::AwaitingWithBuffer {
                    in_flight,
                    buffer: compose(&buffer, &ops),
                },
                None,
            ),
        };

        self.state = state;
        outgoing
    }

    /// Incorporate a batch from another client, as ordered by the server.
    ///
    /// Returns the version of `ops` to apply to the local document, which already
    /// reflects the pending local edits.
    pub fn apply_server(&mut self, ops: &[Operation]) -> Vec<Operation> {
        self.revision += 1;
        tracing::debug!(revision = self.revision, ops = ops.len(), "applying server batch");

        let (state, incoming) = match std::mem::take(&mut self.state) {
            SyncState::Synchronized => (SyncState::Synchronized, ops.to_vec()),
            SyncState::AwaitingAck { in_flight } => {
                let (in_flight, incoming) = transform_x(&in_flight, ops, Side::Left);
                (SyncState::AwaitingAck { in_flight }, incoming)
            }
            SyncState::AwaitingWithBuffer { in_flight, buffer } => {
                let (in_flight, incoming) = transform_x(&in_flight, ops, Side::Left);
                let (buffer, incoming) = transform_x(&buffer, &incoming, Side::Left);
                (SyncState::AwaitingWithBuffer { in_flight, buffer }, incoming)
            }
        };

        self.state = state;
        incoming
    }

    /// The server accepted the in-flight batch.
    ///
    /// Returns the buffered batch, now promoted to in flight, if there is one to send.
    pub fn server_ack(&mut self) -> Result<Option<Vec<Operation>>, SyncError> {
        let (state, outgoing) = match std::mem::take(&mut self.state) {
            SyncState::Synchronized => return Err(SyncError::NothingInFlight(self.revision)),
            SyncState::AwaitingAck { .. } => (SyncState::Synchronized, None),
            SyncState::AwaitingWithBuffer { buffer, .. } => (
                SyncState::AwaitingAck {
                    in_flight: buffer.clone(),
                },
                Some(buffer),
            ),
        };

        self.revision += 1;
        self.state = state;
        tracing::debug!(
            revision = self.revision,
            pending = outgoing.is_some(),
            "server acknowledged batch"
        );
        Ok(outgoing)
    }
}
