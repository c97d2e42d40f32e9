use gridot_codec::{deserialize_edit_with, CodecOptions};
use gridot_core::Operation;
use serde_json::Value;

use crate::config::Config;
use crate::engine::{DocumentEngine, Snapshot};
use crate::error::BridgeError;
use crate::records::hydrate_all;

/// Feeds operation batches into a document engine.
///
/// The bridge owns its engine handle; `&mut self` on every call keeps two callers from
/// interleaving load and execute steps on the same document.
#[derive(Debug)]
pub struct Bridge<E> {
    engine: E,
    options: CodecOptions,
}

impl<E: DocumentEngine> Bridge<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            options: CodecOptions::default(),
        }
    }

    pub fn with_config(engine: E, config: &Config) -> Self {
        Self {
            engine,
            options: config.codec_options(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_inner(self) -> E {
        self.engine
    }

    /// A snapshot of an empty document
    pub fn create(&mut self) -> Result<Snapshot, BridgeError> {
        self.engine.reset();
        self.engine.export().map_err(BridgeError::Export)
    }

    /// Load `snapshot`, run every effective operation of `ops` in order and export the result.
    ///
    /// Stops at the first command the engine rejects. Commands that already ran are not
    /// rolled back inside the engine, but the caller only ever sees the error.
    pub fn apply(&mut self, snapshot: &Snapshot, ops: &[Operation]) -> Result<Snapshot, BridgeError> {
        self.engine.load(snapshot).map_err(BridgeError::Load)?;

        let commands = ops
            .iter()
            .enumerate()
            .map(|(index, op)| (index, op.to_command()))
            .filter(|(_, command)| !command.is_empty());

        for (index, command) in commands {
            tracing::debug!(index, command = %command, "executing command");
            if let Err(source) = self.engine.execute(&command) {
                tracing::warn!(index, command = %command, error = %source, "engine rejected command");
                return Err(BridgeError::Execution {
                    index,
                    command,
                    source,
                });
            }
        }

        self.engine.export().map_err(BridgeError::Export)
    }

    /// [`Bridge::apply`] for operations held as structured records
    pub fn apply_records(
        &mut self,
        snapshot: &Snapshot,
        records: &[Value],
    ) -> Result<Snapshot, BridgeError> {
        let ops = hydrate_all(records)?;
        self.apply(snapshot, &ops)
    }

    /// [`Bridge::apply`] for a newline-separated command stream
    pub fn apply_edit(&mut self, snapshot: &Snapshot, edit: &str) -> Result<Snapshot, BridgeError> {
        let ops = deserialize_edit_with(edit, &self.options)?;
        self.apply(snapshot, &ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use gridot_core::{DeleteRow, InsertRow, Set};

    /// Records every command and fails on the ones it was told to reject
    #[derive(Debug, Default)]
    struct RecordingEngine {
        loaded: Option<Snapshot>,
        executed: Vec<String>,
        reject: Option<String>,
    }

    impl DocumentEngine for RecordingEngine {
        fn reset(&mut self) {
            self.loaded = None;
            self.executed.clear();
        }

        fn load(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
            self.loaded = Some(snapshot.clone());
            self.executed.clear();
            Ok(())
        }

        fn execute(&mut self, command: &str) -> Result<(), EngineError> {
            if self.reject.as_deref() == Some(command) {
                return Err(EngineError::new("rejected"));
            }
            self.executed.push(command.to_string());
            Ok(())
        }

        fn export(&self) -> Result<Snapshot, EngineError> {
            Ok(Snapshot::new(self.executed.join(";")))
        }
    }

    fn ops() -> Vec<Operation> {
        vec![
            Set::on("A1", "value", "1").unwrap().into(),
            DeleteRow::tombstone().into(),
            InsertRow::new("A2".parse().unwrap()).into(),
        ]
    }

    #[test]
    fn test_apply_skips_tombstones() {
        let mut bridge = Bridge::new(RecordingEngine::default());
        let snapshot = bridge.apply(&Snapshot::new("base"), &ops()).unwrap();

        assert_eq!(snapshot.as_str(), "set A1 value 1;insertrow A2");
        assert_eq!(bridge.engine().loaded, Some(Snapshot::new("base")));
    }

    #[test]
    fn test_apply_fails_fast() {
        let engine = RecordingEngine {
            reject: Some("set A1 value 1".to_string()),
            ..Default::default()
        };
        let mut bridge = Bridge::new(engine);

        let err = bridge.apply(&Snapshot::new("base"), &ops()).unwrap_err();
        match err {
            BridgeError::Execution { index, command, .. } => {
                assert_eq!(index, 0);
                assert_eq!(command, "set A1 value 1");
            }
            other => panic!("Expected execution error, got {:?}", other),
        }
        assert!(bridge.engine().executed.is_empty());
    }

    #[test]
    fn test_execution_error_reports_batch_position() {
        let engine = RecordingEngine {
            reject: Some("insertrow A2".to_string()),
            ..Default::default()
        };
        let mut bridge = Bridge::new(engine);

        let err = bridge.apply(&Snapshot::new("base"), &ops()).unwrap_err();
        assert!(matches!(err, BridgeError::Execution { index: 2, .. }));
        assert_eq!(bridge.into_inner().executed, ["set A1 value 1"]);
    }

    #[test]
    fn test_apply_edit_uses_configured_limits() {
        let config = Config {
            max_range_cells: 2,
            ..Config::default()
        };
        let mut bridge = Bridge::with_config(RecordingEngine::default(), &config);

        let err = bridge
            .apply_edit(&Snapshot::new("base"), "set A1:A3 value 0")
            .unwrap_err();
        assert!(matches!(err, BridgeError::Codec(_)));

        let snapshot = bridge
            .apply_edit(&Snapshot::new("base"), "set A1:A2 value 0\nredisplay")
            .unwrap();
        assert_eq!(snapshot.as_str(), "set A1 value 0;set A2 value 0");
    }
}
