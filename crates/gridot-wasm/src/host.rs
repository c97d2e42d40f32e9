//! The document engine supplied by the JavaScript host.

use gridot_bridge::{DocumentEngine, EngineError, Snapshot};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[wasm_bindgen]
extern "C" {
    /// Any JS object with `reset()`, `load(snapshot)`, `execute(command)` and `export()`
    pub type JsDocumentEngine;

    #[wasm_bindgen(method, catch)]
    fn reset(this: &JsDocumentEngine) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn load(this: &JsDocumentEngine, snapshot: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn execute(this: &JsDocumentEngine, command: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = "export")]
    fn export_snapshot(this: &JsDocumentEngine) -> Result<String, JsValue>;
}

fn host_error(err: JsValue) -> EngineError {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return EngineError::new(String::from(error.message()));
    }
    EngineError::new(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

pub(crate) struct HostEngine(JsDocumentEngine);

impl HostEngine {
    pub(crate) fn new(engine: JsDocumentEngine) -> Self {
        Self(engine)
    }
}

impl DocumentEngine for HostEngine {
    fn reset(&mut self) {
        if let Err(err) = self.0.reset() {
            web_sys::console::warn_2(&JsValue::from_str("document engine reset failed:"), &err);
        }
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        self.0.load(snapshot.as_str()).map_err(host_error)
    }

    fn execute(&mut self, command: &str) -> Result<(), EngineError> {
        self.0.execute(command).map_err(host_error)
    }

    fn export(&self) -> Result<Snapshot, EngineError> {
        self.0.export_snapshot().map(Snapshot::new).map_err(host_error)
    }
}
