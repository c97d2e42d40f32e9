use gridot_bridge::{records, Bridge, BridgeError, Snapshot};
use gridot_codec::CodecError;
use gridot_core::{OtError, Side};
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::host::{HostEngine, JsDocumentEngine};

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsOtError {
    code: String,
    message: String,
}

impl JsOtError {
    fn from_error<E: std::fmt::Display>(code: &str, err: E) -> JsValue {
        let error = Self {
            code: code.to_string(),
            message: err.to_string(),
        };
        serde_wasm_bindgen::to_value(&error).unwrap_or(JsValue::NULL)
    }
}

fn ot_error_code(err: &OtError) -> &'static str {
    match err {
        OtError::Address(_) => "ADDRESS_ERROR",
        OtError::Field(_) => "INVALID_FIELD",
        OtError::UnknownType(_) => "UNKNOWN_TYPE",
        OtError::Record(_) => "MALFORMED_RECORD",
    }
}

fn codec_error_code(err: &CodecError) -> &'static str {
    match err {
        CodecError::Address(_) => "ADDRESS_ERROR",
        CodecError::Field(_) => "INVALID_FIELD",
        CodecError::Malformed { .. } => "MALFORMED_COMMAND",
        CodecError::RangeTooLarge { .. } => "RANGE_TOO_LARGE",
    }
}

fn bridge_error_code(err: &BridgeError) -> &'static str {
    match err {
        BridgeError::Load(_) => "LOAD_FAILED",
        BridgeError::Execution { .. } => "EXECUTION_ERROR",
        BridgeError::Export(_) => "EXPORT_FAILED",
        BridgeError::Operation(err) => ot_error_code(err),
        BridgeError::Codec(err) => codec_error_code(err),
    }
}

fn ot_error(err: OtError) -> JsValue {
    JsOtError::from_error(ot_error_code(&err), err)
}

fn codec_error(err: CodecError) -> JsValue {
    JsOtError::from_error(codec_error_code(&err), err)
}

fn bridge_error(err: BridgeError) -> JsValue {
    JsOtError::from_error(bridge_error_code(&err), err)
}

fn parse_side(side: &str) -> Result<Side, String> {
    side.parse()
}

fn records_from_js(ops: JsValue) -> Result<Vec<Value>, JsValue> {
    serde_wasm_bindgen::from_value(ops).map_err(|e| JsOtError::from_error("INVALID_RECORDS", e))
}

fn records_to_js(records: &[Value]) -> Result<JsValue, JsValue> {
    // json_compatible keeps records as plain objects rather than `Map`s
    records
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsOtError::from_error("SERIALIZATION_ERROR", e))
}

/// Transform `ops1` so it applies after the concurrent batch `ops2`.
/// `side` is `"left"` or `"right"`.
#[wasm_bindgen]
pub fn transform(ops1: JsValue, ops2: JsValue, side: &str) -> Result<JsValue, JsValue> {
    let side = parse_side(side).map_err(|e| JsOtError::from_error("INVALID_SIDE", e))?;
    let ops1 = records_from_js(ops1)?;
    let ops2 = records_from_js(ops2)?;

    let transformed = records::transform(&ops1, &ops2, side).map_err(ot_error)?;
    records_to_js(&transformed)
}

#[wasm_bindgen]
pub fn compose(ops1: JsValue, ops2: JsValue) -> Result<JsValue, JsValue> {
    let ops1 = records_from_js(ops1)?;
    let ops2 = records_from_js(ops2)?;

    let composed = records::compose(&ops1, &ops2).map_err(ot_error)?;
    records_to_js(&composed)
}

#[wasm_bindgen(js_name = serializeEdit)]
pub fn serialize_edit(ops: JsValue) -> Result<String, JsValue> {
    let ops = records_from_js(ops)?;
    records::serialize_edit(&ops).map_err(ot_error)
}

#[wasm_bindgen(js_name = deserializeEdit)]
pub fn deserialize_edit(text: &str) -> Result<JsValue, JsValue> {
    let records = records::deserialize_edit(text).map_err(codec_error)?;
    records_to_js(&records)
}

/// Applies operation batches to a host-provided document engine
#[wasm_bindgen]
pub struct OtBridge {
    bridge: Bridge<HostEngine>,
}

#[wasm_bindgen]
impl OtBridge {
    #[wasm_bindgen(constructor)]
    pub fn new(engine: JsDocumentEngine) -> Self {
        Self {
            bridge: Bridge::new(HostEngine::new(engine)),
        }
    }

    /// Snapshot of an empty document
    pub fn create(&mut self) -> Result<String, JsValue> {
        self.bridge
            .create()
            .map(Snapshot::into_inner)
            .map_err(bridge_error)
    }

    pub fn apply(&mut self, snapshot: &str, ops: JsValue) -> Result<String, JsValue> {
        let ops = records_from_js(ops)?;
        self.bridge
            .apply_records(&Snapshot::new(snapshot), &ops)
            .map(Snapshot::into_inner)
            .map_err(bridge_error)
    }

    #[wasm_bindgen(js_name = applyEdit)]
    pub fn apply_edit(&mut self, snapshot: &str, edit: &str) -> Result<String, JsValue> {
        self.bridge
            .apply_edit(&Snapshot::new(snapshot), edit)
            .map(Snapshot::into_inner)
            .map_err(bridge_error)
    }
}
