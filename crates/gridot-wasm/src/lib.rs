mod api;
mod host;

pub use api::{compose, deserialize_edit, serialize_edit, transform, OtBridge};
pub use host::JsDocumentEngine;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
