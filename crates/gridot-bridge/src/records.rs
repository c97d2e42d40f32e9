//! The record-level surface: every operation travels as a structured
//! `serde_json::Value` such as `{"type": "Set", "target": "A1", ...}`.

use gridot_codec::{deserialize_edit_with, CodecError, CodecOptions};
use gridot_core::{OtError, Operation, Side};
use serde_json::Value;

pub fn hydrate_all(records: &[Value]) -> Result<Vec<Operation>, OtError> {
    records.iter().map(Operation::hydrate).collect()
}

pub fn dehydrate_all(ops: &[Operation]) -> Vec<Value> {
    ops.iter().map(Operation::to_record).collect()
}

/// Transform `ops1` against the concurrent batch `ops2`
pub fn transform(ops1: &[Value], ops2: &[Value], side: Side) -> Result<Vec<Value>, OtError> {
    let ops1 = hydrate_all(ops1)?;
    let ops2 = hydrate_all(ops2)?;
    tracing::debug!(ops1 = ops1.len(), ops2 = ops2.len(), %side, "transforming batch");

    Ok(dehydrate_all(&gridot_core::transform_batch(&ops1, &ops2, side)))
}

/// Concatenate two sequential batches, validating both
pub fn compose(ops1: &[Value], ops2: &[Value]) -> Result<Vec<Value>, OtError> {
    let ops1 = hydrate_all(ops1)?;
    let ops2 = hydrate_all(ops2)?;
    Ok(dehydrate_all(&gridot_core::compose(&ops1, &ops2)))
}

pub fn serialize_edit(records: &[Value]) -> Result<String, OtError> {
    Ok(gridot_codec::serialize_edit(&hydrate_all(records)?))
}

pub fn deserialize_edit(text: &str) -> Result<Vec<Value>, CodecError> {
    deserialize_edit_with_options(text, &CodecOptions::default())
}

pub fn deserialize_edit_with_options(
    text: &str,
    options: &CodecOptions,
) -> Result<Vec<Value>, CodecError> {
    Ok(dehydrate_all(&deserialize_edit_with(text, options)?))
}
