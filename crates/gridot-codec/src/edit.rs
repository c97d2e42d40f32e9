use gridot_core::Operation;

use crate::command::{parse_command_with, CodecOptions};
use crate::error::CodecError;

/// One command per operation, in order. Tombstones come out as empty strings so the
/// result still lines up with `ops`.
pub fn serialize(ops: &[Operation]) -> Vec<String> {
    ops.iter().map(Operation::to_command).collect()
}

/// Join the commands of `ops` with newlines, leaving out tombstones
///
/// ```
/// use gridot_codec::{deserialize_edit, serialize_edit};
///
/// let ops = deserialize_edit("set A1 value 10\nrecalc\nset B2 value 20").unwrap();
/// assert_eq!(ops.len(), 2);
/// assert_eq!(serialize_edit(&ops), "set A1 value 10\nset B2 value 20");
/// ```
pub fn serialize_edit(ops: &[Operation]) -> String {
    ops.iter()
        .map(Operation::to_command)
        .filter(|command| !command.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a newline-separated command stream, dropping lines that are not one of
/// the five operation kinds
pub fn deserialize_edit(text: &str) -> Result<Vec<Operation>, CodecError> {
    deserialize_edit_with(text, &CodecOptions::default())
}

/// [`deserialize_edit`] with explicit limits
pub fn deserialize_edit_with(
    text: &str,
    options: &CodecOptions,
) -> Result<Vec<Operation>, CodecError> {
    let mut ops = Vec::new();

    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }

        match parse_command_with(line, options)? {
            Some(parsed) => ops.extend(parsed),
            None => tracing::trace!(command = line, "dropping unrecognized command"),
        }
    }

    Ok(ops)
}
