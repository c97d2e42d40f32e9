pub mod command;
pub mod edit;
pub mod error;

pub use command::{parse_command, parse_command_with, CodecOptions};
pub use edit::{deserialize_edit, deserialize_edit_with, serialize, serialize_edit};
pub use error::CodecError;
