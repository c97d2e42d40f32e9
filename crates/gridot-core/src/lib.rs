pub mod address;
pub mod batch;
pub mod error;
pub mod operation;
pub mod transform;

pub use address::{
    col_from_letters, expand_col_range, expand_range, expand_row_range, letters_from_col,
    parse_cell, CellAddr, CellRange, ColAnchor, ColRange, RowAnchor, RowRange,
};
pub use batch::{compose, transform_batch, transform_x};
pub use error::{AddressError, FieldError, OtError};
pub use operation::{DeleteCol, DeleteRow, InsertCol, InsertRow, OpKind, Operation, Set, Target};
pub use transform::Side;
