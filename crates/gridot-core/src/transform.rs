//! Pairwise transform rules.
//!
//! `a.transform_against(&b, side)` assumes `a` and `b` were generated against the same
//! document state and returns the version of `a` that can be applied after `b`.
//! Rows are 1-indexed and columns 0-indexed throughout.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::operation::{DeleteCol, DeleteRow, InsertCol, InsertRow, Operation, Set, Target};

/// Tie-break label for two operations that collide on the same cell, row or column.
///
/// Must be assigned consistently for a whole reconciliation: when `a` is transformed
/// with `Left`, its counterpart `b` is transformed with `Right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Side::Left),
            "right" => Ok(Side::Right),
            other => Err(format!("unknown side: {}", other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Whether a structural change adds or removes a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Change {
    Insert,
    Delete,
}

/// Where a line index ends up after another line was inserted or deleted at `at`.
/// `None` means the line itself was deleted.
fn shift_index(index: u32, at: u32, change: Change) -> Option<u32> {
    match change {
        Change::Insert if index >= at => Some(index.saturating_add(1)),
        Change::Insert => Some(index),
        Change::Delete if index == at => None,
        Change::Delete if index > at => Some(index - 1),
        Change::Delete => Some(index),
    }
}

impl Set {
    fn after_row_change(&self, at: u32, change: Change) -> Set {
        let moved = match self.target() {
            Target::Cell(cell) => shift_index(cell.row, at, change)
                .map(|row| Target::Cell(cell.with_row(row))),
            Target::Row(row) => shift_index(*row, at, change).map(Target::Row),
            Target::Sheet | Target::Col(_) | Target::Raw(_) => return self.clone(),
        };

        match moved {
            Some(target) if &target == self.target() => self.clone(),
            Some(target) => self.retarget(target),
            None => self.tombstoned(),
        }
    }

    fn after_col_change(&self, at: u32, change: Change) -> Set {
        let moved = match self.target() {
            Target::Cell(cell) => shift_index(cell.col, at, change)
                .map(|col| Target::Cell(cell.with_col(col))),
            Target::Col(col) => shift_index(*col, at, change).map(Target::Col),
            Target::Sheet | Target::Row(_) | Target::Raw(_) => return self.clone(),
        };

        match moved {
            Some(target) if &target == self.target() => self.clone(),
            Some(target) => self.retarget(target),
            None => self.tombstoned(),
        }
    }

    /// Two writes collide only when both the target and the attribute match
    fn after_set(&self, other: &Set, side: Side) -> Set {
        let collides = self.target() == other.target() && self.attribute() == other.attribute();
        match (collides, side) {
            // the right side's write wins; the left copy becomes a no-op
            (true, Side::Left) => self.tombstoned(),
            _ => self.clone(),
        }
    }
}

impl InsertRow {
    fn after_insert(&self, at: u32, side: Side) -> InsertRow {
        let mine = self.new_row();
        if at < mine.row() || (at == mine.row() && side == Side::Left) {
            InsertRow::new(mine.with_row(mine.row().saturating_add(1)))
        } else {
            self.clone()
        }
    }

    fn after_delete(&self, at: u32) -> InsertRow {
        let mine = self.new_row();
        if at < mine.row() {
            InsertRow::new(mine.with_row(mine.row() - 1))
        } else {
            self.clone()
        }
    }
}

impl DeleteRow {
    fn after_insert(&self, at: u32) -> DeleteRow {
        match self.row() {
            Some(mine) if at <= mine.row() => {
                DeleteRow::new(mine.with_row(mine.row().saturating_add(1)))
            }
            _ => self.clone(),
        }
    }

    fn after_delete(&self, at: u32, side: Side) -> DeleteRow {
        match self.row() {
            Some(mine) if at == mine.row() && side == Side::Left => DeleteRow::tombstone(),
            Some(mine) if at < mine.row() => DeleteRow::new(mine.with_row(mine.row() - 1)),
            _ => self.clone(),
        }
    }
}

impl InsertCol {
    fn after_insert(&self, at: u32, side: Side) -> InsertCol {
        let mine = self.new_col();
        if at < mine.col() || (at == mine.col() && side == Side::Left) {
            InsertCol::new(mine.with_col(mine.col().saturating_add(1)))
        } else {
            self.clone()
        }
    }

    fn after_delete(&self, at: u32) -> InsertCol {
        let mine = self.new_col();
        if at < mine.col() {
            InsertCol::new(mine.with_col(mine.col() - 1))
        } else {
            self.clone()
        }
    }
}

impl DeleteCol {
    fn after_insert(&self, at: u32) -> DeleteCol {
        match self.col() {
            Some(mine) if at <= mine.col() => {
                DeleteCol::new(mine.with_col(mine.col().saturating_add(1)))
            }
            _ => self.clone(),
        }
    }

    fn after_delete(&self, at: u32, side: Side) -> DeleteCol {
        match self.col() {
            Some(mine) if at == mine.col() && side == Side::Left => DeleteCol::tombstone(),
            Some(mine) if at < mine.col() => DeleteCol::new(mine.with_col(mine.col() - 1)),
            _ => self.clone(),
        }
    }
}

impl Operation {
    /// Adjust this operation for the effect `other` will already have had on the document.
    ///
    /// ```
    /// use gridot_core::{InsertRow, Operation, Set, Side};
    ///
    /// let set = Operation::from(Set::on("B2", "value", "5").unwrap());
    /// let insert = Operation::from(InsertRow::new("A2".parse().unwrap()));
    ///
    /// let moved = set.transform_against(&insert, Side::Right);
    /// assert_eq!(moved.to_command(), "set B3 value 5");
    /// ```
    pub fn transform_against(&self, other: &Operation, side: Side) -> Operation {
        if !self.has_effect() || !other.has_effect() {
            return self.clone();
        }

        let deleted_row = |del: &DeleteRow| del.row().map(|anchor| anchor.row());
        let deleted_col = |del: &DeleteCol| del.col().map(|anchor| anchor.col());

        match (self, other) {
            (Operation::Set(mine), Operation::Set(theirs)) => mine.after_set(theirs, side).into(),
            (Operation::Set(mine), Operation::InsertRow(ins)) => {
                mine.after_row_change(ins.new_row().row(), Change::Insert).into()
            }
            (Operation::Set(mine), Operation::DeleteRow(del)) => match deleted_row(del) {
                Some(at) => mine.after_row_change(at, Change::Delete).into(),
                None => self.clone(),
            },
            (Operation::Set(mine), Operation::InsertCol(ins)) => {
                mine.after_col_change(ins.new_col().col(), Change::Insert).into()
            }
            (Operation::Set(mine), Operation::DeleteCol(del)) => match deleted_col(del) {
                Some(at) => mine.after_col_change(at, Change::Delete).into(),
                None => self.clone(),
            },

            (Operation::InsertRow(mine), Operation::InsertRow(ins)) => {
                mine.after_insert(ins.new_row().row(), side).into()
            }
            (Operation::InsertRow(mine), Operation::DeleteRow(del)) => match deleted_row(del) {
                Some(at) => mine.after_delete(at).into(),
                None => self.clone(),
            },

            (Operation::DeleteRow(mine), Operation::InsertRow(ins)) => {
                mine.after_insert(ins.new_row().row()).into()
            }
            (Operation::DeleteRow(mine), Operation::DeleteRow(del)) => match deleted_row(del) {
                Some(at) => mine.after_delete(at, side).into(),
                None => self.clone(),
            },

            (Operation::InsertCol(mine), Operation::InsertCol(ins)) => {
                mine.after_insert(ins.new_col().col(), side).into()
            }
            (Operation::InsertCol(mine), Operation::DeleteCol(del)) => match deleted_col(del) {
                Some(at) => mine.after_delete(at).into(),
                None => self.clone(),
            },

            (Operation::DeleteCol(mine), Operation::InsertCol(ins)) => {
                mine.after_insert(ins.new_col().col()).into()
            }
            (Operation::DeleteCol(mine), Operation::DeleteCol(del)) => match deleted_col(del) {
                Some(at) => mine.after_delete(at, side).into(),
                None => self.clone(),
            },

            // A write never moves rows or columns
            (Operation::InsertRow(_), Operation::Set(_))
            | (Operation::DeleteRow(_), Operation::Set(_))
            | (Operation::InsertCol(_), Operation::Set(_))
            | (Operation::DeleteCol(_), Operation::Set(_)) => self.clone(),

            // Row and column changes are independent
            (Operation::InsertRow(_), Operation::InsertCol(_))
            | (Operation::InsertRow(_), Operation::DeleteCol(_))
            | (Operation::DeleteRow(_), Operation::InsertCol(_))
            | (Operation::DeleteRow(_), Operation::DeleteCol(_))
            | (Operation::InsertCol(_), Operation::InsertRow(_))
            | (Operation::InsertCol(_), Operation::DeleteRow(_))
            | (Operation::DeleteCol(_), Operation::InsertRow(_))
            | (Operation::DeleteCol(_), Operation::DeleteRow(_)) => self.clone(),
        }
    }
}
