//! An in-process document engine holding a plain attribute grid.
//!
//! It understands the five operation commands plus the maintenance commands
//! (`recalc`, `redisplay`, `changedrendervalues`) that accompany real edit logs.
//! Snapshots are JSON.

use std::collections::BTreeMap;

use gridot_codec::{parse_command_with, CodecOptions};
use gridot_core::{CellAddr, Operation, Target};
use serde::{Deserialize, Serialize};

use crate::engine::{DocumentEngine, Snapshot};
use crate::error::EngineError;

/// Commands accepted and ignored
const MAINTENANCE_COMMANDS: [&str; 3] = ["recalc", "redisplay", "changedrendervalues"];

pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Grid {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    sheet: Attributes,
    /// Keyed by 1-based row
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    rows: BTreeMap<u32, Attributes>,
    /// Keyed by 0-based column
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    cols: BTreeMap<u32, Attributes>,
    /// Keyed by A1 address
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    cells: BTreeMap<CellAddr, Attributes>,
}

/// Rebuild `map`, moving each key through `shift` and dropping keys it maps to `None`
fn rekey<K: Ord, V>(map: &mut BTreeMap<K, V>, shift: impl Fn(K) -> Option<K>) {
    *map = std::mem::take(map)
        .into_iter()
        .filter_map(|(key, value)| shift(key).map(|key| (key, value)))
        .collect();
}

fn after_insert(index: u32, at: u32) -> Option<u32> {
    Some(if index >= at { index.saturating_add(1) } else { index })
}

fn after_delete(index: u32, at: u32) -> Option<u32> {
    match index.cmp(&at) {
        std::cmp::Ordering::Less => Some(index),
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Greater => Some(index - 1),
    }
}

impl Grid {
    fn apply(&mut self, op: &Operation) -> Result<(), EngineError> {
        match op {
            Operation::Set(set) if !set.has_effect() => {}
            Operation::Set(set) => {
                let attributes = match set.target() {
                    Target::Sheet => &mut self.sheet,
                    Target::Cell(cell) => self.cells.entry(*cell).or_default(),
                    Target::Row(row) => self.rows.entry(*row).or_default(),
                    Target::Col(col) => self.cols.entry(*col).or_default(),
                    Target::Raw(token) => {
                        return Err(EngineError::new(format!("unknown set target: {}", token)))
                    }
                };
                attributes.insert(set.attribute().to_string(), set.value().to_string());
            }
            Operation::InsertRow(ins) => self.shift_rows(|row| after_insert(row, ins.new_row().row())),
            Operation::DeleteRow(del) => {
                if let Some(at) = del.row() {
                    self.shift_rows(|row| after_delete(row, at.row()));
                }
            }
            Operation::InsertCol(ins) => self.shift_cols(|col| after_insert(col, ins.new_col().col())),
            Operation::DeleteCol(del) => {
                if let Some(at) = del.col() {
                    self.shift_cols(|col| after_delete(col, at.col()));
                }
            }
        }
        Ok(())
    }

    fn shift_rows(&mut self, shift: impl Fn(u32) -> Option<u32>) {
        rekey(&mut self.rows, &shift);
        rekey(&mut self.cells, |cell: CellAddr| shift(cell.row).map(|row| cell.with_row(row)));
    }

    fn shift_cols(&mut self, shift: impl Fn(u32) -> Option<u32>) {
        rekey(&mut self.cols, &shift);
        rekey(&mut self.cells, |cell: CellAddr| shift(cell.col).map(|col| cell.with_col(col)));
    }
}

/// Reference [`DocumentEngine`] backed by an in-memory grid
#[derive(Debug, Clone, Default)]
pub struct MemoryEngine {
    grid: Grid,
    options: CodecOptions,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CodecOptions) -> Self {
        Self {
            grid: Grid::default(),
            options,
        }
    }

    /// Attributes of a single cell such as `"B2"`
    pub fn cell(&self, token: &str) -> Option<&Attributes> {
        let addr: CellAddr = token.parse().ok()?;
        self.grid.cells.get(&addr)
    }

    /// One attribute of a single cell
    pub fn cell_attribute(&self, token: &str, attribute: &str) -> Option<&str> {
        self.cell(token)?.get(attribute).map(String::as_str)
    }

    pub fn row(&self, row: u32) -> Option<&Attributes> {
        self.grid.rows.get(&row)
    }

    pub fn col(&self, col: u32) -> Option<&Attributes> {
        self.grid.cols.get(&col)
    }

    pub fn sheet(&self) -> &Attributes {
        &self.grid.sheet
    }
}

impl DocumentEngine for MemoryEngine {
    fn reset(&mut self) {
        self.grid = Grid::default();
    }

    fn load(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        self.grid = serde_json::from_str(snapshot.as_str())
            .map_err(|e| EngineError::new(format!("invalid snapshot: {}", e)))?;
        Ok(())
    }

    fn execute(&mut self, command: &str) -> Result<(), EngineError> {
        let ops = match parse_command_with(command, &self.options) {
            Ok(Some(ops)) => ops,
            Ok(None) => {
                let word = command.split(' ').next().unwrap_or_default();
                if MAINTENANCE_COMMANDS.contains(&word) {
                    return Ok(());
                }
                return Err(EngineError::new(format!("unsupported command: {}", command)));
            }
            Err(e) => return Err(EngineError::new(e.to_string())),
        };

        for op in &ops {
            self.grid.apply(op)?;
        }
        Ok(())
    }

    fn export(&self) -> Result<Snapshot, EngineError> {
        serde_json::to_string(&self.grid)
            .map(Snapshot::new)
            .map_err(|e| EngineError::new(format!("failed to serialize grid: {}", e)))
    }
}
