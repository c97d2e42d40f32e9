use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::address::{col_from_letters, is_range, CellAddr, ColAnchor, RowAnchor};
use crate::error::{AddressError, FieldError, OtError};

/// The discriminant of an operation, with the names it goes by on each boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Set,
    InsertRow,
    DeleteRow,
    InsertCol,
    DeleteCol,
}

impl OpKind {
    pub const ALL: [OpKind; 5] = [
        OpKind::Set,
        OpKind::InsertRow,
        OpKind::DeleteRow,
        OpKind::InsertCol,
        OpKind::DeleteCol,
    ];

    /// The `type` field used in structured records
    pub const fn type_tag(self) -> &'static str {
        match self {
            OpKind::Set => "Set",
            OpKind::InsertRow => "InsertRow",
            OpKind::DeleteRow => "DeleteRow",
            OpKind::InsertCol => "InsertCol",
            OpKind::DeleteCol => "DeleteCol",
        }
    }

    /// The leading keyword of the textual command
    pub const fn keyword(self) -> &'static str {
        match self {
            OpKind::Set => "set",
            OpKind::InsertRow => "insertrow",
            OpKind::DeleteRow => "deleterow",
            OpKind::InsertCol => "insertcol",
            OpKind::DeleteCol => "deletecol",
        }
    }

    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// What a `set` command writes to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Target {
    /// The whole document (`sheet`)
    Sheet,
    Cell(CellAddr),
    /// A whole row, 1-indexed
    Row(u32),
    /// A whole column, 0-indexed
    Col(u32),
    /// Any token this crate does not understand; never adjusted by transforms
    Raw(String),
}

impl Target {
    pub const SHEET: &'static str = "sheet";
}

impl FromStr for Target {
    type Err = AddressError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AddressError::InvalidTarget(token.to_string()));
        }
        if token == Self::SHEET {
            return Ok(Target::Sheet);
        }
        if is_range(token) {
            return Err(AddressError::UnexpandedRange(token.to_string()));
        }
        if let Ok(cell) = token.parse::<CellAddr>() {
            return Ok(Target::Cell(cell));
        }

        let target = if token.chars().all(|c| c.is_ascii_digit()) {
            match token.parse::<u32>() {
                Ok(row) if row > 0 => Target::Row(row),
                _ => Target::Raw(token.to_string()),
            }
        } else if token.chars().all(|c| c.is_ascii_alphabetic()) {
            col_from_letters(token)
                .map(Target::Col)
                .unwrap_or_else(|_| Target::Raw(token.to_string()))
        } else {
            Target::Raw(token.to_string())
        };

        Ok(target)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Sheet => f.write_str(Self::SHEET),
            Target::Cell(cell) => write!(f, "{}", cell),
            Target::Row(row) => write!(f, "{}", row),
            Target::Col(col) => f.write_str(&crate::address::letters_from_col(*col)),
            Target::Raw(token) => f.write_str(token),
        }
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.to_string()
    }
}

/// Assign `value` to `attribute` of a target.
///
/// Every field survives `to_command` and a reparse: the target prints as a single
/// token that parses back to itself, the attribute is one space-free word and the
/// value stays on one line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    target: Target,
    attribute: String,
    value: String,
    /// Cleared when a transform turns this write into a no-op
    has_effect: bool,
}

impl Set {
    pub fn new(
        target: Target,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, FieldError> {
        let (attribute, value) = (attribute.into(), value.into());

        let reparsed = target.to_string().parse::<Target>();
        if reparsed.as_ref() != Ok(&target) {
            return Err(FieldError::InvalidTarget(target.to_string()));
        }
        if attribute.is_empty() || attribute.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(FieldError::InvalidAttribute(attribute));
        }
        if value.contains(['\n', '\r']) {
            return Err(FieldError::MultilineValue(value));
        }

        Ok(Self {
            target,
            attribute,
            value,
            has_effect: true,
        })
    }

    /// Build from a textual target token such as `B2`, `7`, `C` or `sheet`
    pub fn on(
        target: &str,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, OtError> {
        Ok(Self::new(target.parse()?, attribute, value)?)
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn has_effect(&self) -> bool {
        self.has_effect
    }

    /// A copy of this write aimed at another target
    pub(crate) fn retarget(&self, target: Target) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    /// A copy of this write that no longer does anything
    pub fn tombstoned(&self) -> Self {
        Self {
            has_effect: false,
            ..self.clone()
        }
    }
}

/// Insert a row; rows at or below the anchor move down by one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertRow {
    new_row: RowAnchor,
}

impl InsertRow {
    pub fn new(new_row: RowAnchor) -> Self {
        Self { new_row }
    }

    pub fn new_row(&self) -> RowAnchor {
        self.new_row
    }
}

/// Delete a row; rows below move up by one. `None` is a deletion that lost a tie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeleteRow {
    row: Option<RowAnchor>,
}

impl DeleteRow {
    pub fn new(row: RowAnchor) -> Self {
        Self { row: Some(row) }
    }

    pub fn tombstone() -> Self {
        Self { row: None }
    }

    pub fn row(&self) -> Option<RowAnchor> {
        self.row
    }
}

/// Insert a column; columns at or right of the anchor move right by one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertCol {
    new_col: ColAnchor,
}

impl InsertCol {
    pub fn new(new_col: ColAnchor) -> Self {
        Self { new_col }
    }

    pub fn new_col(&self) -> ColAnchor {
        self.new_col
    }
}

/// Delete a column; columns to the right move left by one. `None` is a deletion that lost a tie.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DeleteCol {
    col: Option<ColAnchor>,
}

impl DeleteCol {
    pub fn new(col: ColAnchor) -> Self {
        Self { col: Some(col) }
    }

    pub fn tombstone() -> Self {
        Self { col: None }
    }

    pub fn col(&self) -> Option<ColAnchor> {
        self.col
    }
}

/// One edit against a spreadsheet document.
///
/// Values are never mutated: transforms and composition always build new operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", try_from = "OperationRecord")]
pub enum Operation {
    Set(Set),
    InsertRow(InsertRow),
    DeleteRow(DeleteRow),
    InsertCol(InsertCol),
    DeleteCol(DeleteCol),
}

impl Operation {
    pub fn kind(&self) -> OpKind {
        match self {
            Operation::Set(_) => OpKind::Set,
            Operation::InsertRow(_) => OpKind::InsertRow,
            Operation::DeleteRow(_) => OpKind::DeleteRow,
            Operation::InsertCol(_) => OpKind::InsertCol,
            Operation::DeleteCol(_) => OpKind::DeleteCol,
        }
    }

    /// False for tombstones, which are kept in batches but never reach the document
    pub fn has_effect(&self) -> bool {
        match self {
            Operation::Set(set) => set.has_effect,
            Operation::DeleteRow(del) => del.row.is_some(),
            Operation::DeleteCol(del) => del.col.is_some(),
            Operation::InsertRow(_) | Operation::InsertCol(_) => true,
        }
    }

    /// The textual command, or an empty string for a tombstone
    pub fn to_command(&self) -> String {
        match self {
            Operation::Set(set) if !set.has_effect => String::new(),
            Operation::Set(set) if set.value.is_empty() => {
                format!("set {} {}", set.target, set.attribute)
            }
            Operation::Set(set) => format!("set {} {} {}", set.target, set.attribute, set.value),
            Operation::InsertRow(ins) => format!("insertrow {}", ins.new_row),
            Operation::DeleteRow(DeleteRow { row: Some(row) }) => format!("deleterow {}", row),
            Operation::InsertCol(ins) => format!("insertcol {}", ins.new_col),
            Operation::DeleteCol(DeleteCol { col: Some(col) }) => format!("deletecol {}", col),
            Operation::DeleteRow(DeleteRow { row: None })
            | Operation::DeleteCol(DeleteCol { col: None }) => String::new(),
        }
    }

    /// Rebuild an operation from a structured record such as
    /// `{"type": "InsertRow", "newRow": "A5"}`
    pub fn hydrate(record: &Value) -> Result<Self, OtError> {
        let tag = record
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| OtError::UnknownType(record.to_string()))?;
        if OpKind::from_type_tag(tag).is_none() {
            return Err(OtError::UnknownType(tag.to_string()));
        }

        OperationRecord::deserialize(record)?.try_into()
    }

    /// The structured record form of this operation
    pub fn to_record(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn default_has_effect() -> bool {
    true
}

/// A `set` target as it appears in records: a token, or a bare row number
#[derive(Deserialize)]
#[serde(untagged)]
enum TargetRecord {
    Token(String),
    Row(u64),
}

impl TryFrom<TargetRecord> for Target {
    type Error = AddressError;

    fn try_from(record: TargetRecord) -> Result<Self, Self::Error> {
        match record {
            TargetRecord::Token(token) => token.parse(),
            TargetRecord::Row(row) => match u32::try_from(row) {
                Ok(row) if row > 0 => Ok(Target::Row(row)),
                _ => Err(AddressError::InvalidRow(row.to_string())),
            },
        }
    }
}

/// The wire shape of an operation, before addresses and fields are checked
#[derive(Deserialize)]
#[serde(tag = "type")]
enum OperationRecord {
    #[serde(rename_all = "camelCase")]
    Set {
        target: TargetRecord,
        attribute: String,
        value: String,
        #[serde(default = "default_has_effect")]
        has_effect: bool,
    },
    #[serde(rename_all = "camelCase")]
    InsertRow {
        new_row: String,
    },
    DeleteRow {
        #[serde(default)]
        row: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    InsertCol {
        new_col: String,
    },
    DeleteCol {
        #[serde(default)]
        col: Option<String>,
    },
}

impl TryFrom<OperationRecord> for Operation {
    type Error = OtError;

    fn try_from(record: OperationRecord) -> Result<Self, Self::Error> {
        let op: Operation = match record {
            OperationRecord::Set {
                target,
                attribute,
                value,
                has_effect,
            } => {
                let set = Set::new(target.try_into()?, attribute, value)?;
                (if has_effect { set } else { set.tombstoned() }).into()
            }
            OperationRecord::InsertRow { new_row } => InsertRow::new(new_row.parse()?).into(),
            OperationRecord::DeleteRow { row: Some(row) } => DeleteRow::new(row.parse()?).into(),
            OperationRecord::DeleteRow { row: None } => DeleteRow::tombstone().into(),
            OperationRecord::InsertCol { new_col } => InsertCol::new(new_col.parse()?).into(),
            OperationRecord::DeleteCol { col: Some(col) } => DeleteCol::new(col.parse()?).into(),
            OperationRecord::DeleteCol { col: None } => DeleteCol::tombstone().into(),
        };
        Ok(op)
    }
}

impl From<Set> for Operation {
    fn from(op: Set) -> Self {
        Operation::Set(op)
    }
}

impl From<InsertRow> for Operation {
    fn from(op: InsertRow) -> Self {
        Operation::InsertRow(op)
    }
}

impl From<DeleteRow> for Operation {
    fn from(op: DeleteRow) -> Self {
        Operation::DeleteRow(op)
    }
}

impl From<InsertCol> for Operation {
    fn from(op: InsertCol) -> Self {
        Operation::InsertCol(op)
    }
}

impl From<DeleteCol> for Operation {
    fn from(op: DeleteCol) -> Self {
        Operation::DeleteCol(op)
    }
}
