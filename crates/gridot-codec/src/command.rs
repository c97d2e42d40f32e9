//! Nom-based parser for the spreadsheet command grammar.
//!
//! ```text
//! set <target> <attribute> <value...>
//! insertrow <anchor>
//! deleterow <anchor | range>
//! insertcol <anchor>
//! deletecol <anchor | range>
//! ```

use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::{char, space0},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, terminated},
    IResult,
};

use gridot_core::address::is_range;
use gridot_core::{
    CellRange, ColRange, DeleteCol, DeleteRow, InsertCol, InsertRow, OpKind, Operation,
    RowRange, Set, Target,
};

use crate::error::CodecError;

/// Limits applied while decoding commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    /// Largest number of operations a single range may expand into
    pub max_range_cells: u64,
}

impl CodecOptions {
    pub const DEFAULT_MAX_RANGE_CELLS: u64 = 65_536;
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_range_cells: Self::DEFAULT_MAX_RANGE_CELLS,
        }
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

/// A run of non-space characters
fn field(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c == ' ')(input)
}

/// The leading keyword, possibly empty
fn keyword(input: &str) -> IResult<&str, &str> {
    take_till(|c: char| c == ' ')(input)
}

/// ` <target> <attribute>[ <value...>]`
fn set_fields(input: &str) -> IResult<&str, (&str, &str, &str)> {
    let (input, target) = preceded(char(' '), field)(input)?;
    let (input, attribute) = preceded(char(' '), field)(input)?;
    let (input, value) = opt(preceded(char(' '), rest))(input)?;

    Ok((input, (target, attribute, value.unwrap_or(""))))
}

/// ` <token>` with nothing but trailing spaces after it
fn single_field(input: &str) -> IResult<&str, &str> {
    all_consuming(terminated(preceded(char(' '), field), space0))(input)
}

// =============================================================================
// Command Parsers
// =============================================================================

fn check_limit(range: &str, count: u64, options: &CodecOptions) -> Result<(), CodecError> {
    if count > options.max_range_cells {
        return Err(CodecError::RangeTooLarge {
            range: range.to_string(),
            count,
            limit: options.max_range_cells,
        });
    }
    Ok(())
}

fn malformed(kind: OpKind, line: &str) -> CodecError {
    CodecError::Malformed {
        keyword: kind.keyword(),
        line: line.to_string(),
    }
}

fn parse_set(line: &str, args: &str, options: &CodecOptions) -> Result<Vec<Operation>, CodecError> {
    let (_, (target, attribute, value)) =
        set_fields(args).map_err(|_| malformed(OpKind::Set, line))?;

    if is_range(target) {
        let range = CellRange::parse(target)?;
        check_limit(target, range.cell_count(), options)?;
        return range
            .cells()
            .map(|cell| -> Result<Operation, CodecError> {
                Ok(Set::new(Target::Cell(cell), attribute, value)?.into())
            })
            .collect();
    }

    Ok(vec![Set::new(target.parse()?, attribute, value)?.into()])
}

fn parse_anchor_command(
    kind: OpKind,
    line: &str,
    args: &str,
    options: &CodecOptions,
) -> Result<Vec<Operation>, CodecError> {
    let (_, token) = single_field(args).map_err(|_| malformed(kind, line))?;

    let ops = match kind {
        OpKind::InsertRow => vec![InsertRow::new(token.parse()?).into()],
        OpKind::InsertCol => vec![InsertCol::new(token.parse()?).into()],
        OpKind::DeleteRow if is_range(token) => {
            let range = RowRange::parse(token)?;
            check_limit(token, range.row_count(), options)?;
            range.anchors().map(|row| DeleteRow::new(row).into()).collect()
        }
        OpKind::DeleteRow => vec![DeleteRow::new(token.parse()?).into()],
        OpKind::DeleteCol if is_range(token) => {
            let range = ColRange::parse(token)?;
            check_limit(token, range.col_count(), options)?;
            range.anchors().map(|col| DeleteCol::new(col).into()).collect()
        }
        OpKind::DeleteCol => vec![DeleteCol::new(token.parse()?).into()],
        OpKind::Set => return Err(malformed(kind, line)),
    };

    Ok(ops)
}

/// Parse one command line with explicit limits. See [`parse_command`].
pub fn parse_command_with(
    line: &str,
    options: &CodecOptions,
) -> Result<Option<Vec<Operation>>, CodecError> {
    let Ok((args, word)) = keyword(line) else {
        return Ok(None);
    };
    let Some(kind) = OpKind::from_keyword(word) else {
        return Ok(None);
    };

    let ops = match kind {
        OpKind::Set => parse_set(line, args, options)?,
        _ => parse_anchor_command(kind, line, args, options)?,
    };

    Ok(Some(ops))
}

/// Parse one command line into operations.
///
/// Returns `Ok(None)` for commands outside the five operation kinds (`recalc`,
/// `merge`, ...). Ranges expand into one operation per cell, row or column.
///
/// ```
/// use gridot_codec::parse_command;
///
/// let ops = parse_command("insertrow A5").unwrap().unwrap();
/// assert_eq!(ops.len(), 1);
/// assert_eq!(ops[0].to_command(), "insertrow A5");
///
/// assert!(parse_command("recalc").unwrap().is_none());
/// ```
pub fn parse_command(line: &str) -> Result<Option<Vec<Operation>>, CodecError> {
    parse_command_with(line, &CodecOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridot_core::{AddressError, CellAddr, ColAnchor, FieldError, RowAnchor};

    fn parse(line: &str) -> Vec<Operation> {
        parse_command(line).unwrap().unwrap()
    }

    fn commands(ops: &[Operation]) -> Vec<String> {
        ops.iter().map(Operation::to_command).collect()
    }

    #[test]
    fn test_parse_set_cell() {
        let ops = parse("set A1 value n 10");
        assert_eq!(ops, vec![Operation::from(Set::on("A1", "value", "n 10").unwrap())]);
    }

    #[test]
    fn test_parse_set_keeps_value_spacing() {
        let ops = parse("set B2 text t hello  world");
        match &ops[0] {
            Operation::Set(set) => assert_eq!(set.value(), "t hello  world"),
            other => panic!("Expected Set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_set_without_value() {
        let ops = parse("set A1 font");
        match &ops[0] {
            Operation::Set(set) => {
                assert_eq!(set.attribute(), "font");
                assert_eq!(set.value(), "");
            }
            other => panic!("Expected Set, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_set_targets() {
        for (line, target) in [
            ("set sheet lastcol 5", Target::Sheet),
            ("set 22 height 30", Target::Row(22)),
            ("set B width 80", Target::Col(1)),
            ("set c3 value 1", Target::Cell(CellAddr::new(2, 3))),
        ] {
            match &parse(line)[0] {
                Operation::Set(set) => assert_eq!(set.target(), &target, "{}", line),
                other => panic!("Expected Set, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_parse_set_range_expands_column_major() {
        let ops = parse("set A1:B2 color red");
        assert_eq!(
            commands(&ops),
            [
                "set A1 color red",
                "set A2 color red",
                "set B1 color red",
                "set B2 color red"
            ]
        );
    }

    #[test]
    fn test_parse_insert_commands() {
        assert_eq!(
            parse("insertrow A5"),
            vec![Operation::from(InsertRow::new(RowAnchor::at(0, 5)))]
        );
        assert_eq!(
            parse("insertcol C1"),
            vec![Operation::from(InsertCol::new(ColAnchor::at(2, 1)))]
        );
    }

    #[test]
    fn test_parse_delete_ranges_highest_first() {
        assert_eq!(
            commands(&parse("deleterow A2:A4")),
            ["deleterow A4", "deleterow A3", "deleterow A2"]
        );
        assert_eq!(
            commands(&parse("deletecol B1:D1")),
            ["deletecol D1", "deletecol C1", "deletecol B1"]
        );
        assert_eq!(commands(&parse("deletecol C")), ["deletecol C"]);
    }

    #[test]
    fn test_unrecognized_commands() {
        for line in ["recalc", "redisplay", "merge C3:F3", "name define X A1", "", "settle A1"] {
            assert_eq!(parse_command(line), Ok(None), "{}", line);
        }
    }

    #[test]
    fn test_malformed_commands() {
        assert!(matches!(
            parse_command("set A1"),
            Err(CodecError::Malformed { keyword: "set", .. })
        ));
        assert!(matches!(
            parse_command("insertrow"),
            Err(CodecError::Malformed { keyword: "insertrow", .. })
        ));
        assert!(matches!(
            parse_command("insertrow A5 A6"),
            Err(CodecError::Malformed { .. })
        ));
        assert_eq!(parse("insertrow A5  ").len(), 1);
    }

    #[test]
    fn test_bad_addresses() {
        assert!(matches!(
            parse_command("insertrow A"),
            Err(CodecError::Address(AddressError::InvalidRow(_)))
        ));
        assert!(matches!(
            parse_command("set A1:Q value 1"),
            Err(CodecError::Address(AddressError::InvalidCell(_)))
        ));
        assert!(matches!(
            parse_command("deletecol 7"),
            Err(CodecError::Address(AddressError::InvalidColumn(_)))
        ));
        assert!(matches!(
            parse_command("set A\t1 value 1"),
            Err(CodecError::Address(AddressError::InvalidTarget(_)))
        ));
        assert!(matches!(
            parse_command("set A1 val\tue 1"),
            Err(CodecError::Field(FieldError::InvalidAttribute(_)))
        ));
        assert!(matches!(
            parse_command("set A1:A2 value a\rb"),
            Err(CodecError::Field(FieldError::MultilineValue(_)))
        ));
    }

    #[test]
    fn test_range_limit() {
        let options = CodecOptions { max_range_cells: 3 };
        assert!(matches!(
            parse_command_with("set A1:B2 value 1", &options),
            Err(CodecError::RangeTooLarge { count: 4, limit: 3, .. })
        ));
        assert!(parse_command_with("deleterow A1:A3", &options).is_ok());
        assert!(parse_command("set A1:XFD1048576 value 1").is_err());
    }

    #[test]
    fn test_round_trip() {
        for line in [
            "set A1 value n 10",
            "set sheet lastrow 4",
            "set 3 hide yes",
            "insertrow A5",
            "insertcol B",
            "deleterow 9",
            "deletecol AA",
            "deletecol C4",
        ] {
            let ops = parse(line);
            let again = parse(&ops[0].to_command());
            assert_eq!(again, ops, "{}", line);
        }
    }

    #[test]
    fn test_round_trip_constructed_operations() {
        let set = |target: Target, attribute: &str, value: &str| -> Operation {
            Set::new(target, attribute, value).unwrap().into()
        };

        for op in [
            set(Target::Sheet, "lastrow", "4"),
            set(Target::Cell(CellAddr::new(27, 100)), "value", "n 10"),
            set(Target::Row(22), "height", "30"),
            set(Target::Col(2), "width", "80"),
            set(Target::Raw("$A$1".to_string()), "value", "1"),
            set(Target::Cell(CellAddr::new(0, 1)), "font", ""),
            set(Target::Cell(CellAddr::new(0, 1)), "text", "a b  c"),
            set(Target::Cell(CellAddr::new(0, 1)), "text", " leading"),
            set(Target::Cell(CellAddr::new(0, 1)), "text", "trailing "),
            set(Target::Sheet, "text", " "),
            InsertRow::new(RowAnchor::at(0, 5)).into(),
            InsertCol::new(ColAnchor::at(26, 1)).into(),
            DeleteRow::new(RowAnchor::new(9)).into(),
            DeleteCol::new(ColAnchor::at(2, 4)).into(),
        ] {
            assert_eq!(parse(&op.to_command()), vec![op.clone()], "{:?}", op);
        }
    }
}
