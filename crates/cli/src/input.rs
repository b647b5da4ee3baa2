//! CSV input — file or stdin to a row block.

use std::fs::File;
use std::io::{self, Read};

use gridpush_core::{BlockError, RowBlock, Value};

use crate::CliError;

/// Read a CSV block from `path` (`-` for stdin). Every record becomes
/// one row; the first record fixes the column width.
pub fn read_block(path: &str, delimiter: char) -> Result<RowBlock, CliError> {
    if !delimiter.is_ascii() {
        return Err(CliError::args(format!(
            "Delimiter must be a single ASCII character, got '{}'",
            delimiter
        )));
    }

    let reader: Box<dyn Read> = if path == "-" {
        Box::new(io::stdin())
    } else {
        Box::new(
            File::open(path).map_err(|e| CliError::args(format!("Cannot open {}: {}", path, e)))?,
        )
    };

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter as u8)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record =
            record.map_err(|e| CliError::error(format!("Cannot parse {}: {}", path, e)))?;
        rows.push(record.iter().map(parse_field).collect());
    }

    RowBlock::new(rows).map_err(|e| match e {
        BlockError::Empty => CliError::args(format!("{}: no rows to push", path)),
        BlockError::NoColumns => CliError::args(format!("{}: first row has no columns", path)),
    })
}

/// A field becomes a number only when the textual form survives the
/// round-trip, so ids like "007" and amounts like "1.50" keep their
/// exact spelling.
fn parse_field(field: &str) -> Value {
    if let Ok(n) = field.parse::<f64>() {
        if n.is_finite() && n.to_string() == field {
            return Value::Number(n);
        }
    }
    Value::Text(field.to_string())
}
