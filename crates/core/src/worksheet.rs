//! The seam between the writer and whatever holds the actual sheet.

use serde::{Deserialize, Serialize};

use crate::block::Value;

/// One remote cell, fetched in a batch and pushed back in a batch.
///
/// Coordinates are 1-based sheet positions as reported by the backend.
/// The writer never inspects them — assignment is purely positional —
/// but they ride along so the batch can be pushed back to the right
/// places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: u64,
    pub col: u64,
    pub value: Value,
}

impl Cell {
    pub fn new(row: u64, col: u64, value: Value) -> Self {
        Self { row, col, value }
    }
}

/// What went wrong talking to a worksheet backend.
///
/// The split is the retry contract: `Transient` failures are worth
/// repeating, `Permanent` ones are not. A backend that cannot tell the
/// difference may report everything as `Transient` and get the old
/// retry-everything behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorksheetError {
    /// Worth retrying: network trouble, rate limiting, server errors.
    Transient(String),
    /// Not worth retrying: bad credentials, bad request, missing sheet.
    Permanent(String),
}

impl WorksheetError {
    pub fn is_transient(&self) -> bool {
        matches!(self, WorksheetError::Transient(_))
    }

    /// The backend's message, without the transient/permanent wrapper.
    pub fn message(&self) -> &str {
        match self {
            WorksheetError::Transient(msg) => msg,
            WorksheetError::Permanent(msg) => msg,
        }
    }
}

impl std::fmt::Display for WorksheetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorksheetError::Transient(msg) => write!(f, "transient: {}", msg),
            WorksheetError::Permanent(msg) => write!(f, "permanent: {}", msg),
        }
    }
}

impl std::error::Error for WorksheetError {}

/// Capability set of a remote worksheet.
///
/// Four calls, matching what a push actually needs: how big is the
/// sheet, make it bigger, hand me a rectangle of cells, take the
/// rectangle back. Methods take `&mut self` so fakes can record calls
/// and backends can cache freely.
pub trait Worksheet {
    /// Total rows currently in the sheet, blank tail included.
    fn row_count(&mut self) -> Result<u64, WorksheetError>;

    /// Append `n` blank rows at the bottom.
    fn add_rows(&mut self, n: u64) -> Result<(), WorksheetError>;

    /// Fetch the cell batch for an A1 range, row-major.
    fn fetch_range(&mut self, a1: &str) -> Result<Vec<Cell>, WorksheetError>;

    /// Push a batch of locally modified cells back to the sheet.
    fn update_cells(&mut self, cells: &[Cell]) -> Result<(), WorksheetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_split() {
        assert!(WorksheetError::Transient("503".into()).is_transient());
        assert!(!WorksheetError::Permanent("401".into()).is_transient());
    }

    #[test]
    fn test_display_carries_message() {
        let e = WorksheetError::Transient("connection reset".into());
        assert_eq!(e.to_string(), "transient: connection reset");
        assert_eq!(e.message(), "connection reset");
    }

    #[test]
    fn test_cell_round_trips_through_json() {
        let cell = Cell::new(11, 2, Value::Text("x".into()));
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, r#"{"row":11,"col":2,"value":"x"}"#);
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
