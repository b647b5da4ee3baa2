//! Row blocks — the rectangular payloads a write consumes.

use serde::{Deserialize, Serialize};

/// A single scalar cell value.
///
/// The sheet service stores text and numbers; everything a block carries
/// is one or the other. Untagged so payloads serialize as plain JSON
/// scalars (`"abc"`, `42.5`) rather than enum wrappers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Escape the wildcard placeholder before transmission.
    ///
    /// A bare `*` collides with the service's wildcard handling in write
    /// paths, so it goes over the wire as `?`. Anything else, including
    /// strings that merely contain a `*`, passes through untouched.
    pub fn escaped(self) -> Value {
        match self {
            Value::Text(s) if s == "*" => Value::Text("?".to_string()),
            other => other,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Error building a row block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// No rows at all.
    Empty,
    /// The first row has no columns, so the block has no width.
    NoColumns,
}

impl std::fmt::Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::Empty => write!(f, "row block is empty"),
            BlockError::NoColumns => write!(f, "first row has no columns"),
        }
    }
}

impl std::error::Error for BlockError {}

/// A non-empty rectangle of values, row-major.
///
/// The first row fixes the column width. Later rows are trusted to match;
/// the callers that assemble blocks (CSV readers, report builders) already
/// guarantee it, and the positional write would only ever see a short or
/// long tail, never a crash.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBlock {
    rows: Vec<Vec<Value>>,
}

impl RowBlock {
    pub fn new(rows: Vec<Vec<Value>>) -> Result<Self, BlockError> {
        match rows.first() {
            None => Err(BlockError::Empty),
            Some(first) if first.is_empty() => Err(BlockError::NoColumns),
            Some(_) => Ok(Self { rows }),
        }
    }

    /// Number of rows. Always at least 1.
    pub fn rows(&self) -> u64 {
        self.rows.len() as u64
    }

    /// Number of columns, as fixed by the first row. Always at least 1.
    pub fn cols(&self) -> u64 {
        self.rows[0].len() as u64
    }

    /// Flatten row-major into the transmission order, escaping the `*`
    /// placeholder as it goes: row 0 left to right, then row 1, and so on.
    pub fn flatten(&self) -> Vec<Value> {
        self.rows
            .iter()
            .flat_map(|row| row.iter().cloned().map(Value::escaped))
            .collect()
    }
}
