//! Row-push machinery — shared between automation scripts and the CLI.
//!
//! This crate is the single source of truth for how a rectangular block
//! of values lands in a remote worksheet: grow the sheet, compute the
//! A1 target range, fetch the cell batch, assign values positionally,
//! push the batch back. Remote calls go through the [`Worksheet`] trait
//! so the writer never knows which backend it is talking to.
//!
//! No HTTP in here. No async. No global state — the row cursor that
//! older automation kept in a process-wide variable is an explicit
//! value the caller owns.

pub mod block;
pub mod console;
pub mod range;
pub mod retry;
pub mod worksheet;
pub mod writer;

pub use block::{BlockError, RowBlock, Value};
pub use console::Trace;
pub use range::{col_to_letters, GridRange};
pub use retry::{RetryError, RetryPolicy};
pub use worksheet::{Cell, Worksheet, WorksheetError};
pub use writer::{GridWriter, RowCursor, WriteError, WriteReceipt};
