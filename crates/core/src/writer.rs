//! The grid writer: push a row block into a worksheet.
//!
//! One call does the whole dance — make room, compute the A1 target,
//! fetch the cell batch, assign values positionally, push the batch
//! back. Remote fetch and update go through the retry policy; sizing
//! calls are made once, as the original automation did.

use crate::block::RowBlock;
use crate::console;
use crate::range::GridRange;
use crate::retry::{RetryError, RetryPolicy};
use crate::worksheet::Worksheet;

/// Caller-owned count of sheet rows consumed so far.
///
/// Replaces the process-wide counter older automation kept: each sheet a
/// script pushes into gets its own cursor, threaded `&mut` through every
/// write. The cursor advances by the number of rows *added* to the sheet
/// — growth, not writes — and it advances even when the caller aimed the
/// write at an explicit start row, because it tracks total growth rather
/// than the position of any one write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCursor {
    used: u64,
}

impl RowCursor {
    pub fn new(used: u64) -> Self {
        Self { used }
    }

    /// Rows consumed so far; the next default write lands below them.
    pub fn used(&self) -> u64 {
        self.used
    }

    fn advance(&mut self, n: u64) {
        self.used += n;
    }
}

/// Why a write did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// Reading or growing the sheet's row count failed. These calls are
    /// made once, outside the retry loop.
    Resize(String),
    /// The backend rejected a fetch or update permanently; retrying
    /// would not have helped.
    Rejected(String),
    /// Transient failures used up every attempt. Whether to stop the
    /// whole run is the caller's decision now, not this crate's.
    RetriesExhausted { attempts: u32, last: String },
}

impl std::fmt::Display for WriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteError::Resize(msg) => write!(f, "sheet resize failed: {}", msg),
            WriteError::Rejected(msg) => write!(f, "write rejected: {}", msg),
            WriteError::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {} attempts ({})", attempts, last)
            }
        }
    }
}

impl std::error::Error for WriteError {}

/// Summary of a completed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReceipt {
    /// A1 range the block landed in.
    pub range: String,
    /// Blank rows appended to make room. Zero when the blank tail was
    /// already deep enough.
    pub rows_appended: u64,
    /// Cell handles pushed back in the final batch.
    pub cells_updated: usize,
}

/// Writes row blocks into worksheets with bounded retry.
///
/// Holds no sheet state of its own: the worksheet handle and the row
/// cursor both belong to the caller, so one writer can serve any number
/// of sheets.
#[derive(Debug, Clone)]
pub struct GridWriter {
    policy: RetryPolicy,
    banner: bool,
}

impl Default for GridWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl GridWriter {
    /// Writer with the stock policy: 5 attempts, 5 seconds apart.
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            banner: true,
        }
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self {
            policy,
            banner: true,
        }
    }

    /// Suppress the give-up banner normally printed on retry exhaustion.
    pub fn quiet(mut self) -> Self {
        self.banner = false;
        self
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Write `block` into `sheet`, starting below `start_row` consumed
    /// rows — or below the cursor's position when `start_row` is `None`.
    ///
    /// Grows the sheet by exactly the shortfall when its row count is
    /// less than `start + block.rows()`, advancing `cursor` by the rows
    /// added (even for explicit `start_row` writes). Fetch and update
    /// run under the retry policy; assignment into the fetched batch is
    /// positional, and a batch longer than the block keeps its tail
    /// untouched.
    pub fn write<W: Worksheet>(
        &self,
        sheet: &mut W,
        cursor: &mut RowCursor,
        block: &RowBlock,
        start_row: Option<u64>,
    ) -> Result<WriteReceipt, WriteError> {
        let num_rows = block.rows();
        let num_cols = block.cols();
        let last_row_used = start_row.unwrap_or_else(|| cursor.used());

        // Grow if the sheet is too short to hold the block. The shortfall
        // formula also covers a start row beyond the current bottom.
        let row_count = sheet
            .row_count()
            .map_err(|e| WriteError::Resize(e.to_string()))?;
        let needed = last_row_used + num_rows;
        let mut rows_appended = 0;
        if row_count < needed {
            rows_appended = needed - row_count;
            sheet
                .add_rows(rows_appended)
                .map_err(|e| WriteError::Resize(e.to_string()))?;
            cursor.advance(rows_appended);
        }

        let range = GridRange::new(last_row_used, num_rows, num_cols);
        let a1 = range.a1();

        let mut cells = self.guard(self.policy.run("fetch range", || sheet.fetch_range(&a1)))?;

        // Positional assignment. A batch longer than the block keeps the
        // fetched values in its tail and pushes them back unchanged.
        let flat = block.flatten();
        for (cell, value) in cells.iter_mut().zip(flat) {
            cell.value = value;
        }

        self.guard(self.policy.run("update cells", || sheet.update_cells(&cells)))?;

        Ok(WriteReceipt {
            range: a1,
            rows_appended,
            cells_updated: cells.len(),
        })
    }

    /// Map retry failures to write errors, sounding the give-up banner
    /// on exhaustion unless quiet.
    fn guard<T>(&self, result: Result<T, RetryError>) -> Result<T, WriteError> {
        match result {
            Ok(value) => Ok(value),
            Err(RetryError::Rejected(message)) => Err(WriteError::Rejected(message)),
            Err(RetryError::Exhausted { attempts, last }) => {
                if self.banner {
                    console::print_abort_banner();
                }
                Err(WriteError::RetriesExhausted { attempts, last })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Value;
    use crate::worksheet::{Cell, WorksheetError};
    use std::time::Duration;

    /// In-memory worksheet that records every call and can be told to
    /// fail fetches or updates a number of times first.
    struct FakeSheet {
        rows: u64,
        batch: Vec<Cell>,
        fetch_failures: u32,
        update_failures: u32,
        update_rejects: bool,
        fetch_calls: u32,
        update_calls: u32,
        added: Vec<u64>,
        fetched_ranges: Vec<String>,
        pushed: Vec<Vec<Cell>>,
    }

    impl FakeSheet {
        fn new(rows: u64, batch: Vec<Cell>) -> Self {
            Self {
                rows,
                batch,
                fetch_failures: 0,
                update_failures: 0,
                update_rejects: false,
                fetch_calls: 0,
                update_calls: 0,
                added: Vec::new(),
                fetched_ranges: Vec::new(),
                pushed: Vec::new(),
            }
        }
    }

    impl Worksheet for FakeSheet {
        fn row_count(&mut self) -> Result<u64, WorksheetError> {
            Ok(self.rows)
        }

        fn add_rows(&mut self, n: u64) -> Result<(), WorksheetError> {
            self.rows += n;
            self.added.push(n);
            Ok(())
        }

        fn fetch_range(&mut self, a1: &str) -> Result<Vec<Cell>, WorksheetError> {
            self.fetch_calls += 1;
            if self.fetch_failures > 0 {
                self.fetch_failures -= 1;
                return Err(WorksheetError::Transient("range fetch 503".into()));
            }
            self.fetched_ranges.push(a1.to_string());
            Ok(self.batch.clone())
        }

        fn update_cells(&mut self, cells: &[Cell]) -> Result<(), WorksheetError> {
            self.update_calls += 1;
            if self.update_rejects {
                return Err(WorksheetError::Permanent("422 bad range".into()));
            }
            if self.update_failures > 0 {
                self.update_failures -= 1;
                return Err(WorksheetError::Transient("update 503".into()));
            }
            self.pushed.push(cells.to_vec());
            Ok(())
        }
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    fn block(rows: &[&[&str]]) -> RowBlock {
        RowBlock::new(
            rows.iter()
                .map(|r| r.iter().map(|s| text(s)).collect())
                .collect(),
        )
        .unwrap()
    }

    /// Blank cells for a `rows x cols` rectangle below `start_row`,
    /// row-major with 1-based coordinates.
    fn blank_batch(start_row: u64, rows: u64, cols: u64) -> Vec<Cell> {
        let mut batch = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                batch.push(Cell::new(start_row + r + 1, c + 1, text("")));
            }
        }
        batch
    }

    fn instant_writer() -> GridWriter {
        GridWriter::with_policy(RetryPolicy::new(5, Duration::ZERO)).quiet()
    }

    #[test]
    fn test_full_sheet_grows_by_block_height() {
        // 10 rows, all 10 consumed: a 2x2 block needs 2 more.
        let mut sheet = FakeSheet::new(10, blank_batch(10, 2, 2));
        let mut cursor = RowCursor::new(10);
        let block = block(&[&["a", "b"], &["c", "d"]]);

        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        assert_eq!(sheet.added, vec![2]);
        assert_eq!(cursor.used(), 12);
        assert_eq!(receipt.range, "A11:B12");
        assert_eq!(receipt.rows_appended, 2);
        assert_eq!(receipt.cells_updated, 4);

        // The pushed batch carries the block row-major.
        let pushed = &sheet.pushed[0];
        let values: Vec<&Value> = pushed.iter().map(|c| &c.value).collect();
        assert_eq!(
            values,
            vec![&text("a"), &text("b"), &text("c"), &text("d")]
        );
    }

    #[test]
    fn test_deep_blank_tail_adds_nothing() {
        // 20 rows, 10 consumed: plenty of blank tail for a 2x2 block.
        let mut sheet = FakeSheet::new(20, blank_batch(10, 2, 2));
        let mut cursor = RowCursor::new(10);
        let block = block(&[&["a", "b"], &["c", "d"]]);

        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        assert!(sheet.added.is_empty());
        assert_eq!(cursor.used(), 10);
        assert_eq!(receipt.range, "A11:B12");
        assert_eq!(receipt.rows_appended, 0);
        assert_eq!(sheet.fetched_ranges, vec!["A11:B12"]);
        assert_eq!(sheet.update_calls, 1);
    }

    #[test]
    fn test_partial_tail_grows_by_shortfall() {
        // 11 rows, 10 consumed: one blank row available, one short.
        let mut sheet = FakeSheet::new(11, blank_batch(10, 2, 2));
        let mut cursor = RowCursor::new(10);
        let block = block(&[&["a", "b"], &["c", "d"]]);

        instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        assert_eq!(sheet.added, vec![1]);
        assert_eq!(cursor.used(), 11);
    }

    #[test]
    fn test_start_row_beyond_bottom_grows_past_it() {
        // Writing below row 10 of a 5-row sheet must reach 12 rows.
        let mut sheet = FakeSheet::new(5, blank_batch(10, 2, 2));
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"], &["c", "d"]]);

        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, Some(10))
            .unwrap();

        assert_eq!(sheet.added, vec![7]);
        assert_eq!(sheet.rows, 12);
        assert_eq!(receipt.range, "A11:B12");
        // Growth advances the cursor even for an explicit start row.
        assert_eq!(cursor.used(), 7);
    }

    #[test]
    fn test_explicit_start_row_zero_targets_the_top() {
        let mut sheet = FakeSheet::new(10, blank_batch(0, 1, 3));
        let mut cursor = RowCursor::new(4);
        let block = block(&[&["x", "y", "z"]]);

        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, Some(0))
            .unwrap();

        // Some(0) is an explicit position, not "use the cursor".
        assert_eq!(receipt.range, "A1:C1");
        assert!(sheet.added.is_empty());
        assert_eq!(cursor.used(), 4);
    }

    #[test]
    fn test_fetch_recovers_within_policy() {
        // Four transient fetch failures, success on the fifth attempt.
        let mut sheet = FakeSheet::new(20, blank_batch(0, 1, 2));
        sheet.fetch_failures = 4;
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"]]);

        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        assert_eq!(sheet.fetch_calls, 5);
        assert_eq!(receipt.cells_updated, 2);
    }

    #[test]
    fn test_fetch_exhaustion_reports_attempts() {
        let mut sheet = FakeSheet::new(20, blank_batch(0, 1, 2));
        sheet.fetch_failures = 5;
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"]]);

        let err = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap_err();

        assert_eq!(sheet.fetch_calls, 5);
        assert_eq!(sheet.update_calls, 0);
        assert_eq!(
            err,
            WriteError::RetriesExhausted {
                attempts: 5,
                last: "range fetch 503".to_string(),
            }
        );
    }

    #[test]
    fn test_update_exhaustion_reports_attempts() {
        let mut sheet = FakeSheet::new(20, blank_batch(0, 1, 2));
        sheet.update_failures = 5;
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"]]);

        let err = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap_err();

        assert_eq!(sheet.update_calls, 5);
        assert!(matches!(err, WriteError::RetriesExhausted { .. }));
    }

    #[test]
    fn test_permanent_rejection_skips_remaining_attempts() {
        let mut sheet = FakeSheet::new(20, blank_batch(0, 1, 2));
        sheet.update_rejects = true;
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"]]);

        let err = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap_err();

        assert_eq!(sheet.update_calls, 1);
        assert_eq!(err, WriteError::Rejected("422 bad range".to_string()));
    }

    #[test]
    fn test_long_batch_keeps_its_tail() {
        // Four handles, two values: the tail rides back unchanged.
        let mut batch = blank_batch(0, 2, 2);
        batch[2].value = text("keep me");
        batch[3].value = text("me too");
        let mut sheet = FakeSheet::new(20, batch);
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a", "b"]]);

        // The writer asked for a 1x2 range; the backend handed back four
        // cells anyway. Assignment is positional and stops at the block.
        let receipt = instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        let pushed = &sheet.pushed[0];
        assert_eq!(pushed[0].value, text("a"));
        assert_eq!(pushed[1].value, text("b"));
        assert_eq!(pushed[2].value, text("keep me"));
        assert_eq!(pushed[3].value, text("me too"));
        assert_eq!(receipt.cells_updated, 4);
    }

    #[test]
    fn test_placeholder_escaped_on_the_wire() {
        let mut sheet = FakeSheet::new(20, blank_batch(0, 1, 2));
        let mut cursor = RowCursor::new(0);
        let block = block(&[&["*", "a*b"]]);

        instant_writer()
            .write(&mut sheet, &mut cursor, &block, None)
            .unwrap();

        let pushed = &sheet.pushed[0];
        assert_eq!(pushed[0].value, text("?"));
        assert_eq!(pushed[1].value, text("a*b"));
    }

    #[test]
    fn test_resize_failure_surfaces_without_retry() {
        struct DeadSheet;
        impl Worksheet for DeadSheet {
            fn row_count(&mut self) -> Result<u64, WorksheetError> {
                Err(WorksheetError::Transient("meta 503".into()))
            }
            fn add_rows(&mut self, _n: u64) -> Result<(), WorksheetError> {
                unreachable!("row_count already failed")
            }
            fn fetch_range(&mut self, _a1: &str) -> Result<Vec<Cell>, WorksheetError> {
                unreachable!()
            }
            fn update_cells(&mut self, _cells: &[Cell]) -> Result<(), WorksheetError> {
                unreachable!()
            }
        }

        let mut cursor = RowCursor::new(0);
        let block = block(&[&["a"]]);
        let err = instant_writer()
            .write(&mut DeadSheet, &mut cursor, &block, None)
            .unwrap_err();

        assert_eq!(err, WriteError::Resize("transient: meta 503".to_string()));
        assert_eq!(cursor.used(), 0);
    }
}
