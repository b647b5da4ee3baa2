//! A1-style ranges for rectangular writes.

/// Convert a 0-based column index to Excel-style letter(s).
///
/// 0=A, 1=B, ..., 25=Z, 26=AA, 701=ZZ, 702=AAA.
pub fn col_to_letters(col: u64) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

/// The rectangular target of one write.
///
/// `start_row` counts the rows above the target (so the first written row
/// is `start_row + 1` in 1-based sheet coordinates). `rows` and `cols`
/// come from a [`RowBlock`](crate::block::RowBlock) and are therefore
/// both at least 1; `a1` on a zero-width range would underflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    /// Rows already consumed above the target.
    pub start_row: u64,
    /// Height of the target in rows.
    pub rows: u64,
    /// Width of the target in columns.
    pub cols: u64,
}

impl GridRange {
    pub fn new(start_row: u64, rows: u64, cols: u64) -> Self {
        Self {
            start_row,
            rows,
            cols,
        }
    }

    /// Render as an A1 range anchored at column A.
    ///
    /// A block written after 10 consumed rows, 2 rows by 2 columns,
    /// targets `"A11:B12"`.
    pub fn a1(&self) -> String {
        format!(
            "A{}:{}{}",
            self.start_row + 1,
            col_to_letters(self.cols - 1),
            self.start_row + self.rows
        )
    }

    /// Number of cells the range spans.
    pub fn cell_count(&self) -> u64 {
        self.rows * self.cols
    }
}

impl std::fmt::Display for GridRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.a1())
    }
}
