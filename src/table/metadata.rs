// Column type inference and statistics maintenance
// Author: Gabriel Demetrios Lafis

use super::{Cell, ColumnType, Table};

/// Maximum number of distinct sample values kept per column
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Infer a column type from cell values by majority vote over non-null cells
///
/// Ties break toward the earlier type in the order string, number, boolean,
/// date. A column with no non-null cells infers as null.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a Cell>,
{
    let mut strings = 0usize;
    let mut numbers = 0usize;
    let mut booleans = 0usize;
    let mut dates = 0usize;

    for cell in cells {
        match cell {
            Cell::Null => {}
            Cell::String(_) => strings += 1,
            Cell::Number(_) => numbers += 1,
            Cell::Boolean(_) => booleans += 1,
            Cell::Date(_) => dates += 1,
        }
    }

    // Tie break follows declaration order of the candidates
    let candidates = [
        (ColumnType::String, strings),
        (ColumnType::Number, numbers),
        (ColumnType::Boolean, booleans),
        (ColumnType::Date, dates),
    ];

    let mut best = ColumnType::Null;
    let mut best_count = 0usize;
    for (candidate, count) in candidates {
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }

    best
}

impl Table {
    /// Recompute null counts and sample values for one column
    ///
    /// The declared type is left untouched; callers that change cell contents
    /// decide separately whether to re-infer it.
    pub fn recompute_column(&mut self, index: usize) {
        let mut non_null_count = 0usize;
        let mut null_count = 0usize;
        let mut samples: Vec<Cell> = Vec::new();

        for row in &self.rows {
            let cell = &row.cells[index];
            if cell.is_null() {
                null_count += 1;
            } else {
                non_null_count += 1;
                if samples.len() < MAX_SAMPLE_VALUES && !samples.contains(cell) {
                    samples.push(cell.clone());
                }
            }
        }

        let column = &mut self.columns[index];
        column.non_null_count = non_null_count;
        column.null_count = null_count;
        column.sample_values = samples;
    }

    /// Recompute statistics for every column
    pub fn recompute_all_columns(&mut self) {
        for index in 0..self.columns.len() {
            self.recompute_column(index);
        }
    }

    /// Re-infer the declared type of one column from its current cells
    pub fn reinfer_column_type(&mut self, index: usize) {
        let inferred = infer_column_type(self.rows.iter().map(|row| &row.cells[index]));
        self.columns[index].column_type = inferred;
    }
}
