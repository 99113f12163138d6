//! Column-count resolution and row alignment.
//!
//! Both stages are pure. Resolution looks only at the first file of a group;
//! alignment is then applied to each data row on its own.

use crate::model::{Row, SplitFile};

/// Target width for a group: the first data row of the first file, or 0 when
/// that file has no data rows.
pub fn resolve_column_count(files: &[SplitFile]) -> usize {
    files.first().map_or(0, SplitFile::column_count)
}

/// Truncates or pads `row` with empty cells to exactly `target` cells.
pub fn align_row(mut row: Row, target: usize) -> Row {
    row.resize(target, String::new());
    row
}

pub fn align_rows(rows: Vec<Row>, target: usize) -> Vec<Row> {
    rows.into_iter().map(|row| align_row(row, target)).collect()
}
