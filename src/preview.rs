use anyhow::Result;
use log::info;

use crate::{
    cli::PreviewArgs,
    io_utils,
    merge,
    model::{MergedResult, Row},
    table,
};

/// Maximum number of rows returned by [`preview()`].
pub const PREVIEW_ROW_LIMIT: usize = 100;

/// First rows of a merged result: header region first, then data rows.
pub fn preview(result: &MergedResult) -> Vec<Row> {
    result
        .all_rows()
        .take(PREVIEW_ROW_LIMIT)
        .cloned()
        .collect()
}

/// Preview rendered as a text table with spreadsheet column letters.
pub fn render_preview(result: &MergedResult) -> String {
    let rows = preview(result);
    let width = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(result.target_column_count);
    table::render_table(&table::column_labels(width), &rows)
}

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let settings = args.merge.settings()?;
    let files = io_utils::load_inputs(&args.merge.inputs)?;
    let report = merge::merge_with(files, &settings);
    io_utils::log_failures(&report);

    for (kind, result) in &report.results {
        println!(
            "== {kind}: {} file(s), {} data row(s), {} column(s)",
            result.files.len(),
            result.data_rows.len(),
            result.target_column_count
        );
        print!("{}", render_preview(result));
        info!(
            "Displayed {} row(s) of the merged {kind} result",
            preview(result).len()
        );
    }
    io_utils::ensure_merged(&report)
}
