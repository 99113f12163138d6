use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDateTime};
use log::{error, info};

use crate::{
    cli::MergeArgs,
    error::MergeError,
    io_utils,
    merge::{self, MergeReport},
    model::{FileKind, MergedResult},
    output, preview,
};

pub fn execute(args: &MergeArgs) -> Result<()> {
    let settings = args.merge.settings()?;
    info!(
        "Merging {} file(s), skipping {} title row(s) per file",
        args.merge.inputs.len(),
        settings.skip_rows
    );
    let files = io_utils::load_inputs(&args.merge.inputs)?;
    let report = merge::merge_with(files, &settings);
    io_utils::log_failures(&report);
    io_utils::ensure_merged(&report)?;

    let timestamp = Local::now().naive_local();
    let written = write_outputs(&report, &args.output_dir, timestamp, output::serialize);
    if args.preview {
        for result in report.results.values() {
            print!("{}", preview::render_preview(result));
        }
    }
    if written.is_empty() {
        return Err(anyhow!(
            "No merged output could be written to {:?}",
            args.output_dir
        ));
    }
    Ok(())
}

/// Serializes and saves every merged kind. A kind that fails is logged and
/// left out; the others are still written.
fn write_outputs<F>(
    report: &MergeReport,
    output_dir: &Path,
    timestamp: NaiveDateTime,
    mut serialize: F,
) -> Vec<(FileKind, PathBuf)>
where
    F: FnMut(&MergedResult) -> Result<Vec<u8>, MergeError>,
{
    let mut written = Vec::with_capacity(report.results.len());
    for (kind, result) in &report.results {
        let bytes = match serialize(result) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("{err}");
                continue;
            }
        };
        let file_name = output::output_file_name(result, timestamp);
        let path = match io_utils::write_output(output_dir, &file_name, &bytes) {
            Ok(path) => path,
            Err(err) => {
                error!("Saving merged {kind} output failed: {err:#}");
                continue;
            }
        };
        info!(
            "Wrote {} data row(s) from {} {kind} file(s) to {:?} ({})",
            result.data_rows.len(),
            result.files.len(),
            path,
            kind.mime_type()
        );
        if let Some(row) = result.last_header_row() {
            info!("Header row above data: {row:?}");
        }
        written.push((*kind, path));
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn stamp() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 1, 5)
            .and_then(|d| d.and_hms_opt(9, 0, 0))
            .expect("timestamp")
    }

    fn merged(kind: FileKind) -> MergedResult {
        MergedResult {
            kind,
            header_region: Vec::new(),
            data_rows: vec![vec!["1".into(), "2".into()]],
            target_column_count: 2,
            skip_rows: 0,
            files: vec![format!("input.{}", kind.extension())],
        }
    }

    fn two_kind_report() -> MergeReport {
        let mut report = MergeReport::default();
        for kind in [FileKind::Csv, FileKind::Spreadsheet] {
            report.results.insert(kind, merged(kind));
        }
        report
    }

    #[test]
    fn failed_kind_does_not_stop_other_outputs() {
        let report = two_kind_report();
        assert_eq!(report.results.len(), 2);
        let dir = tempdir().expect("temp dir");

        let written = write_outputs(&report, dir.path(), stamp(), |result| {
            if result.kind == FileKind::Csv {
                Err(MergeError::Serialize {
                    kind: result.kind,
                    cause: "disk full".to_string(),
                })
            } else {
                output::serialize(result)
            }
        });

        assert_eq!(written.len(), 1);
        assert_eq!(written[0].0, FileKind::Spreadsheet);
        assert!(written[0].1.exists());
        let csv_outputs = std::fs::read_dir(dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "csv"))
            .count();
        assert_eq!(csv_outputs, 0);
    }

    #[test]
    fn every_kind_failing_writes_nothing() {
        let report = two_kind_report();
        let dir = tempdir().expect("temp dir");
        let written = write_outputs(&report, dir.path(), stamp(), |result| {
            Err(MergeError::Serialize {
                kind: result.kind,
                cause: "unsupported".to_string(),
            })
        });
        assert!(written.is_empty());
    }
}
