//! Merge orchestration.
//!
//! Uploads are partitioned by [`FileKind`]; each partition is read, split and
//! merged on its own, so a broken workbook never affects the CSV group. Within
//! a group the first file fixes the target column count and contributes the
//! header region; every file's data rows are aligned to that count and
//! concatenated in group order.

use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info, warn};

use crate::{
    align::{align_rows, resolve_column_count},
    config::{FileOrder, MergeSettings},
    error::MergeError,
    model::{FileKind, InputFile, MergeGroup, MergedResult, Row},
    reader, split,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The file was left out; the rest of its group was merged.
    Skipped,
    /// The file was first in its group, so the group produced no result.
    GroupAborted,
}

#[derive(Debug)]
pub struct FileFailure {
    pub error: MergeError,
    pub disposition: Disposition,
}

#[derive(Debug, Default)]
pub struct MergeReport {
    /// One entry per kind that was uploaded and could be merged.
    pub results: BTreeMap<FileKind, MergedResult>,
    pub failures: Vec<FileFailure>,
}

impl MergeReport {
    pub fn get(&self, kind: FileKind) -> Option<&MergedResult> {
        self.results.get(&kind)
    }
}

/// Merges `files` with `skip_rows` title rows per file and default settings.
pub fn merge(files: Vec<InputFile>, skip_rows: usize) -> MergeReport {
    merge_with(files, &MergeSettings::new(skip_rows))
}

pub fn merge_with(files: Vec<InputFile>, settings: &MergeSettings) -> MergeReport {
    let mut report = MergeReport::default();
    for (kind, group_files) in partition_by_kind(files, settings.order) {
        let Some(group) = build_group(kind, group_files, settings, &mut report.failures) else {
            continue;
        };
        let result = merge_group(group, settings.skip_rows);
        info!(
            "Merged {} {kind} file(s) into {} data row(s) across {} column(s)",
            result.files.len(),
            result.data_rows.len(),
            result.target_column_count
        );
        report.results.insert(kind, result);
    }
    report
}

/// Groups uploads by kind, keeping relative order (or name order when asked).
pub fn partition_by_kind(
    files: Vec<InputFile>,
    order: FileOrder,
) -> BTreeMap<FileKind, Vec<InputFile>> {
    let mut groups: BTreeMap<FileKind, Vec<InputFile>> = BTreeMap::new();
    for file in files {
        groups.entry(file.kind).or_default().push(file);
    }
    if order == FileOrder::Name {
        for files in groups.values_mut() {
            files.sort_by(|left, right| left.name.cmp(&right.name));
        }
    }
    groups
}

/// Reads and splits each file of one kind. Returns `None` when the first file
/// cannot be read, since the group has no column count to align to.
fn build_group(
    kind: FileKind,
    files: Vec<InputFile>,
    settings: &MergeSettings,
    failures: &mut Vec<FileFailure>,
) -> Option<MergeGroup> {
    let total = files.len();
    let mut split_files = Vec::with_capacity(total);
    for (idx, file) in files.into_iter().enumerate() {
        let parsed = match reader::read_file(file, &settings.candidates) {
            Ok(parsed) => parsed,
            Err(error) if idx == 0 => {
                warn!("{error}; skipping the {kind} group ({total} file(s))");
                failures.push(FileFailure {
                    error,
                    disposition: Disposition::GroupAborted,
                });
                return None;
            }
            Err(error) => {
                warn!("{error}; file excluded from the {kind} merge");
                failures.push(FileFailure {
                    error,
                    disposition: Disposition::Skipped,
                });
                continue;
            }
        };
        let mut split_file = split::split_file(parsed, settings.skip_rows);
        if settings.drop_blank_rows {
            split_file.data_region.retain(|row| !is_blank(row));
        }
        debug!(
            "'{}': {} header row(s), {} data row(s), {} column(s)",
            split_file.name,
            split_file.header_region.len(),
            split_file.data_region.len(),
            split_file.column_count()
        );
        split_files.push(split_file);
    }
    Some(MergeGroup {
        kind,
        files: split_files,
    })
}

/// Resolves the target width, aligns every file and concatenates the result.
pub fn merge_group(group: MergeGroup, skip_rows: usize) -> MergedResult {
    let target_column_count = resolve_column_count(&group.files);
    let mut files = Vec::with_capacity(group.files.len());
    let mut header_region = None;
    let mut data_rows = Vec::new();

    for file in group.files {
        if header_region.is_none() {
            header_region = Some(file.header_region);
        }
        let contributed = file.data_region.len();
        data_rows.extend(align_rows(file.data_region, target_column_count));
        debug!("✓ Appended '{}' ({contributed} row(s))", file.name);
        files.push(file.name);
    }
    debug!("Merge order: {}", files.iter().join(", "));

    MergedResult {
        kind: group.kind,
        header_region: header_region.unwrap_or_default(),
        data_rows,
        target_column_count,
        skip_rows,
        files,
    }
}

/// A row whose cells are all empty. Whitespace counts as content.
fn is_blank(row: &Row) -> bool {
    row.iter().all(String::is_empty)
}
