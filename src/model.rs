//! Core data types shared by every merge stage.
//!
//! A merge run moves each upload through the same pipeline:
//!
//! - [`InputFile`]: the raw upload (name, declared [`FileKind`], bytes).
//! - [`ParsedFile`]: rows produced by the tabular reader; the bytes are gone.
//! - [`SplitFile`]: rows separated into a display-only header region and the
//!   data region that takes part in column alignment.
//! - [`MergedResult`]: one per kind, the aligned concatenation of a group.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One row of cells, in column order.
pub type Row = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Spreadsheet,
}

impl FileKind {
    /// Extension used for merged output of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Spreadsheet => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FileKind::Csv => "text/csv",
            FileKind::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Maps a file extension onto the kind it declares, if supported.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.');
        if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("txt") {
            Some(FileKind::Csv)
        } else if ["xlsx", "xlsm", "xls", "ods"]
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        {
            Some(FileKind::Spreadsheet)
        } else {
            None
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileKind::Csv => write!(f, "CSV"),
            FileKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub name: String,
    pub kind: FileKind,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, kind: FileKind, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            kind,
            bytes: bytes.into(),
        }
    }
}

/// Rows read from one upload. Only the identity of the source is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFile {
    pub name: String,
    pub kind: FileKind,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitFile {
    pub name: String,
    pub header_region: Vec<Row>,
    pub data_region: Vec<Row>,
}

impl SplitFile {
    /// Width of the first data row, or 0 when the file has no data.
    pub fn column_count(&self) -> usize {
        self.data_region.first().map_or(0, Vec::len)
    }
}

/// Same-kind files in merge order. Never empty once built by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeGroup {
    pub kind: FileKind,
    pub files: Vec<SplitFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedResult {
    pub kind: FileKind,
    /// Title rows of the first file in the group; never aligned.
    pub header_region: Vec<Row>,
    /// Every row has exactly `target_column_count` cells.
    pub data_rows: Vec<Row>,
    pub target_column_count: usize,
    pub skip_rows: usize,
    /// Names of the files that contributed, in merge order.
    pub files: Vec<String>,
}

impl MergedResult {
    /// The header row placed directly above the data, when there is one.
    pub fn last_header_row(&self) -> Option<&Row> {
        if self.skip_rows == 0 {
            return None;
        }
        self.header_region.last()
    }

    /// Header rows followed by data rows, in output order.
    pub fn all_rows(&self) -> impl Iterator<Item = &Row> {
        self.header_region.iter().chain(self.data_rows.iter())
    }
}
