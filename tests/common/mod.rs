#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use sheet_merge::{FileKind, InputFile, Row};
use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

pub fn rows(values: &[&[&str]]) -> Vec<Row> {
    values
        .iter()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect()
}

pub fn csv_input(name: &str, text: &str) -> InputFile {
    InputFile::new(name, FileKind::Csv, text.as_bytes().to_vec())
}

pub fn xlsx_input(name: &str, values: &[&[&str]]) -> InputFile {
    InputFile::new(name, FileKind::Spreadsheet, xlsx_bytes(values))
}

/// Builds an xlsx workbook whose first sheet holds `values` as text cells.
/// Empty strings leave the cell unset.
pub fn xlsx_bytes(values: &[&[&str]]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).expect("default sheet");
    for (row_idx, row) in values.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            sheet
                .get_cell_mut(((col_idx + 1) as u32, (row_idx + 1) as u32))
                .set_value_string(*value);
        }
    }
    workbook_bytes(&book)
}

pub fn workbook_bytes(book: &umya_spreadsheet::Spreadsheet) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut buffer).expect("write workbook");
    buffer.into_inner()
}

/// Whether the cell at 1-based (`col`, `row`) of the first sheet is bold.
pub fn is_bold(bytes: &[u8], col: u32, row: u32) -> bool {
    let book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes.to_vec()), true)
        .expect("read workbook");
    let sheet = book.get_sheet(&0).expect("first sheet");
    sheet
        .get_cell((col, row))
        .and_then(|cell| cell.get_style().get_font())
        .map(|font| font.get_bold().to_owned())
        .unwrap_or(false)
}
