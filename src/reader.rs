//! Tabular reader: turns an upload into rows of cell strings.
//!
//! Delimited text is decoded through the encoding chain and parsed with the
//! `csv` crate in flexible mode, so every record keeps its own width. Workbooks
//! are opened with `calamine` and only the first sheet is read.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, Timelike};
use log::debug;

use crate::{
    encoding::{self, Candidate},
    error::MergeError,
    model::{FileKind, InputFile, ParsedFile, Row},
};

/// Parses an upload according to its declared kind. The raw bytes are
/// released once the rows have been produced.
pub fn read_file(file: InputFile, candidates: &[Candidate]) -> Result<ParsedFile, MergeError> {
    let InputFile { name, kind, bytes } = file;
    let rows = match kind {
        FileKind::Csv => {
            let decoded = encoding::decode(&bytes, candidates)
                .map_err(|err| MergeError::unreadable(&name, kind, err))?;
            drop(bytes);
            debug!("Decoded '{name}' as {}", decoded.encoding);
            read_csv_rows(&decoded.text).map_err(|err| MergeError::unreadable(&name, kind, err))?
        }
        FileKind::Spreadsheet => read_spreadsheet_rows(&bytes)
            .map_err(|err| MergeError::unreadable(&name, kind, err))?,
    };
    debug!("Read {} row(s) from '{name}'", rows.len());
    Ok(ParsedFile { name, kind, rows })
}

/// Parses delimited text into one row per line on disk. Empty lines between
/// records come back as rows without cells; trailing empty lines are dropped.
pub fn read_csv_rows(text: &str) -> Result<Vec<Row>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .double_quote(true)
        .from_reader(text.as_bytes());
    let mut rows: Vec<Row> = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        // The csv reader skips empty lines, so recover them from the text
        // that precedes where this record's parse started.
        let parse_start = record
            .position()
            .map_or(0, |pos| usize::try_from(pos.byte()).unwrap_or(usize::MAX));
        let blank = blank_lines_before(text.as_bytes(), parse_start, rows.is_empty());
        rows.extend(std::iter::repeat_with(Vec::new).take(blank));
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Counts the empty lines in the run of line terminators around `pos`.
/// Record content never ends or starts with a bare terminator, so the run
/// spans exactly from the previous record's end to the next record's start.
fn blank_lines_before(bytes: &[u8], pos: usize, first_record: bool) -> usize {
    let is_terminator = |byte: &&u8| matches!(**byte, b'\r' | b'\n');
    let pos = pos.min(bytes.len());
    let start = pos - bytes[..pos].iter().rev().take_while(is_terminator).count();
    let end = pos + bytes[pos..].iter().take_while(is_terminator).count();
    let breaks = line_breaks(&bytes[start..end]);
    if first_record {
        breaks
    } else {
        // The first break terminates the previous record.
        breaks.saturating_sub(1)
    }
}

fn line_breaks(run: &[u8]) -> usize {
    let mut count = 0;
    let mut bytes = run.iter().peekable();
    while let Some(&byte) = bytes.next() {
        if byte == b'\r' && bytes.peek() == Some(&&b'\n') {
            bytes.next();
        }
        count += 1;
    }
    count
}

/// Reads the first sheet of a workbook (xlsx, xlsm, xls or ods).
pub fn read_spreadsheet_rows(bytes: &[u8]) -> Result<Vec<Row>, calamine::Error> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => {
            return Err(calamine::Error::Msg("workbook does not contain any sheets"));
        }
    };
    let Some((start_row, start_col)) = range.start() else {
        return Ok(Vec::new());
    };

    // The used range may begin below or right of A1; keep stored positions.
    let leading_cols = start_col as usize;
    let width = leading_cols + range.width();
    let mut rows: Vec<Row> = (0..start_row).map(|_| vec![String::new(); width]).collect();
    for cells in range.rows() {
        let mut row = Vec::with_capacity(width);
        row.resize(leading_cols, String::new());
        row.extend(cells.iter().map(render_cell));
        rows.push(row);
    }
    Ok(rows)
}

/// Canonical text form of a workbook cell.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) => render_float(*value),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(render_datetime)
            .unwrap_or_else(|| cell.to_string()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => value.clone(),
        Data::Error(err) => err.to_string(),
    }
}

fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn render_datetime(value: NaiveDateTime) -> String {
    if value.num_seconds_from_midnight() == 0 && value.nanosecond() == 0 {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
