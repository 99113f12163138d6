//! Output serialization for merged groups.
//!
//! CSV output is UTF-8 with a byte-order mark so spreadsheet applications pick
//! the right encoding, using the same comma/double-quote convention that is
//! accepted on input. Spreadsheet output is a single-sheet (`Sheet1`) xlsx
//! workbook where every cell is written as text; the header row directly above
//! the data is set in bold when title rows were skipped.

use std::io::Cursor;

use chrono::NaiveDateTime;
use csv::QuoteStyle;

use crate::{
    error::MergeError,
    model::{FileKind, MergedResult},
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn serialize(result: &MergedResult) -> Result<Vec<u8>, MergeError> {
    let serialized = match result.kind {
        FileKind::Csv => write_csv(result).map_err(|err| err.to_string()),
        FileKind::Spreadsheet => write_xlsx(result),
    };
    serialized.map_err(|cause| MergeError::Serialize {
        kind: result.kind,
        cause,
    })
}

/// 1-based sheet row that receives bold emphasis, if any.
pub fn bold_row(result: &MergedResult) -> Option<u32> {
    if result.skip_rows == 0 || result.header_region.is_empty() {
        return None;
    }
    u32::try_from(result.header_region.len()).ok()
}

/// Download name such as `merged_3_csv_files_skip1_20240105_142233.csv`.
pub fn output_file_name(result: &MergedResult, timestamp: NaiveDateTime) -> String {
    let ext = result.kind.extension();
    format!(
        "merged_{}_{ext}_files_skip{}_{}.{ext}",
        result.files.len(),
        result.skip_rows,
        timestamp.format("%Y%m%d_%H%M%S")
    )
}

fn write_csv(result: &MergedResult) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .flexible(true)
        .from_writer(UTF8_BOM.to_vec());
    for row in result.all_rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

fn write_xlsx(result: &MergedResult) -> Result<Vec<u8>, String> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| "new workbook has no sheet".to_string())?;

    let mut width = 0u32;
    for (row_idx, row) in result.all_rows().enumerate() {
        let row_number = sheet_index(row_idx)?;
        for (col_idx, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut((sheet_index(col_idx)?, row_number))
                .set_value_string(value.as_str());
        }
        width = width.max(u32::try_from(row.len()).map_err(|err| err.to_string())?);
    }

    if let Some(row_number) = bold_row(result) {
        for col in 1..=width {
            sheet
                .get_cell_mut((col, row_number))
                .get_style_mut()
                .get_font_mut()
                .set_bold(true);
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .map_err(|err| err.to_string())?;
    Ok(buffer.into_inner())
}

fn sheet_index(idx: usize) -> Result<u32, String> {
    u32::try_from(idx + 1).map_err(|_| format!("position {idx} exceeds sheet limits"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn result(kind: FileKind, skip_rows: usize, header: &[&str]) -> MergedResult {
        MergedResult {
            kind,
            header_region: header.iter().map(|h| vec![h.to_string()]).collect(),
            data_rows: vec![vec!["1".into(), "a,b".into()]],
            target_column_count: 2,
            skip_rows,
            files: vec!["one".into(), "two".into()],
        }
    }

    #[test]
    fn csv_output_has_bom_and_quotes_only_when_needed() {
        let bytes = serialize(&result(FileKind::Csv, 1, &["Report X"])).expect("serialize");
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).expect("utf8");
        assert_eq!(text, "Report X\n1,\"a,b\"\n");
    }

    #[test]
    fn bold_row_is_last_header_row() {
        assert_eq!(
            bold_row(&result(FileKind::Spreadsheet, 2, &["Title", "Columns"])),
            Some(2)
        );
        assert_eq!(bold_row(&result(FileKind::Spreadsheet, 0, &[])), None);
        // Fewer rows than skip_rows: nothing to emphasize.
        assert_eq!(bold_row(&result(FileKind::Spreadsheet, 3, &[])), None);
    }

    #[test]
    fn file_name_includes_count_kind_and_timestamp() {
        let stamp = NaiveDate::from_ymd_opt(2024, 1, 5)
            .and_then(|d| d.and_hms_opt(14, 22, 33))
            .expect("timestamp");
        assert_eq!(
            output_file_name(&result(FileKind::Spreadsheet, 1, &["t"]), stamp),
            "merged_2_xlsx_files_skip1_20240105_142233.xlsx"
        );
    }
}
