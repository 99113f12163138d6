use crate::model::{ParsedFile, Row, SplitFile};

/// Separates the leading `skip_rows` title rows from the data rows.
pub fn split_rows(mut rows: Vec<Row>, skip_rows: usize) -> (Vec<Row>, Vec<Row>) {
    let boundary = skip_rows.min(rows.len());
    let data_region = rows.split_off(boundary);
    (rows, data_region)
}

pub fn split_file(parsed: ParsedFile, skip_rows: usize) -> SplitFile {
    let (header_region, data_region) = split_rows(parsed.rows, skip_rows);
    SplitFile {
        name: parsed.name,
        header_region,
        data_region,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileKind;

    fn rows(values: &[&[&str]]) -> Vec<Row> {
        values
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn zero_skip_keeps_everything_as_data() {
        let (header, data) = split_rows(rows(&[&["a"], &["b"]]), 0);
        assert!(header.is_empty());
        assert_eq!(data, rows(&[&["a"], &["b"]]));
    }

    #[test]
    fn header_region_is_clipped_to_available_rows() {
        let (header, data) = split_rows(rows(&[&["Title"], &["Sub"]]), 5);
        assert_eq!(header, rows(&[&["Title"], &["Sub"]]));
        assert!(data.is_empty());
    }

    #[test]
    fn empty_file_splits_into_two_empty_regions() {
        let (header, data) = split_rows(Vec::new(), 3);
        assert!(header.is_empty());
        assert!(data.is_empty());
    }

    #[test]
    fn split_file_reports_first_data_row_width() {
        let parsed = ParsedFile {
            name: "a.csv".into(),
            kind: FileKind::Csv,
            rows: rows(&[&["Report X"], &["1", "a", "x"], &["2"]]),
        };
        let split = split_file(parsed, 1);
        assert_eq!(split.header_region, rows(&[&["Report X"]]));
        assert_eq!(split.data_region.len(), 2);
        assert_eq!(split.column_count(), 3);
    }
}
