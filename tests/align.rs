use proptest::prelude::*;
use sheet_merge::{
    FileKind, InputFile,
    align::{align_row, resolve_column_count},
    merge,
    model::SplitFile,
};

fn cell_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 ]{0,6}"
}

fn row_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(cell_strategy(), 0..10)
}

fn to_csv(rows: &[Vec<String>]) -> String {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row).expect("write row");
    }
    String::from_utf8(writer.into_inner().expect("buffer")).expect("utf8")
}

proptest! {
    #[test]
    fn aligned_row_keeps_prefix_and_pads_with_empties(
        row in row_strategy(),
        target in 0usize..12,
    ) {
        let aligned = align_row(row.clone(), target);
        prop_assert_eq!(aligned.len(), target);
        let kept = row.len().min(target);
        prop_assert_eq!(&aligned[..kept], &row[..kept]);
        prop_assert!(aligned[kept..].iter().all(String::is_empty));
    }

    #[test]
    fn resolver_reads_only_first_file(
        first in proptest::collection::vec(row_strategy(), 0..4),
        rest in proptest::collection::vec(row_strategy(), 0..4),
    ) {
        let expected = first.first().map_or(0, Vec::len);
        let files = vec![
            SplitFile { name: "first".into(), header_region: Vec::new(), data_region: first },
            SplitFile { name: "rest".into(), header_region: Vec::new(), data_region: rest },
        ];
        prop_assert_eq!(resolve_column_count(&files), expected);
    }

    #[test]
    fn every_merged_row_has_target_width(
        files in proptest::collection::vec(
            proptest::collection::vec(
                proptest::collection::vec("[a-z0-9]{1,4}", 1..8),
                1..6,
            ),
            1..4,
        ),
        skip_rows in 0usize..3,
    ) {
        let inputs = files
            .iter()
            .enumerate()
            .map(|(idx, rows)| InputFile::new(format!("{idx}.csv"), FileKind::Csv, to_csv(rows)))
            .collect::<Vec<_>>();
        let report = merge(inputs, skip_rows);
        let result = report.get(FileKind::Csv).expect("csv result");

        let expected_width = files[0].get(skip_rows).map_or(0, Vec::len);
        prop_assert_eq!(result.target_column_count, expected_width);
        prop_assert!(result.data_rows.iter().all(|row| row.len() == expected_width));
        let expected_rows: usize = files.iter().map(|rows| rows.len().saturating_sub(skip_rows)).sum();
        prop_assert_eq!(result.data_rows.len(), expected_rows);
        prop_assert_eq!(result.header_region.len(), skip_rows.min(files[0].len()));
    }
}
