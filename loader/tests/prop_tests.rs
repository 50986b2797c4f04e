#[cfg(test)]
mod prop_tests {
    use medbiz_loader::{LoadError, Report, Table};
    use proptest::prelude::*;

    // Cells start with 'v' so they can never collide with an NA marker.
    fn cell() -> impl Strategy<Value = Option<String>> {
        prop::option::of("v[a-z0-9]{0,8}")
    }

    fn grid() -> impl Strategy<Value = (usize, Vec<Vec<Option<String>>>)> {
        (2usize..6).prop_flat_map(|cols| {
            (
                Just(cols),
                prop::collection::vec(prop::collection::vec(cell(), cols), 0..20),
            )
        })
    }

    fn to_csv(cols: usize, rows: &[Vec<Option<String>>]) -> String {
        let header: Vec<String> = (0..cols).map(|c| format!("c{c}")).collect();
        let mut text = header.join(",");
        text.push('\n');
        for row in rows {
            let line: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
            text.push_str(&line.join(","));
            text.push('\n');
        }
        text
    }

    proptest! {
        #[test]
        fn shape_matches_generated_grid((cols, rows) in grid()) {
            let table = Table::from_csv_bytes(to_csv(cols, &rows).as_bytes()).unwrap();
            prop_assert_eq!(table.shape(), (rows.len(), cols));
        }

        #[test]
        fn null_counts_match_missing_cells((cols, rows) in grid()) {
            let table = Table::from_csv_bytes(to_csv(cols, &rows).as_bytes()).unwrap();

            for (col, (name, nulls)) in table.null_counts().into_iter().enumerate() {
                let expected = rows.iter().filter(|row| row[col].is_none()).count();
                prop_assert_eq!(name, format!("c{col}"));
                prop_assert_eq!(nulls, expected);
            }
        }

        #[test]
        fn report_has_one_line_per_section_entry((cols, rows) in grid(), head in 1usize..8) {
            let table = Table::from_csv_bytes(to_csv(cols, &rows).as_bytes()).unwrap();
            let text = Report::new(&table, head).to_string();

            let shown = rows.len().min(head);
            let grid_lines = if shown == 0 { 3 } else { shown + 1 };
            let shape_line = format!("({}, {})", rows.len(), cols);
            prop_assert_eq!(text.lines().count(), grid_lines + 1 + cols + 1);
            prop_assert_eq!(text.lines().nth(grid_lines), Some(shape_line.as_str()));
        }

        #[test]
        fn writer_quoted_fields_parse_back(
            values in prop::collection::vec("v[ -~\n]{0,12}", 1..10)
        ) {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["note"]).unwrap();
            for value in &values {
                writer.write_record([value]).unwrap();
            }
            let bytes = writer.into_inner().unwrap();

            let table = Table::from_csv_bytes(&bytes).unwrap();
            prop_assert_eq!(table.n_rows(), values.len());
            for (row, value) in values.iter().enumerate() {
                prop_assert_eq!(table.cell(row, 0), Some(value.as_str()));
            }
        }

        #[test]
        fn rows_wider_than_header_are_rejected(extra in 1usize..4) {
            let wide = vec!["v"; 2 + extra].join(",");
            let text = format!("a,b\nv,v\n{wide}\n");
            let err = Table::from_csv_bytes(text.as_bytes()).unwrap_err();
            prop_assert!(
                matches!(err, LoadError::Malformed { line: 3, .. }),
                "unexpected error: {}",
                err
            );
        }
    }
}
