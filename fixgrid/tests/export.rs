//! Tests for CSV export.

use std::fs;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use fixgrid::error::NOTHING_SELECTED_MESSAGE;
use fixgrid::export::{export_filename, to_csv};
use fixgrid::prelude::*;
use serde_json::json;

/// Keeps delivered exports in memory.
#[derive(Default)]
struct MemorySink {
    delivered: Vec<CsvExport>,
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, export: &CsvExport) -> fixgrid::Result<()> {
        self.delivered.push(export.clone());
        Ok(())
    }
}

fn grid(table_name: Option<&str>) -> FixedGrid {
    let mut grid = FixedGrid::new(
        vec![
            ColumnDef::new("name", "Name").fixed(),
            ColumnDef::new("amount", "Amount"),
            ColumnDef::new("tags", "Tags"),
        ],
        GridOptions {
            table_name: table_name.map(str::to_string),
            show_checkboxes: true,
            show_download_button: true,
            ..GridOptions::default()
        },
    )
    .unwrap();
    grid.set_data(vec![
        json!({"id": 1, "name": "Alice", "amount": 100, "tags": ["vip"]}),
        json!({"id": 2, "name": "a,\"b\"", "amount": 2.5, "tags": null}),
        json!({"id": 3, "name": "line\nbreak", "amount": "7"}),
    ]);
    grid
}

#[test]
fn test_quotes_and_commas_are_escaped() {
    let column = ColumnDef::new("v", "V");
    let rows = vec![json!({"v": "a,\"b\""})];
    let csv = to_csv(&rows, &[&column]).unwrap();
    assert_eq!(csv, "V\n\"a,\"\"b\"\"\"");
}

#[test]
fn test_export_selected_rows_over_visible_columns() {
    let mut grid = grid(Some("deals"));
    grid.set_hidden_columns(["tags"]);
    grid.toggle_row(1);
    grid.toggle_row(0);

    let mut sink = MemorySink::default();
    let export = grid.export_selected(&mut sink).unwrap();

    assert_eq!(export.row_count, 2);
    assert_eq!(export.content, "Name,Amount\nAlice,100\n\"a,\"\"b\"\"\",2.5");
    assert_eq!(sink.delivered, vec![export]);
}

#[test]
fn test_export_writes_objects_as_json_and_nulls_empty() {
    let mut grid = grid(None);
    grid.select_all(true);

    let mut sink = MemorySink::default();
    let export = grid.export_selected(&mut sink).unwrap();
    let lines: Vec<&str> = export.content.split('\n').collect();

    assert_eq!(lines[0], "Name,Amount,Tags");
    assert_eq!(lines[1], "Alice,100,\"[\"\"vip\"\"]\"");
    assert_eq!(lines[2], "\"a,\"\"b\"\"\",2.5,");
    assert_eq!(lines[3], "\"line");
    assert_eq!(lines[4], "break\",7,");
    assert!(!export.content.ends_with('\n'));
}

#[test]
fn test_export_with_nothing_selected_warns() {
    let mut grid = grid(Some("deals"));
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink_warnings = warnings.clone();
    grid.subscribe(move |event| {
        if let GridEvent::Warning(message) = event {
            sink_warnings.lock().unwrap().push(message.clone());
        }
    });

    let mut sink = MemorySink::default();
    let err = grid.export_selected(&mut sink).unwrap_err();

    assert!(matches!(err, GridError::NothingSelected));
    assert!(err.is_user_warning());
    assert_eq!(err.to_string(), NOTHING_SELECTED_MESSAGE);
    assert!(sink.delivered.is_empty());
    assert_eq!(
        *warnings.lock().unwrap(),
        vec!["Please select at least one row to download".to_string()]
    );
}

#[test]
fn test_export_visible_follows_filter_and_sort() {
    let mut grid = grid(None);
    grid.set_filter("name", "a").unwrap();
    grid.toggle_sort("amount").unwrap();

    let mut sink = MemorySink::default();
    let export = grid.export_visible(&mut sink).unwrap();
    assert_eq!(
        export.content,
        "Name,Amount,Tags\n\"a,\"\"b\"\"\",2.5,\n\"line\nbreak\",7,\nAlice,100,\"[\"\"vip\"\"]\""
    );
}

#[test]
fn test_filename_uses_table_name_and_date() {
    let mut grid = grid(Some("invoices"));
    grid.select_all(true);

    let mut sink = MemorySink::default();
    let export = grid.export_selected(&mut sink).unwrap();
    let today = Utc::now().date_naive();
    assert_eq!(export.filename, export_filename(Some("invoices"), today));
    assert!(export.filename.starts_with("invoices_"));
    assert!(export.filename.ends_with(".csv"));

    let mut unnamed = self::grid(None);
    unnamed.select_all(true);
    let export = unnamed.export_selected(&mut sink).unwrap();
    assert!(export.filename.starts_with("export_"));
}

#[test]
fn test_directory_sink_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut grid = grid(Some("deals"));
    grid.select_all(true);

    let mut sink = DirectorySink::new(dir.path().join("out"));
    let export = grid.export_selected(&mut sink).unwrap();

    let path = dir.path().join("out").join(&export.filename);
    assert_eq!(sink.written().to_vec(), vec![path.clone()]);
    assert_eq!(fs::read_to_string(path).unwrap(), export.content);
}
