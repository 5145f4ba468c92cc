//! Tests for row selection, clicks and selection events.

use std::sync::{Arc, Mutex};

use fixgrid::prelude::*;
use serde_json::{Value, json};

fn grid() -> FixedGrid {
    let mut grid = FixedGrid::new(
        vec![ColumnDef::new("name", "Name").fixed(), ColumnDef::new("amount", "Amount")],
        GridOptions {
            show_checkboxes: true,
            ..GridOptions::default()
        },
    )
    .unwrap();
    grid.set_data(vec![
        json!({"id": 1, "name": "Alice", "amount": "100"}),
        json!({"id": 2, "name": "Bob", "amount": "20"}),
        json!({"id": 3, "name": "Carol", "amount": "5"}),
    ]);
    grid
}

fn record(grid: &mut FixedGrid) -> Arc<Mutex<Vec<GridEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    grid.subscribe(move |event| sink.lock().unwrap().push(event.clone()));
    events
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().filter_map(|row| row["id"].as_i64()).collect()
}

fn last_selection(events: &Mutex<Vec<GridEvent>>) -> Vec<i64> {
    let events = events.lock().unwrap();
    match events.last() {
        Some(GridEvent::SelectionChanged(rows)) => ids(rows),
        other => panic!("expected a selection event, got {other:?}"),
    }
}

#[test]
fn test_select_all_then_toggle_one() {
    let mut grid = grid();
    let events = record(&mut grid);

    grid.select_all(true);
    assert_eq!(last_selection(&events), vec![1, 2, 3]);

    grid.toggle_row(1);
    assert_eq!(grid.selection().len(), 2);
    assert_eq!(last_selection(&events), vec![1, 3]);
    assert_eq!(events.lock().unwrap().len(), 2);
}

#[test]
fn test_select_all_false_clears() {
    let mut grid = grid();
    let events = record(&mut grid);

    grid.toggle_row(0);
    grid.select_all(false);
    assert!(grid.selection().is_empty());
    assert_eq!(last_selection(&events), Vec::<i64>::new());
}

#[test]
fn test_header_check_tracks_view() {
    let mut grid = grid();
    assert_eq!(grid.header_check(), HeaderCheck::Unchecked);

    grid.toggle_row(0);
    assert_eq!(grid.header_check(), HeaderCheck::Indeterminate);

    grid.select_all(true);
    assert_eq!(grid.header_check(), HeaderCheck::Checked);
}

#[test]
fn test_selection_follows_rows_through_sorting() {
    let mut grid = grid();
    grid.toggle_row(0);

    grid.toggle_sort("amount").unwrap();
    // Ascending by amount: Carol (5), Bob (20), Alice (100).
    assert_eq!(grid.view_key(2), Some("1"));
    assert!(grid.selection().is_selected("1"));
    assert_eq!(ids(&grid.selected_rows()), vec![1]);

    let frame = grid.frame();
    let checked: Vec<&str> = frame
        .rows
        .iter()
        .filter(|r| r.checked)
        .map(|r| r.key.as_str())
        .collect();
    assert_eq!(checked, vec!["1"]);
}

#[test]
fn test_selection_survives_filtering() {
    let mut grid = grid();
    grid.toggle_row(1);
    grid.set_filter("name", "alice").unwrap();

    assert_eq!(grid.view_len(), 1);
    assert_eq!(ids(&grid.selected_rows()), vec![2]);
    assert_eq!(grid.header_check(), HeaderCheck::Unchecked);
}

#[test]
fn test_select_all_covers_filtered_view() {
    let mut grid = grid();
    grid.set_filter("name", "o").unwrap();
    grid.select_all(true);
    assert_eq!(ids(&grid.selected_rows()), vec![2, 3]);
}

#[test]
fn test_replacing_data_prunes_missing_rows() {
    let mut grid = grid();
    grid.select_all(true);
    let events = record(&mut grid);

    grid.set_data(vec![
        json!({"id": 1, "name": "Alice", "amount": "100"}),
        json!({"id": 3, "name": "Carol", "amount": "5"}),
    ]);
    assert_eq!(last_selection(&events), vec![1, 3]);

    // Same keys again: nothing pruned, nothing announced.
    grid.set_data(grid.rows().to_vec());
    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn test_rows_without_ids_use_positions() {
    let mut grid = FixedGrid::new(vec![ColumnDef::new("name", "Name")], GridOptions::default())
        .unwrap();
    grid.set_data(vec![json!({"name": "a"}), json!({"name": "b"})]);
    grid.toggle_row(1);
    assert!(grid.selection().is_selected("#1"));
}

#[test]
fn test_replacing_data_drops_positional_selection() {
    let mut grid = FixedGrid::new(vec![ColumnDef::new("name", "Name")], GridOptions::default())
        .unwrap();
    grid.set_data(vec![json!({"name": "a"}), json!({"name": "b"})]);
    grid.toggle_row(0);
    let events = record(&mut grid);

    grid.set_data(vec![json!({"name": "z"}), json!({"name": "y"})]);
    assert!(grid.selected_rows().is_empty());
    assert!(grid.selection().is_empty());
    let events = events.lock().unwrap();
    assert!(matches!(
        events.as_slice(),
        [GridEvent::SelectionChanged(rows)] if rows.is_empty()
    ));
}

#[test]
fn test_colliding_ids_select_one_row() {
    let mut grid = FixedGrid::new(vec![ColumnDef::new("id", "Id")], GridOptions::default())
        .unwrap();
    grid.set_data(vec![json!({"id": 1}), json!({"id": "1"}), json!({"id": 2})]);
    grid.toggle_row(0);
    assert_eq!(grid.selected_rows(), vec![json!({"id": 1})]);

    grid.toggle_row(1);
    assert_eq!(grid.selected_rows().len(), 2);
}

#[test]
fn test_duplicate_ids_are_told_apart() {
    let mut grid = FixedGrid::new(vec![ColumnDef::new("name", "Name")], GridOptions::default())
        .unwrap();
    grid.set_data(vec![
        json!({"id": 5, "name": "first"}),
        json!({"id": 5, "name": "second"}),
        json!({"name": "keyless"}),
        json!({"id": "#2", "name": "hash"}),
    ]);
    grid.toggle_row(1);
    assert_eq!(grid.selected_rows(), vec![json!({"id": 5, "name": "second"})]);

    grid.toggle_row(1);
    grid.toggle_row(2);
    assert_eq!(grid.selected_rows(), vec![json!({"name": "keyless"})]);
}

#[test]
fn test_custom_key_path() {
    let mut grid = FixedGrid::new(
        vec![ColumnDef::new("name", "Name")],
        GridOptions {
            key_path: ColumnPath::from("meta.uuid"),
            ..GridOptions::default()
        },
    )
    .unwrap();
    grid.set_data(vec![json!({"name": "a", "meta": {"uuid": "u-1"}})]);
    grid.toggle_row(0);
    assert_eq!(grid.selection().selected(), vec!["u-1".to_string()]);
}

#[test]
fn test_toggle_out_of_range_is_ignored() {
    let mut grid = grid();
    let events = record(&mut grid);
    assert!(!grid.toggle_row(9));
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn test_row_click_reports_row() {
    let mut grid = grid();
    let events = record(&mut grid);

    assert!(grid.click_row(1, ClickTarget::Row));
    let events = events.lock().unwrap();
    assert!(matches!(&events[..], [GridEvent::RowClicked(row)] if row["id"] == json!(2)));
}

#[test]
fn test_checkbox_and_interactive_clicks_do_not_report_row() {
    let mut grid = grid();
    let events = record(&mut grid);

    assert!(grid.click_row(0, ClickTarget::Checkbox));
    assert!(!grid.click_row(0, ClickTarget::Interactive));

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], GridEvent::SelectionChanged(_)));
    assert!(grid.selection().is_selected("1"));
}

#[test]
fn test_unsubscribe_stops_events() {
    let mut grid = grid();
    let events = Arc::new(Mutex::new(0));
    let counter = events.clone();
    let id = grid.subscribe(move |_| *counter.lock().unwrap() += 1);

    grid.toggle_row(0);
    assert!(grid.unsubscribe(id));
    grid.toggle_row(0);
    assert_eq!(*events.lock().unwrap(), 1);
}
