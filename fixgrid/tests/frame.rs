//! Tests for the composed grid frame.

use fixgrid::layout::{FIXED_SHADOW, HEADER_LINE_HEIGHT, Placement, z};
use fixgrid::prelude::*;
use fixgrid::style::palette;
use serde_json::json;

const TINT: Rgb = Rgb::hex(0xdbeafe);
const ALERT: Rgb = Rgb::hex(0xfee2e2);

fn columns() -> Vec<ColumnDef> {
    vec![
        ColumnDef::new("number", "Order").width(100.0).fixed(),
        ColumnDef::new("client", "Client").width(80.0).fixed(),
        ColumnDef::new("amount", "Amount").width(120.0).show_total("1 250"),
        ColumnDef::new("notes", "Notes").searchable(false).sortable(false),
    ]
}

fn rows() -> Vec<serde_json::Value> {
    vec![
        json!({"id": "o-1", "number": "1001", "client": "Acme", "amount": 1000, "notes": "", "parent": 1}),
        json!({"id": "o-2", "number": "1002", "client": "Beta", "amount": 200, "notes": "late", "parent": 1}),
        json!({"id": "o-3", "number": "1003", "client": "Core", "amount": 50, "notes": "", "parent": 2}),
    ]
}

fn grid(options: GridOptions) -> FixedGrid {
    let mut grid = FixedGrid::new(columns(), options).unwrap();
    grid.set_data(rows());
    grid
}

fn with_checkboxes() -> GridOptions {
    GridOptions {
        show_checkboxes: true,
        show_download_button: true,
        ..GridOptions::default()
    }
}

#[test]
fn test_fixed_columns_are_sticky_and_stacked() {
    let frame = grid(GridOptions::default()).frame();
    let header: Vec<&Placement> = frame.header.cells.iter().map(|c| &c.placement).collect();

    assert_eq!(header[0].sticky_left, Some(0.0));
    assert_eq!(header[0].z_index, Some(z::HEADER_FIXED));
    assert!(!header[0].shadow);

    assert_eq!(header[1].sticky_left, Some(100.0));
    assert!(header[1].shadow);

    assert_eq!(header[2].sticky_left, None);
    assert_eq!(header[2].z_index, Some(z::HEADER));

    let body = &frame.rows[0].cells;
    assert_eq!(body[0].placement.z_index, Some(z::BODY_FIXED));
    assert_eq!(body[2].placement.z_index, None);
    assert!(body[1].placement.shadow);

    let filter = &frame.filter.cells;
    assert_eq!(filter[0].placement.z_index, Some(z::FILTER_FIXED));
    assert_eq!(filter[3].placement.z_index, Some(z::FILTER));
    assert_eq!(FIXED_SHADOW, "2px 0px 4px rgba(0,0,0,0.1)");
}

#[test]
fn test_checkbox_column_shifts_fixed_columns() {
    let frame = grid(with_checkboxes()).frame();

    let checkbox = frame.header.checkbox.as_ref().unwrap();
    assert_eq!(checkbox.placement.sticky_left, Some(0.0));
    assert_eq!(checkbox.placement.width, 50.0);
    assert_eq!(frame.header.cells[0].placement.sticky_left, Some(50.0));
    assert_eq!(frame.header.cells[1].placement.sticky_left, Some(150.0));
    assert_eq!(frame.table_width, 100.0 + 80.0 + 120.0 + 150.0 + 50.0);
    assert!(frame.filter.spacer.is_some());
    assert!(frame.rows.iter().all(|r| r.checkbox.is_some()));
}

#[test]
fn test_resize_handles_on_header_cells() {
    let frame = grid(GridOptions::default()).frame();

    let first = &frame.header.cells[0].resize_handles;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].edge, ResizeEdge::Right);
    assert_eq!(first[0].target, "number");

    let second = &frame.header.cells[1].resize_handles;
    let targets: Vec<(ResizeEdge, &str)> =
        second.iter().map(|h| (h.edge, h.target.as_str())).collect();
    assert_eq!(
        targets,
        vec![(ResizeEdge::Right, "client"), (ResizeEdge::Left, "number")]
    );
    assert!(second.iter().all(|h| h.z_index == z::RESIZE_HANDLE));
}

#[test]
fn test_filter_row_follows_header_height() {
    let mut grid = grid(GridOptions::default());
    assert_eq!(grid.frame().filter.top, HEADER_LINE_HEIGHT);

    grid.set_header_height(47.0);
    assert_eq!(grid.frame().filter.top, 47.0);

    let tall = self::grid(GridOptions {
        header_line_height: 2.0,
        ..GridOptions::default()
    });
    assert_eq!(tall.frame().filter.top, 44.0);
}

#[test]
fn test_filter_cell_contents() {
    let mut grid = grid(GridOptions::default());
    grid.set_filter("client", "ac").unwrap();
    let frame = grid.frame();

    let contents: Vec<&FilterContent> = frame.filter.cells.iter().map(|c| &c.content).collect();
    assert_eq!(
        contents[0],
        &FilterContent::Input {
            value: String::new(),
            clearable: false
        }
    );
    assert_eq!(
        contents[1],
        &FilterContent::Input {
            value: "ac".into(),
            clearable: true
        }
    );
    assert_eq!(contents[2], &FilterContent::Total("1 250".into()));
    assert_eq!(contents[3], &FilterContent::Blank);
}

#[test]
fn test_sort_indicator_and_lock() {
    let mut grid = grid(GridOptions::default());
    grid.toggle_sort("amount").unwrap();

    let frame = grid.frame();
    assert_eq!(
        frame.header_cell("amount").unwrap().sort,
        Some(SortDirection::Ascending)
    );
    assert_eq!(frame.header_cell("client").unwrap().sort, None);
    assert!(!frame.header_cell("notes").unwrap().sortable);

    grid.set_sorting_locked(true);
    let frame = grid.frame();
    assert_eq!(frame.header_cell("amount").unwrap().sort, None);
    assert!(!frame.header_cell("amount").unwrap().sortable);
    // Lock restores input order.
    let keys: Vec<&str> = frame.rows.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["o-1", "o-2", "o-3"]);
}

#[test]
fn test_row_background_layers() {
    let mut grid = grid(with_checkboxes()).with_row_style(|row| {
        (row["notes"] == json!("late")).then(|| StyleHints::new().background(ALERT))
    });
    grid.hover_row(Some(0));
    let frame = grid.frame();

    assert_eq!(frame.rows[0].background, palette::HOVER_BG);
    assert_eq!(frame.rows[1].background, ALERT);
    assert_eq!(frame.rows[2].background, palette::DEFAULT_BG);

    grid.toggle_row(1);
    grid.set_highlighted(["o-3"]);
    let frame = grid.frame();
    assert_eq!(frame.rows[1].background, palette::SELECTED_BG);
    assert_eq!(frame.rows[1].foreground, Some(palette::SELECTED_FG));
    assert!(frame.rows[2].highlighted);
    assert_eq!(frame.rows[2].background, palette::SELECTED_BG);
}

#[test]
fn test_cell_style_beats_hover_but_not_selection() {
    let columns = vec![
        ColumnDef::new("number", "Order").fixed(),
        ColumnDef::new("amount", "Amount").cell_style(|value, _| {
            value
                .and_then(|v| v.as_f64())
                .filter(|amount| *amount < 100.0)
                .map(|_| StyleHints::new().background(TINT))
        }),
    ];
    let mut grid = FixedGrid::new(columns, with_checkboxes()).unwrap();
    grid.set_data(rows());
    grid.hover_row(Some(2));

    let frame = grid.frame();
    let row = &frame.rows[2];
    assert_eq!(row.cells[0].background, palette::HOVER_BG);
    assert_eq!(row.cells[1].background, TINT);
    assert_eq!(row.cells[1].style, Some(StyleHints::new().background(TINT)));

    grid.toggle_row(2);
    let frame = grid.frame();
    assert_eq!(frame.rows[2].cells[1].background, palette::SELECTED_BG);
}

#[test]
fn test_grouped_banding() {
    let grid = grid(GridOptions {
        row_banding: RowBanding::Grouped {
            path: "parent".into(),
            color: TINT,
        },
        ..GridOptions::default()
    });
    let frame = grid.frame();
    let backgrounds: Vec<Rgb> = frame.rows.iter().map(|r| r.background).collect();
    assert_eq!(
        backgrounds,
        vec![palette::DEFAULT_BG, palette::DEFAULT_BG, TINT]
    );
}

#[test]
fn test_toolbar_summary() {
    let mut grid = grid(with_checkboxes());
    let toolbar = grid.frame().toolbar.unwrap();
    assert_eq!(toolbar.summary, "3 items");
    assert!(!toolbar.download_enabled);

    grid.toggle_row(0);
    let toolbar = grid.frame().toolbar.unwrap();
    assert_eq!(toolbar.summary, "1 item selected");
    assert!(toolbar.download_enabled);

    assert!(self::grid(GridOptions::default()).frame().toolbar.is_none());
}

#[test]
fn test_loading_overlay_keeps_table() {
    let mut grid = grid(GridOptions::default());
    grid.set_loading(true);
    let frame = grid.frame();
    assert_eq!(frame.loading.as_ref().map(|o| o.z_index), Some(z::LOADING_OVERLAY));
    assert_eq!(frame.rows.len(), 3);

    grid.set_loading(false);
    assert!(grid.frame().loading.is_none());
}

#[test]
fn test_fit_content_sizes_container() {
    let grid = grid(GridOptions {
        fit_content: true,
        ..GridOptions::default()
    });
    let frame = grid.frame();
    assert_eq!(frame.container_width, Some(frame.table_width));
    assert_eq!(frame.table_width, 450.0);
}

#[test]
fn test_hidden_columns_leave_frame() {
    let grid = grid(GridOptions {
        hidden_columns: vec!["client".into()],
        ..GridOptions::default()
    });
    let frame = grid.frame();
    let ids: Vec<&str> = frame.header.cells.iter().map(|c| c.column_id.as_str()).collect();
    assert_eq!(ids, vec!["number", "amount", "notes"]);
    assert!(frame.header.cells[0].placement.shadow);
}

#[test]
fn test_live_resize_shows_in_frame() {
    let mut grid = grid(GridOptions::default());
    grid.begin_resize("client", 0.0).unwrap();
    grid.pointer_move(20.0);
    assert_eq!(grid.frame().header.cells[1].placement.width, 80.0);

    grid.end_resize();
    let frame = grid.frame();
    assert_eq!(frame.header.cells[1].placement.width, 100.0);
    assert_eq!(frame.rows[0].cells[1].placement.width, 100.0);
}
