//! Layout shell: composes column geometry, view state and cell content into
//! a [`GridFrame`].

mod frame;
mod paint;

use std::collections::HashSet;

pub use frame::{
    BodyCell, BodyRow, FIXED_SHADOW, FilterCell, FilterContent, FilterRow, GridFrame,
    HEADER_LINE_HEIGHT, HeaderCell, HeaderCheckbox, HeaderRow, LoadingOverlay, Placement,
    ResizeHandle, RowCheckbox, Toolbar, z,
};
pub use paint::{RowBanding, RowStyleFn};

use crate::cell::{cell_style, render_cell};
use crate::column::{ColumnDef, ColumnLayout, ColumnModel, ColumnSlot, SELECTION_COLUMN_WIDTH};
use crate::filter::FilterMap;
use crate::selection::Selection;
use crate::sort::SortState;
use crate::value::Row;

use paint::{RowLayers, row_style};

/// Everything a frame is composed from.
pub(crate) struct FrameSource<'a> {
    pub columns: &'a ColumnModel,
    pub layout: &'a ColumnLayout,
    pub rows: &'a [Row],
    pub keys: &'a [String],
    /// Input positions of the rows in view, in display order.
    pub view: &'a [usize],
    pub selection: &'a Selection,
    pub highlighted: &'a HashSet<String>,
    /// Hovered view position.
    pub hovered: Option<usize>,
    /// Sort shown in the header; `None` while sorting is locked.
    pub sort: Option<&'a SortState>,
    pub sorting_locked: bool,
    pub filters: &'a FilterMap,
    pub row_style: Option<&'a RowStyleFn>,
    pub banding: &'a RowBanding,
    pub show_checkboxes: bool,
    pub show_toolbar: bool,
    pub fit_content: bool,
    pub header_height: f64,
    pub loading: bool,
}

/// Toolbar summary: the selection count, or the number of rows in view.
pub fn summary(selected: usize, in_view: usize) -> String {
    match selected {
        0 => format!("{in_view} items"),
        1 => "1 item selected".to_string(),
        n => format!("{n} items selected"),
    }
}

/// Placement of a column cell in a row whose fixed cells stack at `fixed_z`.
fn placement(slot: &ColumnSlot, shift: f64, fixed_z: u32, scroll_z: Option<u32>) -> Placement {
    Placement {
        width: slot.width,
        sticky_left: slot.left.map(|left| left + shift),
        z_index: if slot.fixed { Some(fixed_z) } else { scroll_z },
        shadow: slot.last_fixed,
    }
}

fn checkbox_placement(fixed_z: u32) -> Placement {
    Placement {
        width: SELECTION_COLUMN_WIDTH,
        sticky_left: Some(0.0),
        z_index: Some(fixed_z),
        shadow: false,
    }
}

pub(crate) fn compose(src: &FrameSource<'_>) -> GridFrame {
    let shift = if src.show_checkboxes {
        SELECTION_COLUMN_WIDTH
    } else {
        0.0
    };
    let visible = src.columns.visible();
    let table_width = src.layout.total_width(src.show_checkboxes);

    GridFrame {
        toolbar: src.show_toolbar.then(|| Toolbar {
            summary: summary(src.selection.len(), src.view.len()),
            download_enabled: !src.selection.is_empty(),
        }),
        table_width,
        container_width: src.fit_content.then_some(table_width),
        header: header_row(src, &visible, shift),
        filter: filter_row(src, &visible, shift),
        rows: body_rows(src, &visible, shift),
        loading: src.loading.then_some(LoadingOverlay {
            z_index: z::LOADING_OVERLAY,
        }),
    }
}

fn header_row(src: &FrameSource<'_>, visible: &[&ColumnDef], shift: f64) -> HeaderRow {
    let checkbox = src.show_checkboxes.then(|| HeaderCheckbox {
        placement: checkbox_placement(z::HEADER_FIXED),
        state: src
            .selection
            .header_check(src.view.iter().map(|&i| src.keys[i].as_str())),
    });

    let cells = visible
        .iter()
        .zip(&src.layout.slots)
        .map(|(column, slot)| {
            let sort = src
                .sort
                .filter(|s| column.sortable && s.column_id == column.id)
                .map(|s| s.direction);
            let resize_handles = ColumnLayout::resize_edges(slot.index)
                .into_iter()
                .filter_map(|edge| {
                    src.layout
                        .resize_target(slot.index, edge)
                        .map(|target| ResizeHandle {
                            edge,
                            target: target.to_string(),
                            z_index: z::RESIZE_HANDLE,
                        })
                })
                .collect();
            HeaderCell {
                column_id: column.id.clone(),
                label: column.label.clone(),
                placement: placement(slot, shift, z::HEADER_FIXED, Some(z::HEADER)),
                sortable: column.sortable && !src.sorting_locked,
                sort,
                resize_handles,
            }
        })
        .collect();

    HeaderRow { checkbox, cells }
}

fn filter_row(src: &FrameSource<'_>, visible: &[&ColumnDef], shift: f64) -> FilterRow {
    let cells = visible
        .iter()
        .zip(&src.layout.slots)
        .map(|(column, slot)| {
            let content = match &column.show_total {
                Some(total) => FilterContent::Total(total.clone()),
                None if column.searchable => {
                    let value = src.filters.get(&column.id).to_string();
                    FilterContent::Input {
                        clearable: !value.is_empty(),
                        value,
                    }
                }
                None => FilterContent::Blank,
            };
            FilterCell {
                column_id: column.id.clone(),
                placement: placement(slot, shift, z::FILTER_FIXED, Some(z::FILTER)),
                content,
            }
        })
        .collect();

    FilterRow {
        top: src.header_height,
        spacer: src
            .show_checkboxes
            .then(|| checkbox_placement(z::FILTER_FIXED)),
        cells,
    }
}

fn body_rows(src: &FrameSource<'_>, visible: &[&ColumnDef], shift: f64) -> Vec<BodyRow> {
    let bands = src
        .banding
        .bands(src.view.iter().map(|&i| &src.rows[i]));

    src.view
        .iter()
        .zip(bands)
        .enumerate()
        .map(|(position, (&source, band))| {
            let row = &src.rows[source];
            let key = &src.keys[source];
            let checked = src.selection.is_selected(key);
            let highlighted = src.highlighted.contains(key);
            let hovered = src.hovered == Some(position);
            let layers = RowLayers {
                selected: checked || highlighted,
                row_style: src.row_style.and_then(|style| row_style(style, row)),
                hovered,
                band,
            };
            let (background, foreground) = layers.row_colors();

            let cells = visible
                .iter()
                .zip(&src.layout.slots)
                .map(|(column, slot)| {
                    let style = cell_style(column, row);
                    let (background, foreground) = layers.cell_colors(style.as_ref());
                    BodyCell {
                        column_id: column.id.clone(),
                        placement: placement(slot, shift, z::BODY_FIXED, None),
                        value: render_cell(column, row),
                        background,
                        foreground,
                        style,
                    }
                })
                .collect();

            BodyRow {
                key: key.clone(),
                source,
                checked,
                highlighted,
                hovered,
                background,
                foreground,
                checkbox: src.show_checkboxes.then(|| RowCheckbox {
                    placement: checkbox_placement(z::BODY_FIXED),
                    checked,
                    background,
                }),
                cells,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_wording() {
        assert_eq!(summary(0, 12), "12 items");
        assert_eq!(summary(1, 12), "1 item selected");
        assert_eq!(summary(3, 12), "3 items selected");
    }
}
