//! The composed frame: everything a front end needs to paint the grid.

use crate::column::ResizeEdge;
use crate::display::DisplayValue;
use crate::selection::HeaderCheck;
use crate::sort::SortDirection;
use crate::style::{Rgb, StyleHints};

/// Stacking order of the grid's layers.
pub mod z {
    pub const HEADER: u32 = 20;
    pub const FILTER: u32 = 20;
    pub const BODY_FIXED: u32 = 30;
    pub const HEADER_FIXED: u32 = 40;
    pub const FILTER_FIXED: u32 = 40;
    pub const RESIZE_HANDLE: u32 = 200;
    pub const LOADING_OVERLAY: u32 = 1000;
}

/// Drop shadow on the trailing edge of the last fixed column.
pub const FIXED_SHADOW: &str = "2px 0px 4px rgba(0,0,0,0.1)";

/// Header height per line of label text, used until the host measures it.
pub const HEADER_LINE_HEIGHT: f64 = 22.0;

/// Where a cell sits horizontally and how it stacks.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub width: f64,
    /// Sticky offset from the leading edge. `None` for scrolling cells.
    pub sticky_left: Option<f64>,
    pub z_index: Option<u32>,
    /// Draw [`FIXED_SHADOW`] on the trailing edge.
    pub shadow: bool,
}

impl Placement {
    pub fn is_sticky(&self) -> bool {
        self.sticky_left.is_some()
    }
}

/// A draggable edge of a header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeHandle {
    pub edge: ResizeEdge,
    /// Column the handle resizes.
    pub target: String,
    pub z_index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub placement: Placement,
    /// Clicking the label toggles the sort.
    pub sortable: bool,
    /// Direction shown next to the label when this column is the sort key.
    pub sort: Option<SortDirection>,
    pub resize_handles: Vec<ResizeHandle>,
}

/// The select-all checkbox cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCheckbox {
    pub placement: Placement,
    pub state: HeaderCheck,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderRow {
    pub checkbox: Option<HeaderCheckbox>,
    pub cells: Vec<HeaderCell>,
}

/// What a filter cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterContent {
    /// A search box with its current text. `clearable` when non-empty.
    Input { value: String, clearable: bool },
    /// The column's aggregate, shown instead of a search box.
    Total(String),
    /// Not searchable.
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterCell {
    pub column_id: String,
    pub placement: Placement,
    pub content: FilterContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterRow {
    /// Sticky top offset: the header's height.
    pub top: f64,
    /// Empty spacer under the header checkbox.
    pub spacer: Option<Placement>,
    pub cells: Vec<FilterCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyCell {
    pub column_id: String,
    pub placement: Placement,
    pub value: DisplayValue,
    pub background: Rgb,
    pub foreground: Option<Rgb>,
    /// Hints from the column's cell style callback, passed through untouched.
    pub style: Option<StyleHints>,
}

/// The per-row checkbox cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCheckbox {
    pub placement: Placement,
    pub checked: bool,
    pub background: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRow {
    /// Stable row key.
    pub key: String,
    /// Position in the input data.
    pub source: usize,
    pub checked: bool,
    pub highlighted: bool,
    pub hovered: bool,
    pub background: Rgb,
    pub foreground: Option<Rgb>,
    pub checkbox: Option<RowCheckbox>,
    pub cells: Vec<BodyCell>,
}

/// Summary line above the grid with the download action.
#[derive(Debug, Clone, PartialEq)]
pub struct Toolbar {
    pub summary: String,
    pub download_enabled: bool,
}

/// Covers the grid while loading, keeping the table mounted underneath.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingOverlay {
    pub z_index: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    pub toolbar: Option<Toolbar>,
    /// Sum of visible column widths, including the checkbox column.
    pub table_width: f64,
    /// Width of the scroll container when it hugs the table.
    pub container_width: Option<f64>,
    pub header: HeaderRow,
    pub filter: FilterRow,
    pub rows: Vec<BodyRow>,
    pub loading: Option<LoadingOverlay>,
}

impl GridFrame {
    pub fn row(&self, key: &str) -> Option<&BodyRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn header_cell(&self, column_id: &str) -> Option<&HeaderCell> {
        self.header.cells.iter().find(|c| c.column_id == column_id)
    }
}
