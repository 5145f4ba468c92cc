//! The grid: owns the view state and derives the visible rows from it.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::column::{ColumnDef, ColumnLayout, ColumnModel, ColumnWidths, ResizeEdge};
use crate::error::{GridError, NOTHING_SELECTED_MESSAGE, Result};
use crate::events::{EventBus, GridEvent, SubscriptionId};
use crate::export::{CsvExport, ExportSink, export_filename, to_csv};
use crate::filter::FilterMap;
use crate::layout::{FrameSource, GridFrame, HEADER_LINE_HEIGHT, RowBanding, RowStyleFn, compose};
use crate::resize::{DragHost, FrameHandle, FrameQueue, ResizeController};
use crate::selection::{HeaderCheck, Selection, assign_keys};
use crate::sort::{SortState, sort_indices};
use crate::style::StyleHints;
use crate::value::{ColumnPath, Row};

/// Grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Used as the export filename stem.
    pub table_name: Option<String>,
    /// Path to the stable row key used for selection and highlighting.
    pub key_path: ColumnPath,
    /// Initial column widths, overriding the columns' own.
    pub default_dimensions: HashMap<String, f64>,
    pub hidden_columns: Vec<String>,
    pub show_checkboxes: bool,
    pub show_download_button: bool,
    /// Size the container to the table instead of filling the host.
    pub fit_content: bool,
    /// Header label line-height multiplier, used before the header is measured.
    pub header_line_height: f64,
    pub row_banding: RowBanding,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            key_path: ColumnPath::from("id"),
            default_dimensions: HashMap::new(),
            hidden_columns: Vec::new(),
            show_checkboxes: false,
            show_download_button: false,
            fit_content: false,
            header_line_height: 1.0,
            row_banding: RowBanding::None,
        }
    }
}

/// What part of a body row was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The row itself.
    Row,
    /// The row's selection checkbox.
    Checkbox,
    /// A button or other interactive element inside a cell.
    Interactive,
}

/// A frozen-column data grid.
///
/// Holds the columns, the rows and all transient view state: widths,
/// filters, sort, selection, hover. Every change that affects which rows are
/// shown re-runs filtering and sorting over the full row set.
pub struct FixedGrid {
    columns: ColumnModel,
    options: GridOptions,
    widths: ColumnWidths,
    rows: Vec<Row>,
    keys: Vec<String>,
    /// Keys that only name a row's position in the current data.
    positional_keys: HashSet<String>,
    /// Input positions of the rows in view, in display order.
    view: Vec<usize>,
    filters: FilterMap,
    sort: Option<SortState>,
    sorting_locked: bool,
    reset_sorting: bool,
    selection: Selection,
    highlighted: HashSet<String>,
    hovered: Option<usize>,
    header_height: Option<f64>,
    loading: bool,
    row_style: Option<RowStyleFn>,
    resize: ResizeController,
    events: EventBus,
}

impl FixedGrid {
    /// Build a grid over `columns`.
    ///
    /// Fails if column ids repeat or a fixed column follows a scrolling one.
    pub fn new(columns: Vec<ColumnDef>, options: GridOptions) -> Result<Self> {
        let mut model = ColumnModel::new(columns)?;
        model.set_hidden(options.hidden_columns.iter().cloned());
        let widths = ColumnWidths::initialize(model.columns(), &options.default_dimensions);
        debug!(
            "Created grid '{}' with {} columns",
            options.table_name.as_deref().unwrap_or("export"),
            model.columns().len()
        );
        Ok(Self {
            columns: model,
            options,
            widths,
            rows: Vec::new(),
            keys: Vec::new(),
            positional_keys: HashSet::new(),
            view: Vec::new(),
            filters: FilterMap::new(),
            sort: None,
            sorting_locked: false,
            reset_sorting: false,
            selection: Selection::new(),
            highlighted: HashSet::new(),
            hovered: None,
            header_height: None,
            loading: false,
            row_style: None,
            resize: ResizeController::new(Box::new(FrameQueue::new())),
            events: EventBus::new(),
        })
    }

    /// Use `host` for frame scheduling and pointer listeners during drags.
    pub fn with_drag_host(mut self, host: Box<dyn DragHost + Send>) -> Self {
        self.resize.cancel(&mut self.widths);
        self.resize = ResizeController::new(host);
        self
    }

    /// Style whole rows, e.g. to tint rows by status.
    pub fn with_row_style(
        mut self,
        style: impl Fn(&Row) -> Option<StyleHints> + Send + Sync + 'static,
    ) -> Self {
        self.row_style = Some(Arc::new(style));
        self
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn columns(&self) -> &ColumnModel {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    // ---------------------------------------------------------------------
    // Data and view
    // ---------------------------------------------------------------------

    /// Replace the rows.
    ///
    /// Selected keys that no longer exist are dropped, and so are keys that
    /// only named a position in the old rows. If that changes the selection,
    /// listeners are told.
    pub fn set_data(&mut self, rows: Vec<Row>) {
        let assigned = assign_keys(&rows, &self.options.key_path);
        let stale = std::mem::replace(&mut self.positional_keys, assigned.positional);
        self.keys = assigned.keys;
        self.rows = rows;

        let present: HashSet<&str> = self.keys.iter().map(String::as_str).collect();
        let removed = self
            .selection
            .retain(|key| !stale.contains(key) && present.contains(key));
        self.refresh();

        if !removed.is_empty() {
            debug!("Dropped {} selected rows no longer present", removed.len());
            self.notify_selection();
        }
    }

    /// Rows in view, filtered and sorted.
    pub fn view(&self) -> Vec<&Row> {
        self.view.iter().map(|&i| &self.rows[i]).collect()
    }

    /// Input positions of the rows in view.
    pub fn view_indices(&self) -> &[usize] {
        &self.view
    }

    pub fn view_len(&self) -> usize {
        self.view.len()
    }

    /// Stable key of the row at view position `index`.
    pub fn view_key(&self, index: usize) -> Option<&str> {
        self.view.get(index).map(|&i| self.keys[i].as_str())
    }

    fn refresh(&mut self) {
        let mut view = self.filters.apply(&self.columns, &self.rows);
        if !self.sorting_locked
            && let Some(sort) = &self.sort
            && let Some(column) = self.columns.visible_column(&sort.column_id)
            && column.sortable
        {
            sort_indices(&mut view, &self.rows, column, sort.direction);
        }
        self.view = view;
        if self.hovered.is_some_and(|h| h >= self.view.len()) {
            self.hovered = None;
        }
    }

    pub fn set_hidden_columns<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns.set_hidden(ids);
        self.options.hidden_columns = self.columns.hidden().iter().cloned().collect();
        self.refresh();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Report the rendered header height, which places the filter row.
    pub fn set_header_height(&mut self, height: f64) {
        self.header_height = Some(height);
    }

    /// Sticky top offset of the filter row.
    pub fn filter_row_top(&self) -> f64 {
        self.header_height
            .unwrap_or(HEADER_LINE_HEIGHT * self.options.header_line_height)
    }

    pub fn hover_row(&mut self, index: Option<usize>) {
        self.hovered = index.filter(|&i| i < self.view.len());
    }

    /// Rows to paint with the selection color, by key.
    pub fn set_highlighted<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.highlighted = keys.into_iter().map(Into::into).collect();
    }

    // ---------------------------------------------------------------------
    // Sorting
    // ---------------------------------------------------------------------

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Header click on `column_id`.
    ///
    /// Non-sortable columns and a locked grid ignore the click.
    pub fn toggle_sort(&mut self, column_id: &str) -> Result<()> {
        let column = self
            .columns
            .get(column_id)
            .ok_or_else(|| GridError::unknown_column(column_id))?;
        if !column.sortable || self.sorting_locked {
            return Ok(());
        }
        let next = SortState::after_click(self.sort.as_ref(), column_id);
        debug!("Sorting by '{}' {:?}", next.column_id, next.direction);
        self.sort = Some(next);
        self.refresh();
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        if self.sort.take().is_some() {
            self.refresh();
        }
    }

    /// Host reset signal. Each change of `flag` clears the sort.
    pub fn set_reset_sorting(&mut self, flag: bool) {
        if flag != self.reset_sorting {
            self.reset_sorting = flag;
            self.clear_sort();
        }
    }

    /// Lock sorting: header clicks are ignored and no sort is applied.
    pub fn set_sorting_locked(&mut self, locked: bool) {
        if locked != self.sorting_locked {
            self.sorting_locked = locked;
            self.refresh();
        }
    }

    pub fn sorting_locked(&self) -> bool {
        self.sorting_locked
    }

    // ---------------------------------------------------------------------
    // Filtering
    // ---------------------------------------------------------------------

    pub fn filter(&self, column_id: &str) -> &str {
        self.filters.get(column_id)
    }

    pub fn set_filter(&mut self, column_id: &str, text: impl Into<String>) -> Result<()> {
        if self.columns.get(column_id).is_none() {
            return Err(GridError::unknown_column(column_id));
        }
        let text = text.into();
        debug!("Filter on '{column_id}' set to {text:?}");
        self.filters.set(column_id, text);
        self.refresh();
        Ok(())
    }

    /// Clear one column's filter. Returns whether one was set.
    pub fn clear_filter(&mut self, column_id: &str) -> bool {
        let cleared = self.filters.clear(column_id);
        if cleared {
            self.refresh();
        }
        cleared
    }

    // ---------------------------------------------------------------------
    // Selection
    // ---------------------------------------------------------------------

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Selected rows in input order, including rows hidden by a filter.
    pub fn selected_rows(&self) -> Vec<Row> {
        self.keys
            .iter()
            .zip(&self.rows)
            .filter(|(key, _)| self.selection.is_selected(key))
            .map(|(_, row)| row.clone())
            .collect()
    }

    /// Flip the row at view position `index`. Returns `false` if out of range.
    pub fn toggle_row(&mut self, index: usize) -> bool {
        let Some(&source) = self.view.get(index) else {
            return false;
        };
        let key = self.keys[source].clone();
        let selected = self.selection.toggle(&key);
        trace!("Row '{key}' selected: {selected}");
        self.notify_selection();
        true
    }

    /// Select every row in view, or clear the selection.
    pub fn select_all(&mut self, checked: bool) {
        if checked {
            let keys: Vec<String> = self.view.iter().map(|&i| self.keys[i].clone()).collect();
            self.selection.select_all(keys);
        } else {
            self.selection.clear();
        }
        self.notify_selection();
    }

    pub fn header_check(&self) -> HeaderCheck {
        self.selection
            .header_check(self.view.iter().map(|&i| self.keys[i].as_str()))
    }

    /// Click on the row at view position `index`.
    ///
    /// Only a click on the row itself reports `RowClicked`; checkbox clicks
    /// toggle selection and clicks on interactive content are ignored.
    pub fn click_row(&mut self, index: usize, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Row => {
                let Some(&source) = self.view.get(index) else {
                    return false;
                };
                let row = self.rows[source].clone();
                self.events.publish(&GridEvent::RowClicked(row));
                true
            }
            ClickTarget::Checkbox => self.toggle_row(index),
            ClickTarget::Interactive => false,
        }
    }

    fn notify_selection(&mut self) {
        let rows = self.selected_rows();
        self.events.publish(&GridEvent::SelectionChanged(rows));
    }

    // ---------------------------------------------------------------------
    // Column geometry and resizing
    // ---------------------------------------------------------------------

    pub fn layout(&self) -> ColumnLayout {
        self.columns.layout(&self.widths)
    }

    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Effective width of a column, including a live resize preview.
    pub fn column_width(&self, column_id: &str) -> Option<f64> {
        let column = self.columns.get(column_id)?;
        Some(self.columns.effective_width(column, &self.widths))
    }

    /// Start dragging the width of `column_id` from pointer position `x`.
    pub fn begin_resize(&mut self, column_id: &str, x: f64) -> Result<()> {
        let width = self
            .column_width(column_id)
            .ok_or_else(|| GridError::unknown_column(column_id))?;
        self.resize.begin(column_id, width, x, &mut self.widths);
        Ok(())
    }

    /// Start a drag on the `edge` handle of the visible column at `index`.
    ///
    /// Returns `false` when there is no handle there.
    pub fn begin_resize_at(&mut self, index: usize, edge: ResizeEdge, x: f64) -> bool {
        let layout = self.layout();
        let Some(target) = layout.resize_target(index, edge) else {
            return false;
        };
        let Some(slot) = layout.slot(target) else {
            return false;
        };
        self.resize.begin(&slot.id, slot.width, x, &mut self.widths);
        true
    }

    /// Pointer moved during a drag. Returns the width the drag now targets.
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        self.resize.pointer_move(x)
    }

    /// Animation-frame callback for a drag preview.
    pub fn on_frame(&mut self, handle: FrameHandle) -> bool {
        self.resize.on_frame(handle, &mut self.widths)
    }

    /// Pointer released. Returns the committed column and width.
    pub fn end_resize(&mut self) -> Option<(String, f64)> {
        self.resize.end(&mut self.widths)
    }

    pub fn cancel_resize(&mut self) {
        self.resize.cancel(&mut self.widths);
    }

    pub fn is_resizing(&self) -> bool {
        self.resize.is_active()
    }

    // ---------------------------------------------------------------------
    // Export
    // ---------------------------------------------------------------------

    /// Export the selected rows over the visible columns.
    ///
    /// With nothing selected, listeners get a warning and no file is made.
    pub fn export_selected(&mut self, sink: &mut dyn ExportSink) -> Result<CsvExport> {
        let rows = self.selected_rows();
        if rows.is_empty() {
            warn!("Export requested with no rows selected");
            self.events
                .publish(&GridEvent::Warning(NOTHING_SELECTED_MESSAGE.to_string()));
            return Err(GridError::NothingSelected);
        }
        self.deliver(&rows, sink)
    }

    /// Export every row in view over the visible columns.
    pub fn export_visible(&mut self, sink: &mut dyn ExportSink) -> Result<CsvExport> {
        let rows: Vec<Row> = self.view().into_iter().cloned().collect();
        self.deliver(&rows, sink)
    }

    fn deliver(&self, rows: &[Row], sink: &mut dyn ExportSink) -> Result<CsvExport> {
        let export = CsvExport {
            filename: export_filename(
                self.options.table_name.as_deref(),
                Utc::now().date_naive(),
            ),
            content: to_csv(rows, &self.columns.visible())?,
            row_count: rows.len(),
        };
        debug!("Exporting {} rows as {}", export.row_count, export.filename);
        sink.deliver(&export)?;
        Ok(export)
    }

    // ---------------------------------------------------------------------
    // Events and frames
    // ---------------------------------------------------------------------

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&GridEvent) + Send + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Compose the current state into a paintable frame.
    pub fn frame(&self) -> GridFrame {
        let layout = self.layout();
        let sort = self.sort.as_ref().filter(|_| !self.sorting_locked);
        compose(&FrameSource {
            columns: &self.columns,
            layout: &layout,
            rows: &self.rows,
            keys: &self.keys,
            view: &self.view,
            selection: &self.selection,
            highlighted: &self.highlighted,
            hovered: self.hovered,
            sort,
            sorting_locked: self.sorting_locked,
            filters: &self.filters,
            row_style: self.row_style.as_ref(),
            banding: &self.options.row_banding,
            show_checkboxes: self.options.show_checkboxes,
            show_toolbar: self.options.show_download_button,
            fit_content: self.options.fit_content,
            header_height: self.filter_row_top(),
            loading: self.loading,
        })
    }
}

impl fmt::Debug for FixedGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedGrid")
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("rows", &self.rows.len())
            .field("view", &self.view.len())
            .field("filters", &self.filters)
            .field("sort", &self.sort)
            .field("sorting_locked", &self.sorting_locked)
            .field("selection", &self.selection)
            .field("hovered", &self.hovered)
            .field("loading", &self.loading)
            .field("resize", &self.resize)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
