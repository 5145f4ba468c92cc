//! Column definitions.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::display::DisplayValue;
use crate::style::StyleHints;
use crate::value::{ColumnPath, Row};

/// Render function: `(raw value, row) -> what the cell shows`.
pub type RenderFn = Arc<dyn Fn(Option<&Value>, &Row) -> DisplayValue + Send + Sync>;

/// Per-cell style callback: `(raw value, row) -> style hints`.
pub type CellStyleFn = Arc<dyn Fn(Option<&Value>, &Row) -> Option<StyleHints> + Send + Sync>;

/// Searchable text for a row when the rendered text of a column is blank.
pub type SearchFallbackFn = Arc<dyn Fn(&Row) -> String + Send + Sync>;

/// A grid column.
///
/// # Example
///
/// ```
/// use fixgrid::{ColumnDef, DisplayValue};
///
/// let columns = vec![
///     ColumnDef::new("name", "Name").width(180.0).fixed(),
///     ColumnDef::new("amount", "Amount").show_total("1 250"),
///     ColumnDef::new("owner", "Owner").render(|_, row| {
///         DisplayValue::text(format!(
///             "{} {}",
///             row["first_name"].as_str().unwrap_or_default(),
///             row["last_name"].as_str().unwrap_or_default()
///         ))
///     }),
/// ];
/// assert_eq!(columns.len(), 3);
/// ```
#[derive(Clone)]
pub struct ColumnDef {
    /// Unique key, stable across renders.
    pub id: String,
    /// Header text.
    pub label: String,
    /// Path from the row to the raw value. Defaults to the id as a dotted path.
    pub path: ColumnPath,
    /// Default width in pixels. `None` falls back to the grid default.
    pub width: Option<f64>,
    /// Pinned to the leading edge.
    pub fixed: bool,
    pub searchable: bool,
    pub sortable: bool,
    /// Aggregate shown in place of the filter input. Disables filtering.
    pub show_total: Option<String>,
    render: Option<RenderFn>,
    cell_style: Option<CellStyleFn>,
    search_fallback: Option<SearchFallbackFn>,
}

impl ColumnDef {
    /// Create a searchable, sortable, scrolling column.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            path: ColumnPath::Dotted(id.clone()),
            id,
            label: label.into(),
            width: None,
            fixed: false,
            searchable: true,
            sortable: true,
            show_total: None,
            render: None,
            cell_style: None,
            search_fallback: None,
        }
    }

    pub fn width(mut self, width: f64) -> Self {
        self.width = Some(width);
        self
    }

    /// Pin this column to the leading edge.
    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    /// Read the raw value from `path` instead of the id.
    pub fn path(mut self, path: impl Into<ColumnPath>) -> Self {
        self.path = path.into();
        self
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn show_total(mut self, total: impl ToString) -> Self {
        self.show_total = Some(total.to_string());
        self
    }

    pub fn render(
        mut self,
        render: impl Fn(Option<&Value>, &Row) -> DisplayValue + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn cell_style(
        mut self,
        style: impl Fn(Option<&Value>, &Row) -> Option<StyleHints> + Send + Sync + 'static,
    ) -> Self {
        self.cell_style = Some(Arc::new(style));
        self
    }

    /// Text to search when the rendered text is blank, e.g. a display value
    /// synthesized from several fields.
    pub fn search_fallback(mut self, fallback: impl Fn(&Row) -> String + Send + Sync + 'static) -> Self {
        self.search_fallback = Some(Arc::new(fallback));
        self
    }

    pub fn render_fn(&self) -> Option<&RenderFn> {
        self.render.as_ref()
    }

    pub fn cell_style_fn(&self) -> Option<&CellStyleFn> {
        self.cell_style.as_ref()
    }

    pub fn search_fallback_fn(&self) -> Option<&SearchFallbackFn> {
        self.search_fallback.as_ref()
    }

    /// Whether a filter on this column is applied.
    pub fn filterable(&self) -> bool {
        self.searchable && self.show_total.is_none()
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("path", &self.path)
            .field("width", &self.width)
            .field("fixed", &self.fixed)
            .field("searchable", &self.searchable)
            .field("sortable", &self.sortable)
            .field("show_total", &self.show_total)
            .field("render", &self.render.is_some())
            .field("cell_style", &self.cell_style.is_some())
            .field("search_fallback", &self.search_fallback.is_some())
            .finish()
    }
}
