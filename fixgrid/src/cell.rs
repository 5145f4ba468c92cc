//! Cell rendering and text derivation.
//!
//! Render functions belong to the host and may panic. Every invocation goes
//! through [`render_cell`], which catches the panic, logs it, and degrades to
//! an empty cell so one broken column cannot break the whole grid.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::warn;
use serde_json::Value;

use crate::column::ColumnDef;
use crate::display::{DisplayValue, extract_text};
use crate::style::StyleHints;
use crate::value::{Row, optional_text, resolve, value_text};

/// Extract a human-readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Run a host callback, turning a panic into `None`.
///
/// `what` names the callback in the log line, e.g. "render function for
/// column 'amount'".
pub(crate) fn guarded<T>(what: impl FnOnce() -> String, f: impl FnOnce() -> T) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            warn!("{} panicked: {}", what(), panic_message(payload.as_ref()));
            None
        }
    }
}

/// Invoke the render function, if any. `None` when the column has none or
/// it panicked.
fn rendered(column: &ColumnDef, raw: Option<&Value>, row: &Row) -> Option<DisplayValue> {
    let render = column.render_fn()?;
    guarded(|| format!("render function for column '{}'", column.id), || {
        render(raw, row)
    })
}

/// What the cell at `column` shows for `row`.
pub fn render_cell(column: &ColumnDef, row: &Row) -> DisplayValue {
    let raw = resolve(row, &column.path);
    match column.render_fn() {
        Some(_) => rendered(column, raw, row).unwrap_or_default(),
        None => DisplayValue::from_raw(raw),
    }
}

/// Extracted text of the rendered cell, or `None` if the column has no
/// render function. A panicking render yields empty text.
pub fn rendered_text(column: &ColumnDef, row: &Row) -> Option<String> {
    column.render_fn()?;
    let raw = resolve(row, &column.path);
    Some(
        rendered(column, raw, row)
            .map(|value| extract_text(&value))
            .unwrap_or_default(),
    )
}

/// Text a filter on `column` matches against.
///
/// Without a render function this is the raw value's string form, and a
/// missing or `null` value has no text at all. With one, the rendered text
/// is used; if that is blank, the column's search fallback and then the raw
/// value are tried in turn.
pub fn search_text(column: &ColumnDef, row: &Row) -> Option<String> {
    let raw = resolve(row, &column.path);
    if column.render_fn().is_none() {
        return match raw {
            None | Some(Value::Null) => None,
            Some(value) => Some(value_text(value)),
        };
    }

    let text = rendered(column, raw, row)
        .map(|value| extract_text(&value))
        .unwrap_or_default();
    if !text.trim().is_empty() {
        return Some(text);
    }

    if let Some(fallback) = column.search_fallback_fn()
        && let Some(text) = guarded(
            || format!("search fallback for column '{}'", column.id),
            || fallback(row),
        )
        && !text.trim().is_empty()
    {
        return Some(text);
    }

    Some(optional_text(raw))
}

/// Style hints from the column's cell style callback.
pub fn cell_style(column: &ColumnDef, row: &Row) -> Option<StyleHints> {
    let style = column.cell_style_fn()?;
    let raw = resolve(row, &column.path);
    guarded(|| format!("cell style for column '{}'", column.id), || {
        style(raw, row)
    })
    .flatten()
}
