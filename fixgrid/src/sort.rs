//! Single-key sorting with a type-inferring comparator.
//!
//! Values are compared as dates when both sides look like dates, as numbers
//! when both sides parse as numbers, and as text otherwise.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::cell::rendered_text;
use crate::column::ColumnDef;
use crate::value::{Row, is_primitive, resolve, value_text};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Apply the direction to an ascending comparison result.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// The active sort key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    /// Sort state after a click on `column_id`.
    ///
    /// Clicking the active column flips its direction; clicking another
    /// column starts ascending. There is no way back to unsorted.
    pub fn after_click(current: Option<&SortState>, column_id: &str) -> SortState {
        match current {
            Some(state) if state.column_id == column_id => {
                SortState::new(column_id, state.direction.toggled())
            }
            _ => SortState::new(column_id, SortDirection::Ascending),
        }
    }
}

// -------------------------------------------------------------------------
// Value classification
// -------------------------------------------------------------------------

static YEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"^(\d{4})$"));
static ISO: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(\d{4})-(\d{2})-(\d{2})(?:(?:T|\s+)(\d{2}):(\d{2})(?::(\d{2}))?)?$")
});
static US: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(\d{1,2})/(\d{1,2})/(\d{4})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
});
static EUROPEAN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^(\d{2})\.(\d{2})\.(\d{4})(?:(?:\s*\|\s*|\s+)(\d{2}):(\d{2})(?::(\d{2}))?)?$")
});
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?"));

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("built-in pattern is valid")
}

fn field(caps: &Captures, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

/// Build a timestamp in milliseconds from calendar parts, rejecting
/// impossible dates such as `2023-02-30`.
fn timestamp(year: i32, month: u32, day: u32, caps: &Captures, time_at: usize) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let hour = field(caps, time_at).unwrap_or(0);
    let minute = field(caps, time_at + 1).unwrap_or(0);
    let second = field(caps, time_at + 2).unwrap_or(0);
    Some(
        date.and_hms_opt(hour, minute, second)?
            .and_utc()
            .timestamp_millis(),
    )
}

/// Parse a recognized date-like string into a timestamp in milliseconds.
///
/// Accepted: a bare 4-digit year, `YYYY-MM-DD[ HH:mm[:ss]]`, RFC 3339
/// timestamps, `M/D/YYYY[ HH:mm[:ss]]`, `DD.MM.YYYY[ HH:mm[:ss]]` and
/// `DD.MM.YYYY | HH:mm`.
pub fn parse_date(text: &str) -> Option<i64> {
    if let Some(caps) = YEAR.captures(text) {
        let year = field(&caps, 1)? as i32;
        return NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc().timestamp_millis());
    }
    if let Some(caps) = ISO.captures(text) {
        return timestamp(field(&caps, 1)? as i32, field(&caps, 2)?, field(&caps, 3)?, &caps, 4);
    }
    if let Some(caps) = US.captures(text) {
        return timestamp(field(&caps, 3)? as i32, field(&caps, 1)?, field(&caps, 2)?, &caps, 4);
    }
    if let Some(caps) = EUROPEAN.captures(text) {
        return timestamp(field(&caps, 3)? as i32, field(&caps, 2)?, field(&caps, 1)?, &caps, 4);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Parse the leading numeric part of `text`; the result must be finite.
pub fn parse_number(text: &str) -> Option<f64> {
    let prefix = NUMBER_PREFIX.find(text)?;
    prefix.as_str().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Case-folded comparison; for equal folds lowercase sorts first.
fn compare_strings(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Compare two optional cell texts. Absent values sort first.
///
/// Each pair is compared as dates if both parse as dates, else as numbers if
/// both parse as numbers, else as case-folded text. A column that mixes these
/// kinds therefore has no total order: `"12/31/2023"` sorts before
/// `"01/01/2024"` as dates, which sorts before `"5"` by leading number, which
/// in turn sorts before `"12/31/2023"`. Sorting such a column still terminates
/// but the result depends on the input order.
pub fn compare_values(a: Option<&str>, b: Option<&str>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a.trim(), b.trim()),
    };

    if let (Some(da), Some(db)) = (parse_date(a), parse_date(b)) {
        return da.cmp(&db);
    }
    if let (Some(na), Some(nb)) = (parse_number(a), parse_number(b)) {
        return na.partial_cmp(&nb).unwrap_or(Ordering::Equal);
    }
    compare_strings(a, b)
}

// -------------------------------------------------------------------------
// Sorting rows
// -------------------------------------------------------------------------

/// Precomputed sort inputs for one row.
struct SortCell {
    /// Raw string form; `None` for missing or `null`.
    raw: Option<String>,
    primitive: bool,
    /// Extracted rendered text, computed only when a comparison may need it.
    rendered: Option<String>,
}

impl SortCell {
    fn new(column: &ColumnDef, row: &Row, with_rendered: bool) -> Self {
        let value = resolve(row, &column.path);
        let raw = match value {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(value_text(v)),
        };
        Self {
            raw,
            primitive: is_primitive(value),
            rendered: if with_rendered {
                rendered_text(column, row)
            } else {
                None
            },
        }
    }
}

fn compare_cells(column: &ColumnDef, a: &SortCell, b: &SortCell) -> Ordering {
    if (!a.primitive || !b.primitive) && column.render_fn().is_some() {
        return compare_values(a.rendered.as_deref(), b.rendered.as_deref());
    }
    compare_values(a.raw.as_deref(), b.raw.as_deref())
}

/// Compare two rows on `column`.
///
/// When either raw value is missing or not a primitive and the column has a
/// render function, both sides are compared by their rendered text instead.
pub fn compare_rows(column: &ColumnDef, a: &Row, b: &Row) -> Ordering {
    let with_rendered = column.render_fn().is_some()
        && (!is_primitive(resolve(a, &column.path)) || !is_primitive(resolve(b, &column.path)));
    compare_cells(
        column,
        &SortCell::new(column, a, with_rendered),
        &SortCell::new(column, b, with_rendered),
    )
}

/// Stable sort of `order` (indices into `rows`) by `column`.
pub fn sort_indices(order: &mut [usize], rows: &[Row], column: &ColumnDef, direction: SortDirection) {
    let with_rendered = column.render_fn().is_some()
        && order
            .iter()
            .any(|&i| !is_primitive(resolve(&rows[i], &column.path)));

    let mut cells: Vec<Option<SortCell>> = (0..rows.len()).map(|_| None).collect();
    for &i in order.iter() {
        cells[i] = Some(SortCell::new(column, &rows[i], with_rendered));
    }

    order.sort_by(|&a, &b| {
        let ordering = match (&cells[a], &cells[b]) {
            (Some(ca), Some(cb)) => compare_cells(column, ca, cb),
            _ => Ordering::Equal,
        };
        direction.apply(ordering)
    });
}
