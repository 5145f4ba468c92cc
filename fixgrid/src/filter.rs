//! Per-column substring filters.

use std::collections::HashMap;

use crate::cell::search_text;
use crate::column::ColumnModel;
use crate::value::Row;

/// Column id to filter text. An empty string means no filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMap {
    filters: HashMap<String, String>,
}

impl FilterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter for `column_id`. Empty text removes it.
    pub fn set(&mut self, column_id: &str, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.filters.remove(column_id);
        } else {
            self.filters.insert(column_id.to_string(), text);
        }
    }

    /// Remove the filter for `column_id`. Returns whether one was set.
    pub fn clear(&mut self, column_id: &str) -> bool {
        self.filters.remove(column_id).is_some()
    }

    pub fn clear_all(&mut self) {
        self.filters.clear();
    }

    pub fn get(&self, column_id: &str) -> &str {
        self.filters.get(column_id).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Indices of the rows that pass every applicable filter, in input order.
    ///
    /// Filters on hidden or unknown columns, and on columns that are not
    /// searchable or show a total, are kept but not applied.
    pub fn apply(&self, columns: &ColumnModel, rows: &[Row]) -> Vec<usize> {
        let active: Vec<_> = self
            .filters
            .iter()
            .filter_map(|(id, text)| {
                let column = columns.visible_column(id)?;
                column
                    .filterable()
                    .then(|| (column, text.to_lowercase()))
            })
            .collect();

        (0..rows.len())
            .filter(|&i| {
                active.iter().all(|(column, needle)| {
                    search_text(column, &rows[i])
                        .is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
                })
            })
            .collect()
    }
}
