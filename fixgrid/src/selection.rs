//! Row selection.
//!
//! Selection is tracked by row key rather than view position, so a selected
//! row stays selected when the view is re-filtered or re-sorted.

use std::collections::HashSet;

use log::warn;

use crate::value::{ColumnPath, Row, resolve, value_text};

/// Keys for one set of rows.
#[derive(Debug, Clone, Default)]
pub struct RowKeys {
    /// One key per row, in input order. No two rows share a key.
    pub keys: Vec<String>,
    /// Keys derived from a row's position rather than its data.
    pub positional: HashSet<String>,
}

/// The string form of the value at `key_path`, if the row has one.
pub fn row_key(row: &Row, key_path: &ColumnPath) -> Option<String> {
    match resolve(row, key_path) {
        Some(value) if !value.is_null() => Some(value_text(value)),
        _ => None,
    }
}

/// Assign a unique key to every row.
///
/// Rows are keyed by the value at `key_path`. A row without one, or whose key
/// an earlier row already took, is keyed by `#<position>`, with extra `#`
/// prepended until it clashes with no other key.
pub fn assign_keys(rows: &[Row], key_path: &ColumnPath) -> RowKeys {
    let mut used = HashSet::new();
    let natural: Vec<Option<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let key = row_key(row, key_path)?;
            if used.insert(key.clone()) {
                Some(key)
            } else {
                warn!("Row {i} repeats key '{key}', keying it by position");
                None
            }
        })
        .collect();

    let mut positional = HashSet::new();
    let keys = natural
        .into_iter()
        .enumerate()
        .map(|(i, key)| {
            key.unwrap_or_else(|| {
                let mut key = format!("#{i}");
                while used.contains(&key) {
                    key.insert(0, '#');
                }
                used.insert(key.clone());
                positional.insert(key.clone());
                key
            })
        })
        .collect();

    RowKeys { keys, positional }
}

/// State of the select-all checkbox in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderCheck {
    #[default]
    Unchecked,
    Checked,
    /// Some but not all rows of the view are selected.
    Indeterminate,
}

/// Key-based selection state.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: HashSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected keys, sorted for deterministic ordering.
    pub fn selected(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.selected.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.contains(key)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Toggle one key. Returns whether it is now selected.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.selected.remove(key) {
            false
        } else {
            self.selected.insert(key.to_string());
            true
        }
    }

    /// Replace the selection with exactly `keys`.
    pub fn select_all<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = keys.into_iter().map(Into::into).collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drop keys that `exists` rejects. Returns the removed keys.
    pub fn retain(&mut self, exists: impl Fn(&str) -> bool) -> Vec<String> {
        let removed: Vec<String> = self
            .selected
            .iter()
            .filter(|key| !exists(key))
            .cloned()
            .collect();
        for key in &removed {
            self.selected.remove(key);
        }
        removed
    }

    /// Header checkbox state for the rows currently in view.
    pub fn header_check<'a>(&self, view_keys: impl IntoIterator<Item = &'a str>) -> HeaderCheck {
        let mut total = 0;
        let mut checked = 0;
        for key in view_keys {
            total += 1;
            if self.selected.contains(key) {
                checked += 1;
            }
        }
        match checked {
            0 => HeaderCheck::Unchecked,
            n if n == total => HeaderCheck::Checked,
            _ => HeaderCheck::Indeterminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_fall_back_to_position() {
        let rows = vec![
            json!({"id": 7}),
            json!({"id": "a-1"}),
            json!({"id": null}),
            json!({"name": "x"}),
        ];
        let keys = assign_keys(&rows, &ColumnPath::from("id"));
        assert_eq!(keys.keys, vec!["7", "a-1", "#2", "#3"]);
        assert_eq!(
            keys.positional,
            HashSet::from(["#2".to_string(), "#3".to_string()])
        );
    }

    #[test]
    fn test_keys_are_unique() {
        let rows = vec![
            json!({"id": 1}),
            json!({"id": "1"}),
            json!({"id": 2}),
            json!({"id": 2}),
        ];
        let keys = assign_keys(&rows, &ColumnPath::from("id"));
        assert_eq!(keys.keys, vec!["1", "#1", "2", "#3"]);
    }

    #[test]
    fn test_positional_key_avoids_real_ids() {
        let rows = vec![json!({"name": "a"}), json!({"id": "#0"}), json!({"id": "##0"})];
        let keys = assign_keys(&rows, &ColumnPath::from("id"));
        assert_eq!(keys.keys, vec!["###0", "#0", "##0"]);
        assert_eq!(keys.positional, HashSet::from(["###0".to_string()]));
    }

    #[test]
    fn test_toggle_reports_new_state() {
        let mut selection = Selection::new();
        assert!(selection.toggle("a"));
        assert!(!selection.toggle("a"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_header_check_states() {
        let mut selection = Selection::new();
        assert_eq!(selection.header_check(["a", "b"]), HeaderCheck::Unchecked);
        selection.toggle("a");
        assert_eq!(selection.header_check(["a", "b"]), HeaderCheck::Indeterminate);
        selection.toggle("b");
        assert_eq!(selection.header_check(["a", "b"]), HeaderCheck::Checked);
        assert_eq!(selection.header_check([]), HeaderCheck::Unchecked);
    }

    #[test]
    fn test_retain_prunes_missing_keys() {
        let mut selection = Selection::new();
        selection.select_all(["a", "b", "c"]);
        let removed = selection.retain(|key| key != "b");
        assert_eq!(removed, vec!["b".to_string()]);
        assert_eq!(selection.selected(), vec!["a".to_string(), "c".to_string()]);
    }
}
