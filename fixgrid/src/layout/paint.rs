//! Row and cell coloring.
//!
//! Layers, highest first: selection (checked or highlighted), the host's row
//! style, the column's cell style, hover, then banding or the default.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cell::guarded;
use crate::style::{Rgb, StyleHints, palette};
use crate::value::{ColumnPath, Row, optional_text, resolve};

/// Host callback styling a whole row.
pub type RowStyleFn = Arc<dyn Fn(&Row) -> Option<StyleHints> + Send + Sync>;

/// Background banding of body rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowBanding {
    #[default]
    None,
    /// Every other row.
    Alternate { color: Rgb },
    /// Rows sharing the value at `path` share a band; the band flips each
    /// time a new value appears.
    Grouped { path: ColumnPath, color: Rgb },
}

impl RowBanding {
    /// Band color for each row, in the order given.
    pub fn bands<'a>(&self, rows: impl IntoIterator<Item = &'a Row>) -> Vec<Option<Rgb>> {
        match self {
            Self::None => rows.into_iter().map(|_| None).collect(),
            Self::Alternate { color } => rows
                .into_iter()
                .enumerate()
                .map(|(i, _)| (i % 2 == 1).then_some(*color))
                .collect(),
            Self::Grouped { path, color } => {
                let mut groups: HashMap<String, usize> = HashMap::new();
                rows.into_iter()
                    .map(|row| {
                        let value = optional_text(resolve(row, path));
                        let next = groups.len();
                        let group = *groups.entry(value).or_insert(next);
                        (group % 2 == 1).then_some(*color)
                    })
                    .collect()
            }
        }
    }
}

/// Invoke the row style callback, treating a panic as no style.
pub(crate) fn row_style(style: &RowStyleFn, row: &Row) -> Option<StyleHints> {
    guarded(|| "row style".to_string(), || style(row)).flatten()
}

/// The state that decides a row's colors.
#[derive(Debug, Clone, Default)]
pub(crate) struct RowLayers {
    pub selected: bool,
    pub row_style: Option<StyleHints>,
    pub hovered: bool,
    pub band: Option<Rgb>,
}

impl RowLayers {
    /// Background and foreground of the row itself.
    pub fn row_colors(&self) -> (Rgb, Option<Rgb>) {
        self.cell_colors(None)
    }

    /// Background and foreground of one cell, given its cell style.
    pub fn cell_colors(&self, cell: Option<&StyleHints>) -> (Rgb, Option<Rgb>) {
        if self.selected {
            return (palette::SELECTED_BG, Some(palette::SELECTED_FG));
        }

        let row_bg = self.row_style.as_ref().and_then(|s| s.background);
        let row_fg = self.row_style.as_ref().and_then(|s| s.foreground);
        let cell_bg = cell.and_then(|s| s.background);
        let cell_fg = cell.and_then(|s| s.foreground);

        let background = row_bg.or(cell_bg).unwrap_or(if self.hovered {
            palette::HOVER_BG
        } else {
            self.band.unwrap_or(palette::DEFAULT_BG)
        });
        (background, row_fg.or(cell_fg))
    }
}
