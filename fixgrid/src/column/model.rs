//! Column model: visibility, effective widths and frozen offsets.

use std::collections::{HashMap, HashSet};

use crate::error::{GridError, Result};

use super::def::ColumnDef;

/// Width used when neither the width map nor the column supplies one.
pub const DEFAULT_COLUMN_WIDTH: f64 = 150.0;

/// Narrowest width a resize may produce.
pub const MIN_COLUMN_WIDTH: f64 = 20.0;

/// Width of the leading checkbox column.
pub const SELECTION_COLUMN_WIDTH: f64 = 50.0;

/// Which edge of a header cell a resize handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    /// Resizes the column itself.
    Right,
    /// Resizes the previous visible column.
    Left,
}

/// Column id to pixel width.
///
/// The committed map is authoritative. A resize in progress writes a live
/// preview for a single column on top of it.
#[derive(Debug, Clone, Default)]
pub struct ColumnWidths {
    committed: HashMap<String, f64>,
    live: Option<(String, f64)>,
}

impl ColumnWidths {
    /// Seed from caller defaults, then each column's own width, then the
    /// grid default.
    pub fn initialize(columns: &[ColumnDef], defaults: &HashMap<String, f64>) -> Self {
        let mut committed = defaults.clone();
        for column in columns {
            committed
                .entry(column.id.clone())
                .or_insert_with(|| column.width.unwrap_or(DEFAULT_COLUMN_WIDTH));
        }
        Self {
            committed,
            live: None,
        }
    }

    /// Current width for `id`, preferring the live preview.
    pub fn get(&self, id: &str) -> Option<f64> {
        match &self.live {
            Some((live_id, width)) if live_id == id => Some(*width),
            _ => self.committed.get(id).copied(),
        }
    }

    /// Committed width for `id`, ignoring any preview.
    pub fn committed(&self, id: &str) -> Option<f64> {
        self.committed.get(id).copied()
    }

    pub fn live(&self) -> Option<(&str, f64)> {
        self.live.as_ref().map(|(id, width)| (id.as_str(), *width))
    }

    pub fn set_live(&mut self, id: &str, width: f64) {
        self.live = Some((id.to_string(), width));
    }

    pub fn clear_live(&mut self) {
        self.live = None;
    }

    /// Write a width into the authoritative map and drop the preview.
    pub fn commit(&mut self, id: &str, width: f64) {
        self.committed.insert(id.to_string(), width);
        self.live = None;
    }

    /// Copy of the committed map.
    pub fn snapshot(&self) -> HashMap<String, f64> {
        self.committed.clone()
    }
}

/// Position and size of one visible column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSlot {
    pub id: String,
    /// Index among visible columns.
    pub index: usize,
    pub width: f64,
    pub fixed: bool,
    /// Sticky left offset for fixed columns: the summed width of the fixed
    /// columns before this one.
    pub left: Option<f64>,
    /// The trailing fixed column, which carries the boundary shadow.
    pub last_fixed: bool,
}

/// Derived geometry of the visible columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ColumnLayout {
    pub slots: Vec<ColumnSlot>,
}

impl ColumnLayout {
    /// Sum of all visible column widths, plus the checkbox column if shown.
    pub fn total_width(&self, with_selection: bool) -> f64 {
        let columns: f64 = self.slots.iter().map(|s| s.width).sum();
        if with_selection {
            columns + SELECTION_COLUMN_WIDTH
        } else {
            columns
        }
    }

    pub fn fixed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.fixed).count()
    }

    /// Combined width of the pinned columns.
    pub fn fixed_width(&self) -> f64 {
        self.slots.iter().filter(|s| s.fixed).map(|s| s.width).sum()
    }

    pub fn slot(&self, id: &str) -> Option<&ColumnSlot> {
        self.slots.iter().find(|s| s.id == id)
    }

    /// Column a handle at `index`/`edge` resizes. Left handles target the
    /// previous visible column; the first column has none.
    pub fn resize_target(&self, index: usize, edge: ResizeEdge) -> Option<&str> {
        let target = match edge {
            ResizeEdge::Right => index,
            ResizeEdge::Left => index.checked_sub(1)?,
        };
        self.slots.get(target).map(|s| s.id.as_str())
    }

    /// Handles rendered on the header cell at `index`.
    pub fn resize_edges(index: usize) -> Vec<ResizeEdge> {
        if index == 0 {
            vec![ResizeEdge::Right]
        } else {
            vec![ResizeEdge::Right, ResizeEdge::Left]
        }
    }
}

/// The column set of a grid plus the caller's hidden-column list.
#[derive(Debug, Clone, Default)]
pub struct ColumnModel {
    columns: Vec<ColumnDef>,
    hidden: HashSet<String>,
}

impl ColumnModel {
    /// Validate and wrap a column list.
    ///
    /// Ids must be unique, and fixed columns must be contiguous and first.
    pub fn new(columns: Vec<ColumnDef>) -> Result<Self> {
        validate(&columns)?;
        Ok(Self {
            columns,
            hidden: HashSet::new(),
        })
    }

    pub fn set_hidden<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hidden = ids.into_iter().map(Into::into).collect();
    }

    pub fn hidden(&self) -> &HashSet<String> {
        &self.hidden
    }

    /// All columns, including hidden ones.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some() && !self.hidden.contains(id)
    }

    /// Visible columns in display order.
    pub fn visible(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| !self.hidden.contains(&c.id))
            .collect()
    }

    /// Visible column that is currently shown, or `None` if unknown or hidden.
    pub fn visible_column(&self, id: &str) -> Option<&ColumnDef> {
        self.get(id).filter(|c| !self.hidden.contains(&c.id))
    }

    /// Effective width: width map, then the column's own width, then the default.
    pub fn effective_width(&self, column: &ColumnDef, widths: &ColumnWidths) -> f64 {
        widths
            .get(&column.id)
            .or(column.width)
            .unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Compute widths and sticky offsets of the visible columns.
    pub fn layout(&self, widths: &ColumnWidths) -> ColumnLayout {
        let visible = self.visible();
        let fixed_count = visible.iter().filter(|c| c.fixed).count();

        let mut slots = Vec::with_capacity(visible.len());
        let mut running_left = 0.0;
        for (index, column) in visible.iter().enumerate() {
            let width = self.effective_width(column, widths);
            let left = if column.fixed {
                let left = running_left;
                running_left += width;
                Some(left)
            } else {
                None
            };
            slots.push(ColumnSlot {
                id: column.id.clone(),
                index,
                width,
                fixed: column.fixed,
                left,
                last_fixed: column.fixed && index + 1 == fixed_count,
            });
        }
        ColumnLayout { slots }
    }
}

fn validate(columns: &[ColumnDef]) -> Result<()> {
    let mut seen = HashSet::new();
    let mut scrolling_seen = false;
    for (position, column) in columns.iter().enumerate() {
        if !seen.insert(column.id.as_str()) {
            return Err(GridError::duplicate_column(&column.id));
        }
        if column.fixed && scrolling_seen {
            return Err(GridError::FixedAfterScrolling {
                id: column.id.clone(),
                position,
            });
        }
        scrolling_seen |= !column.fixed;
    }
    Ok(())
}
