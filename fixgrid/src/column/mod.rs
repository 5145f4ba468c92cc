//! Column definitions and the derived column geometry.

mod def;
mod model;

pub use def::{CellStyleFn, ColumnDef, RenderFn, SearchFallbackFn};
pub use model::{
    ColumnLayout, ColumnModel, ColumnSlot, ColumnWidths, DEFAULT_COLUMN_WIDTH, MIN_COLUMN_WIDTH,
    ResizeEdge, SELECTION_COLUMN_WIDTH,
};
