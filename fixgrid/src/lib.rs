//! A frozen-column data grid engine.
//!
//! [`FixedGrid`] holds columns and rows plus the transient view state
//! (widths, filters, sort, selection) and composes it all into a
//! [`GridFrame`] that any front end can paint.

pub mod cell;
pub mod column;
pub mod display;
pub mod error;
pub mod events;
pub mod export;
pub mod filter;
pub mod grid;
pub mod layout;
pub mod resize;
pub mod selection;
pub mod sort;
pub mod style;
pub mod value;

pub use column::{ColumnDef, ColumnLayout, ColumnModel, ColumnWidths, ResizeEdge};
pub use display::{DisplayNode, DisplayValue, extract_text};
pub use error::{GridError, Result};
pub use events::{GridEvent, SubscriptionId};
pub use export::{CsvExport, DirectorySink, ExportSink};
pub use grid::{ClickTarget, FixedGrid, GridOptions};
pub use layout::{GridFrame, RowBanding};
pub use style::{Rgb, StyleHints};
pub use value::{ColumnPath, Row, resolve};

pub mod prelude {
    pub use crate::column::{ColumnDef, ResizeEdge};
    pub use crate::display::{DisplayNode, DisplayValue};
    pub use crate::error::{GridError, Result};
    pub use crate::events::GridEvent;
    pub use crate::export::{CsvExport, DirectorySink, ExportSink};
    pub use crate::grid::{ClickTarget, FixedGrid, GridOptions};
    pub use crate::layout::{FilterContent, GridFrame, RowBanding};
    pub use crate::resize::{DragHost, FrameHandle, ListenerHandle};
    pub use crate::selection::HeaderCheck;
    pub use crate::sort::{SortDirection, SortState};
    pub use crate::style::{Rgb, StyleHints};
    pub use crate::value::{ColumnPath, Row};
}
