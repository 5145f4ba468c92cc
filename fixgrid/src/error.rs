//! Error types for the grid engine.

/// Message shown to the user when a selection-based export has nothing to export.
pub const NOTHING_SELECTED_MESSAGE: &str = "Please select at least one row to download";

/// Errors produced by grid construction and export.
///
/// Rendering and text extraction never produce errors; they degrade to
/// empty text instead.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Two column definitions share the same id.
    #[error("duplicate column id '{id}'")]
    DuplicateColumn { id: String },

    /// A fixed column appears after a scrolling one.
    #[error(
        "fixed column '{id}' at position {position} follows a non-fixed column; fixed columns must be contiguous and first"
    )]
    FixedAfterScrolling { id: String, position: usize },

    /// An operation referenced a column id that is not defined.
    #[error("unknown column '{id}'")]
    UnknownColumn { id: String },

    /// Selection-based export was requested with an empty selection.
    #[error("{}", NOTHING_SELECTED_MESSAGE)]
    NothingSelected,

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Creates a new duplicate column error.
    pub fn duplicate_column(id: impl Into<String>) -> Self {
        Self::DuplicateColumn { id: id.into() }
    }

    /// Creates a new unknown column error.
    pub fn unknown_column(id: impl Into<String>) -> Self {
        Self::UnknownColumn { id: id.into() }
    }

    /// Whether this error should be shown to the user as a warning rather
    /// than treated as a failure.
    pub fn is_user_warning(&self) -> bool {
        matches!(self, Self::NothingSelected)
    }
}

/// Result type alias for grid operations.
pub type Result<T, E = GridError> = std::result::Result<T, E>;
