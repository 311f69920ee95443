/// Errors raised by an array store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON snapshot parsing or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Atomic replacement of a snapshot failed
    #[error("Failed to persist snapshot: {0}")]
    PersistError(#[from] tempfile::PersistError),

    /// netCDF library error
    #[cfg(feature = "netcdf")]
    #[error("netCDF error: {0}")]
    NetcdfError(#[from] netcdf::Error),

    /// Variable not present in the store
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// Dimension referenced but never declared
    #[error("Unknown dimension '{dimension}' referenced by '{variable}'")]
    UnknownDimension {
        /// Variable holding the reference
        variable: String,
        /// Undeclared dimension name
        dimension: String,
    },

    /// Buffer length disagrees with the stored element count
    #[error("Length mismatch for '{variable}': expected {expected}, found {found}")]
    LengthMismatch {
        /// Variable being read or written
        variable: String,
        /// Element count requested by the caller
        expected: usize,
        /// Element count held by the store
        found: usize,
    },

    /// Write attempted on a store opened read-only
    #[error("Store is read-only")]
    ReadOnly,

    /// Value or element type the backend cannot represent
    #[error("Unsupported: {0}")]
    Unsupported(String),
}
