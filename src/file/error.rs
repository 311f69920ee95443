use crate::dimensions::{BindError, Dim, DimensionConflict};
use crate::layout::ShapeMismatch;
use crate::schema::{UnknownConvention, Violation};
use crate::store::StoreError;
use crate::units::{UnknownCoordinateSystem, UnknownUnit};

/// Errors raised while opening or accessing a SOFA file
#[derive(Debug, thiserror::Error)]
pub enum SofaError {
    /// File missing, unreadable, or not an instance of the store format
    #[error("Failed to open '{path}': {source}")]
    Open {
        /// Path given to `open`
        path: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// Convention name not in the supported set
    #[error(transparent)]
    UnknownConvention(#[from] UnknownConvention),

    /// Variable absent from the file
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Attribute absent; variable attributes are named `Variable:Attribute`
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// No variable in the file resolves this dimension
    #[error("Dimension {0} is not defined by any variable")]
    MissingDimension(Dim),

    /// Two variables disagree on a shared dimension
    #[error(transparent)]
    DimensionConflict(#[from] DimensionConflict),

    /// Rank or size disagrees with the accessor or schema
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatch),

    /// Unrecognized `Units` attribute
    #[error(transparent)]
    UnknownUnit(#[from] UnknownUnit),

    /// Unrecognized `Type` attribute
    #[error(transparent)]
    UnknownCoordinateSystem(#[from] UnknownCoordinateSystem),

    /// Attribute present but unusable
    #[error("Invalid attribute '{name}': {reason}")]
    InvalidAttribute {
        /// Attribute name
        name: String,
        /// What is wrong with it
        reason: String,
    },

    /// Store failure while accessing a named variable or attribute
    #[error("Error accessing '{context}': {source}")]
    Store {
        /// Variable or attribute being accessed
        context: String,
        /// Underlying store failure
        #[source]
        source: StoreError,
    },

    /// File does not conform to the requested convention
    #[error("Invalid file: {0}")]
    Invalid(#[from] Violation),
}

impl SofaError {
    pub(crate) fn store(context: impl Into<String>, source: StoreError) -> Self {
        SofaError::Store {
            context: context.into(),
            source,
        }
    }
}

impl From<BindError> for SofaError {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Conflict(c) => SofaError::DimensionConflict(c),
            BindError::Shape(s) => SofaError::ShapeMismatch(s),
        }
    }
}
