//! # SOFA File Handle
//!
//! [`SofaFile`] owns one array store handle for its whole lifetime. Opening
//! picks a backend, the Dimension Registry runs lazily on first access and its
//! result is cached until the handle is dropped, and every typed accessor reads
//! or writes whole variables through [`FlatBuffer`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sofa::file::{Role, PositionKind, SofaFile};
//!
//! let file = SofaFile::open("hrtf.sofa.json")?;
//! let (coordinates, units) = file.position(Role::Receiver, PositionKind::Position)?;
//! let positions = file.position_values(Role::Receiver, PositionKind::Position)?;
//! println!("{} receivers in {} ({})", positions.shape()[0], coordinates, units);
//! # Ok::<(), sofa::SofaError>(())
//! ```
//!
//! Handles are move-only. Distinct handles share no state and can be used from
//! different threads; a single handle performs no locking.

mod config;
mod data;
mod error;
mod positions;

#[cfg(test)]
mod tests;

use std::cell::OnceCell;
use std::path::Path;

use log::{debug, warn};

pub use config::{Backend, OpenConfig, OpenMode};
pub use error::SofaError;
pub use positions::{PositionKind, Role};

use crate::dimensions::{Dim, DimensionRegistry, Dimensions};
use crate::layout::{element_count, FlatBuffer, Mismatch, ShapeMismatch};
use crate::schema::{
    self, validate_schema, Convention, ValidationOutcome, ATTR_DATE_MODIFIED,
    ATTR_SOFA_CONVENTIONS, ATTR_SOFA_CONVENTIONS_VERSION, BASE_SCHEMA,
};
use crate::store::{ArrayStore, AttributeScope, AttributeValue, Attributes, MemoryStore, StoreError};

/// Format of `DateCreated` and `DateModified`
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time in the AES69 date format
pub fn timestamp() -> String {
    chrono::Utc::now().format(DATE_FORMAT).to_string()
}

/// An open SOFA file
pub struct SofaFile {
    store: Box<dyn ArrayStore>,
    dims: OnceCell<Dimensions>,
    modified: bool,
    closed: bool,
}

impl std::fmt::Debug for SofaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SofaFile")
            .field("store", &self.store.describe())
            .field("modified", &self.modified)
            .finish()
    }
}

impl SofaFile {
    /// Open a file read-only, detecting the backend from the extension
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SofaError> {
        Self::open_with_config(path, OpenConfig::default())
    }

    /// Open a file with custom configuration
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: OpenConfig,
    ) -> Result<Self, SofaError> {
        let path = path.as_ref();
        let backend = config.backend.unwrap_or_else(|| Backend::detect(path));
        debug!(
            "Opening {} ({:?}, {:?})",
            path.display(),
            backend,
            config.mode
        );
        let open_error = |source| SofaError::Open {
            path: path.display().to_string(),
            source,
        };

        let store: Box<dyn ArrayStore> = match backend {
            Backend::Json => {
                let store = match config.mode {
                    OpenMode::Read => MemoryStore::load(path),
                    OpenMode::Append => MemoryStore::load_for_update(path),
                }
                .map_err(open_error)?;
                Box::new(store)
            }
            Backend::Netcdf => Self::open_netcdf(path, config.mode).map_err(open_error)?,
        };
        Ok(Self::from_boxed(store))
    }

    #[cfg(feature = "netcdf")]
    fn open_netcdf(path: &Path, mode: OpenMode) -> Result<Box<dyn ArrayStore>, StoreError> {
        use crate::store::NetcdfStore;
        let store = match mode {
            OpenMode::Read => NetcdfStore::open(path)?,
            OpenMode::Append => NetcdfStore::append(path)?,
        };
        Ok(Box::new(store))
    }

    #[cfg(not(feature = "netcdf"))]
    fn open_netcdf(_path: &Path, _mode: OpenMode) -> Result<Box<dyn ArrayStore>, StoreError> {
        Err(StoreError::Unsupported(
            "netCDF files require the `netcdf` feature; JSON snapshots (.json) are always supported"
                .to_string(),
        ))
    }

    /// Wrap an already opened store
    pub fn from_store<S: ArrayStore + 'static>(store: S) -> Self {
        Self::from_boxed(Box::new(store))
    }

    fn from_boxed(store: Box<dyn ArrayStore>) -> Self {
        Self {
            store,
            dims: OnceCell::new(),
            modified: false,
            closed: false,
        }
    }

    /// Path or label of the underlying store
    pub fn describe(&self) -> String {
        self.store.describe()
    }

    /// Underlying store
    pub fn store(&self) -> &dyn ArrayStore {
        self.store.as_ref()
    }

    /// Sizes of every dimension letter used by the file's variables
    ///
    /// Resolved on first call and cached for the lifetime of the handle.
    pub fn dimensions(&self) -> Result<&Dimensions, SofaError> {
        if let Some(dims) = self.dims.get() {
            return Ok(dims);
        }
        let resolved = DimensionRegistry::resolve(self.store.as_ref(), schema::known_signatures)?;
        Ok(self.dims.get_or_init(|| resolved))
    }

    /// Resolved size of one letter
    pub fn dimension(&self, dim: Dim) -> Result<usize, SofaError> {
        self.dimensions()?
            .get(dim)
            .ok_or(SofaError::MissingDimension(dim))
    }

    /// All global attributes
    pub fn global_attributes(&self) -> Result<Attributes, SofaError> {
        self.store
            .attributes(AttributeScope::Global)
            .map_err(|e| SofaError::store("global attributes", e))
    }

    /// All attributes of one variable
    pub fn variable_attributes(&self, variable: &str) -> Result<Attributes, SofaError> {
        if !self.store.has_variable(variable) {
            return Err(SofaError::MissingVariable(variable.to_string()));
        }
        self.store
            .attributes(AttributeScope::Variable(variable))
            .map_err(|e| SofaError::store(variable, e))
    }

    /// Text of a global attribute
    pub fn attribute_text(&self, name: &str) -> Result<String, SofaError> {
        self.global_attributes()?
            .get(name)
            .map(|v| v.to_string())
            .ok_or_else(|| SofaError::MissingAttribute(name.to_string()))
    }

    pub(crate) fn variable_attribute_text(
        &self,
        variable: &str,
        name: &str,
    ) -> Result<String, SofaError> {
        self.variable_attributes(variable)?
            .get(name)
            .map(|v| v.to_string())
            .ok_or_else(|| SofaError::MissingAttribute(format!("{}:{}", variable, name)))
    }

    /// Variable names in declaration order
    pub fn variable_names(&self) -> Vec<String> {
        self.store.variables()
    }

    /// Axis sizes of a variable, `None` if absent
    pub fn variable_shape(&self, name: &str) -> Option<Vec<usize>> {
        self.store.variable_shape(name)
    }

    /// Whether a variable exists
    pub fn has_variable(&self, name: &str) -> bool {
        self.store.has_variable(name)
    }

    /// Convention declared in `SOFAConventions`
    pub fn convention(&self) -> Result<Convention, SofaError> {
        let name = self.attribute_text(ATTR_SOFA_CONVENTIONS)?;
        Ok(Convention::from_name(&name)?)
    }

    /// Value of `SOFAConventionsVersion`
    pub fn convention_version(&self) -> Result<String, SofaError> {
        self.attribute_text(ATTR_SOFA_CONVENTIONS_VERSION)
    }

    /// Check the generic SOFA rules shared by every convention
    pub fn validate_base(&self) -> Result<ValidationOutcome, SofaError> {
        validate_schema(self.store.as_ref(), &BASE_SCHEMA)
    }

    /// Whether the file passes the generic SOFA rules
    pub fn is_valid(&self) -> Result<bool, SofaError> {
        Ok(self.validate_base()?.is_valid())
    }

    /// Check the file against one convention
    pub fn validate(&self, convention: Convention) -> Result<ValidationOutcome, SofaError> {
        validate_schema(self.store.as_ref(), convention.schema())
    }

    /// Whether the file conforms to the named convention
    ///
    /// Unknown names and store failures both yield `false`.
    pub fn is_valid_convention(&self, name: &str) -> bool {
        let Ok(convention) = Convention::from_name(name) else {
            debug!("'{}' is not a supported convention", name);
            return false;
        };
        match self.validate(convention) {
            Ok(outcome) => outcome.is_valid(),
            Err(e) => {
                warn!("Could not validate {} as {}: {}", self.describe(), name, e);
                false
            }
        }
    }

    /// Fail with the first violation unless the file conforms to `convention`
    pub fn require_convention(&self, convention: Convention) -> Result<(), SofaError> {
        match self.validate(convention)?.violation {
            Some(v) => Err(SofaError::Invalid(v)),
            None => Ok(()),
        }
    }

    /// Whether writes are accepted
    pub fn is_writable(&self) -> bool {
        self.store.is_writable()
    }

    /// Whether any write happened since opening
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Stored shape of a present variable
    pub(crate) fn shape_of(&self, name: &str) -> Result<Vec<usize>, SofaError> {
        self.store
            .variable_shape(name)
            .ok_or_else(|| SofaError::MissingVariable(name.to_string()))
    }

    /// Read a whole variable whose stored shape must equal `expected`
    pub(crate) fn read_buffer(
        &self,
        name: &str,
        expected: Vec<usize>,
    ) -> Result<FlatBuffer, SofaError> {
        let found = self.shape_of(name)?;
        if found != expected {
            return Err(ShapeMismatch::new(name, Mismatch::Shape { expected, found }).into());
        }
        let len = element_count(&expected).ok_or_else(|| {
            ShapeMismatch::new(
                name,
                Mismatch::Length {
                    expected: usize::MAX,
                    found: 0,
                },
            )
        })?;
        let values = self
            .store
            .read_f64(name, len)
            .map_err(|e| SofaError::store(name, e))?;
        FlatBuffer::from_shape_vec(expected, values)
            .map_err(|m| ShapeMismatch::new(name, m).into())
    }

    /// Overwrite a whole variable; `buffer` must have the stored shape
    pub(crate) fn write_buffer(&mut self, name: &str, buffer: &FlatBuffer) -> Result<(), SofaError> {
        let found = self.shape_of(name)?;
        if found != buffer.shape() {
            return Err(ShapeMismatch::new(
                name,
                Mismatch::Shape {
                    expected: found,
                    found: buffer.shape().to_vec(),
                },
            )
            .into());
        }
        self.store
            .write_f64(name, buffer.as_slice())
            .map_err(|e| SofaError::store(name, e))?;
        self.modified = true;
        Ok(())
    }

    pub(crate) fn write_attribute(
        &mut self,
        scope: AttributeScope<'_>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), SofaError> {
        let context = match scope {
            AttributeScope::Global => name.to_string(),
            AttributeScope::Variable(var) => format!("{}:{}", var, name),
        };
        self.store
            .set_attribute(scope, name, value)
            .map_err(|e| SofaError::store(context, e))?;
        self.modified = true;
        Ok(())
    }

    /// Set a global attribute
    pub fn set_attribute(&mut self, name: &str, value: impl Into<AttributeValue>) -> Result<(), SofaError> {
        self.write_attribute(AttributeScope::Global, name, value.into())
    }

    fn finish(&mut self) -> Result<(), SofaError> {
        if self.modified {
            self.write_attribute(AttributeScope::Global, ATTR_DATE_MODIFIED, timestamp().into())?;
        }
        self.store
            .flush()
            .map_err(|e| SofaError::store(self.store.describe(), e))?;
        self.modified = false;
        Ok(())
    }

    /// Flush pending writes and release the handle
    ///
    /// If anything was written, `DateModified` is bumped first.
    pub fn close(mut self) -> Result<(), SofaError> {
        let result = self.finish();
        self.closed = true;
        debug!("Closed {}", self.describe());
        result
    }
}

impl Drop for SofaFile {
    fn drop(&mut self) {
        if self.modified && !self.closed {
            warn!(
                "{} dropped with unsaved changes; call close() to persist them",
                self.describe()
            );
        }
    }
}
