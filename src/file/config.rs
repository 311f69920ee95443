use std::path::Path;

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Read-only access
    #[default]
    Read,
    /// Read and in-place update
    Append,
}

/// Array store implementation backing a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// JSON snapshot of an in-memory store
    Json,
    /// netCDF-4 file (AES69 `.sofa`); requires the `netcdf` feature
    Netcdf,
}

impl Backend {
    /// Pick a backend from the file extension: `.json` is a snapshot, anything else netCDF
    pub fn detect(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Backend::Json,
            _ => Backend::Netcdf,
        }
    }
}

/// Configuration for opening SOFA files
#[derive(Debug, Clone, Default)]
pub struct OpenConfig {
    /// Access mode
    pub mode: OpenMode,
    /// Backend override; `None` detects from the extension
    pub backend: Option<Backend>,
}

impl OpenConfig {
    /// Default read-only configuration
    pub fn read() -> Self {
        Self::default()
    }

    /// Configuration for in-place updates
    pub fn append() -> Self {
        Self {
            mode: OpenMode::Append,
            ..Self::default()
        }
    }

    /// Force a backend
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }
}
