//! TOML configuration for `sofainfo`.
//!
//! Selects which sections are printed:
//!
//! ```toml
//! # sofainfo.toml
//! [display]
//! listener = true
//! source = false
//! receivers = true
//! emitters = true
//! frequencies = true
//! data = false
//! pad_width = 40
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root of a `sofainfo.toml` file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Output sections
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Which parts of a file `sofainfo` prints
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Listener position, view and up
    pub listener: bool,
    /// Source position, view and up
    pub source: bool,
    /// Receiver positions
    pub receivers: bool,
    /// Emitter positions
    pub emitters: bool,
    /// Frequency axis (TF) or sampling rate (FIR)
    pub frequencies: bool,
    /// Response data arrays
    pub data: bool,
    /// Width labels are padded to
    pub pad_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            listener: true,
            source: false,
            receivers: true,
            emitters: true,
            frequencies: true,
            data: true,
            pad_width: 30,
        }
    }
}

impl Config {
    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
