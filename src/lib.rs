//! # sofa - Spatially Oriented Format for Acoustics
//!
//! `sofa` reads, validates and writes SOFA files (AES69), the standard
//! container for head-related transfer functions, directivities and other
//! spatial acoustic measurements.
//!
//! A SOFA file is a set of named, typed, multi-dimensional arrays plus global
//! and per-variable attributes. The single-letter dimensions give each axis
//! its meaning:
//!
//! | Letter | Meaning |
//! |--------|---------|
//! | M | number of measurements |
//! | R | number of receivers (e.g. ears) |
//! | E | number of emitters |
//! | N | samples or frequency bins |
//! | I | singleton, always 1 |
//! | C | coordinate components, always 3 |
//! | S | longest string |
//!
//! ## Key Features
//!
//! - **Convention schemas**: GeneralFIR, GeneralTF, SimpleFreeFieldHRIR,
//!   SimpleFreeFieldTF and FreeFieldDirectivityTF, each described as data and
//!   checked by one shared validator.
//!
//! - **Dimension registry**: sizes are bound from the variables present in
//!   the file, so a shape disagreement is reported by name instead of
//!   producing a misindexed read.
//!
//! - **Typed accessors**: positions, frequencies, impulse responses and
//!   transfer functions come back as row-major [`FlatBuffer`]s with their
//!   shape attached.
//!
//! - **Pluggable storage**: netCDF-4 files through the `netcdf` feature, and
//!   a JSON snapshot format that needs no native library.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sofa::prelude::*;
//!
//! let file = SofaFile::open("hrtf.sofa")?;
//! let convention = file.convention()?;
//! if file.validate(convention)?.is_valid() {
//!     let ir = file.data_ir()?;
//!     println!("{} x {} x {} impulse responses", ir.shape()[0], ir.shape()[1], ir.shape()[2]);
//! }
//! # Ok::<(), sofa::SofaError>(())
//! ```
//!
//! ## Writing
//!
//! ```rust,no_run
//! use sofa::prelude::*;
//!
//! let store = SofaBuilder::new(Convention::GeneralTf)
//!     .measurements(8)
//!     .samples(64)
//!     .title("Loudspeaker directivity")
//!     .build()?;
//! store.save("directivity.sofa.json")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`store`]: the array store abstraction and its JSON and netCDF backends
//! - [`dimensions`]: dimension letters and the size registry
//! - [`layout`]: shape arithmetic and the row-major buffer
//! - [`units`]: coordinate systems and unit strings
//! - [`schema`]: convention schemas and the shared validator
//! - [`file`]: the opened-file handle and its typed accessors
//! - [`builder`]: authoring of new files
//! - [`validator`]: whole-file validation reports

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod builder;
pub mod dimensions;
pub mod file;
pub mod layout;
pub mod schema;
pub mod store;
pub mod units;
pub mod validator;

pub use dimensions::Dim;
pub use file::{SofaError, SofaFile};
pub use layout::FlatBuffer;
pub use schema::Convention;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::builder::SofaBuilder;
    pub use crate::dimensions::{Dim, DimensionRegistry, Dimensions};
    pub use crate::file::{OpenConfig, OpenMode, PositionKind, Role, SofaError, SofaFile};
    pub use crate::layout::{FlatBuffer, Mismatch, ShapeMismatch};
    pub use crate::schema::{
        list_supported_conventions, Convention, ValidationOutcome, Violation,
    };
    pub use crate::store::{ArrayStore, AttributeScope, AttributeValue, MemoryStore, StoreError};
    pub use crate::units::{CoordinateSystem, Units};
    pub use crate::validator::{validate_sofa_file, ValidationReport};
}
