//! Authoring of new, convention-conformant SOFA files.
//!
//! ```rust
//! use sofa::builder::SofaBuilder;
//! use sofa::schema::Convention;
//!
//! let file = SofaBuilder::new(Convention::SimpleFreeFieldHrir)
//!     .measurements(4)
//!     .samples(256)
//!     .title("Dummy head")
//!     .build_file()?;
//! assert!(file.is_valid_convention("SimpleFreeFieldHRIR"));
//! assert_eq!(file.data_ir()?.shape(), &[4, 2, 256]);
//! # Ok::<(), sofa::SofaError>(())
//! ```

use log::debug;

use crate::dimensions::Dim;
use crate::file::{timestamp, SofaError, SofaFile};
use crate::layout::element_count;
use crate::schema::{
    Convention, ExtraCheck, VariableMetadata, ATTR_API_NAME, ATTR_API_VERSION,
    ATTR_AUTHOR_CONTACT, ATTR_CONVENTIONS, ATTR_DATA_TYPE, ATTR_DATE_CREATED, ATTR_DATE_MODIFIED,
    ATTR_LICENSE, ATTR_ORGANIZATION, ATTR_ROOM_TYPE, ATTR_SOFA_CONVENTIONS,
    ATTR_SOFA_CONVENTIONS_VERSION, ATTR_TITLE, ATTR_TYPE, ATTR_UNITS, ATTR_VERSION,
    DEFAULT_LICENSE, FREE_FIELD, SOFA_CONVENTIONS_VALUE, VAR_DATA_SAMPLING_RATE,
};
use crate::store::{ArrayStore, AttributeScope, AttributeValue, MemoryStore};

/// AES69 version written into new files
pub const SOFA_VERSION: &str = "2.1";

/// Builder for an in-memory SOFA file of one convention
#[derive(Debug, Clone)]
pub struct SofaBuilder {
    convention: Convention,
    measurements: usize,
    receivers: usize,
    emitters: usize,
    samples: usize,
    sampling_rate: f64,
    attributes: Vec<(String, AttributeValue)>,
}

impl SofaBuilder {
    /// Start a file of `convention` with one measurement, receiver, emitter and sample
    ///
    /// Conventions that fix a dimension (two receivers for the free-field HRTF
    /// conventions) start at the fixed size.
    pub fn new(convention: Convention) -> Self {
        let fixed = |dim: Dim| {
            convention.schema().extra.iter().find_map(|check| match *check {
                ExtraCheck::DimensionEquals(d, size) if d == dim => Some(size),
                _ => None,
            })
        };
        Self {
            convention,
            measurements: 1,
            receivers: fixed(Dim::R).unwrap_or(1),
            emitters: fixed(Dim::E).unwrap_or(1),
            samples: 1,
            sampling_rate: 48000.0,
            attributes: Vec::new(),
        }
    }

    /// Number of measurements (M)
    pub fn measurements(mut self, m: usize) -> Self {
        self.measurements = m;
        self
    }

    /// Number of receivers (R)
    pub fn receivers(mut self, r: usize) -> Self {
        self.receivers = r;
        self
    }

    /// Number of emitters (E)
    pub fn emitters(mut self, e: usize) -> Self {
        self.emitters = e;
        self
    }

    /// Number of samples or frequency bins (N)
    pub fn samples(mut self, n: usize) -> Self {
        self.samples = n;
        self
    }

    /// Sampling rate in hertz, for impulse-response conventions
    pub fn sampling_rate(mut self, hz: f64) -> Self {
        self.sampling_rate = hz;
        self
    }

    /// Set or override a global attribute
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// `Title`
    pub fn title(self, title: &str) -> Self {
        self.attribute(ATTR_TITLE, title)
    }

    /// `AuthorContact`
    pub fn author_contact(self, contact: &str) -> Self {
        self.attribute(ATTR_AUTHOR_CONTACT, contact)
    }

    /// `Organization`
    pub fn organization(self, organization: &str) -> Self {
        self.attribute(ATTR_ORGANIZATION, organization)
    }

    /// `License`
    pub fn license(self, license: &str) -> Self {
        self.attribute(ATTR_LICENSE, license)
    }

    /// Build the store: dimensions, attributes, and every required variable zero-filled
    pub fn build(self) -> Result<MemoryStore, SofaError> {
        let schema = self.convention.schema();
        let mut store = MemoryStore::new();
        for (dim, len) in [
            (Dim::I, 1),
            (Dim::C, 3),
            (Dim::M, self.measurements),
            (Dim::R, self.receivers),
            (Dim::E, self.emitters),
            (Dim::N, self.samples),
        ] {
            store.add_dimension(dim.letter(), len);
        }

        let now = timestamp();
        let defaults: [(&str, AttributeValue); 14] = [
            (ATTR_CONVENTIONS, SOFA_CONVENTIONS_VALUE.into()),
            (ATTR_VERSION, SOFA_VERSION.into()),
            (ATTR_SOFA_CONVENTIONS, self.convention.name().into()),
            (ATTR_SOFA_CONVENTIONS_VERSION, schema.version.into()),
            (ATTR_API_NAME, env!("CARGO_PKG_NAME").into()),
            (ATTR_API_VERSION, env!("CARGO_PKG_VERSION").into()),
            (ATTR_AUTHOR_CONTACT, "".into()),
            (ATTR_ORGANIZATION, "".into()),
            (ATTR_LICENSE, DEFAULT_LICENSE.into()),
            (ATTR_DATA_TYPE, schema.data_type.unwrap_or("FIR").into()),
            (ATTR_ROOM_TYPE, schema.room_type.unwrap_or(FREE_FIELD).into()),
            (ATTR_DATE_CREATED, now.as_str().into()),
            (ATTR_DATE_MODIFIED, now.as_str().into()),
            (ATTR_TITLE, "".into()),
        ];
        let overrides = self.attributes.iter().map(|(n, v)| (n.as_str(), v.clone()));
        for (name, value) in defaults.into_iter().chain(overrides) {
            store
                .set_attribute(AttributeScope::Global, name, value)
                .map_err(|e| SofaError::store(name, e))?;
        }

        for spec in schema.variables.iter().filter(|v| v.required) {
            let Some(signature) = spec.signatures.first() else {
                continue;
            };
            let letters: Vec<&str> = signature.iter().map(|d| d.letter()).collect();
            let shape: Vec<usize> = letters
                .iter()
                .filter_map(|l| store.dimension_len(l))
                .collect();
            let len = element_count(&shape).unwrap_or(0);
            let fill = if spec.name == VAR_DATA_SAMPLING_RATE {
                self.sampling_rate
            } else {
                0.0
            };
            store
                .add_variable(spec.name, &letters, spec.element, vec![fill; len])
                .map_err(|e| SofaError::store(spec.name, e))?;

            let scope = AttributeScope::Variable(spec.name);
            let attrs: Vec<(&str, &str)> = match spec.metadata {
                VariableMetadata::None => vec![],
                VariableMetadata::Position {
                    default: (coordinates, units),
                } => vec![(ATTR_TYPE, coordinates.name()), (ATTR_UNITS, units.name())],
                VariableMetadata::Units(units) => vec![(ATTR_UNITS, units.name())],
            };
            for (name, value) in attrs {
                store
                    .set_attribute(scope, name, value.into())
                    .map_err(|e| SofaError::store(format!("{}:{}", spec.name, name), e))?;
            }
        }

        debug!(
            "Built {} file (M={}, R={}, E={}, N={})",
            self.convention, self.measurements, self.receivers, self.emitters, self.samples
        );
        Ok(store)
    }

    /// Build and wrap in a writable [`SofaFile`]
    pub fn build_file(self) -> Result<SofaFile, SofaError> {
        Ok(SofaFile::from_store(self.build()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_convention_builds_valid() {
        for convention in Convention::ALL {
            let file = SofaBuilder::new(convention)
                .measurements(3)
                .samples(8)
                .build_file()
                .unwrap();
            let outcome = file.validate(convention).unwrap();
            assert!(outcome.is_valid(), "{}: {:?}", convention, outcome.violation);
            assert!(file.is_valid().unwrap());
            assert_eq!(file.convention().unwrap(), convention);
        }
    }

    #[test]
    fn test_fixed_receivers_for_free_field_hrtf() {
        let file = SofaBuilder::new(Convention::SimpleFreeFieldTf)
            .build_file()
            .unwrap();
        assert_eq!(file.num_receivers().unwrap(), 2);
        assert_eq!(file.num_emitters().unwrap(), 1);
    }

    #[test]
    fn test_overrides_and_defaults() {
        let file = SofaBuilder::new(Convention::GeneralFir)
            .title("Room A")
            .attribute("Comment", "test")
            .build_file()
            .unwrap();
        assert_eq!(file.attribute_text(ATTR_TITLE).unwrap(), "Room A");
        assert_eq!(file.attribute_text("Comment").unwrap(), "test");
        assert_eq!(file.attribute_text(ATTR_LICENSE).unwrap(), DEFAULT_LICENSE);
        let (rate, units) = file.sampling_rate().unwrap();
        assert_eq!(rate, vec![48000.0]);
        assert_eq!(units, crate::units::Units::Hertz);
    }
}
