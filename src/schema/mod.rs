//! # SOFA Convention Schemas
//!
//! A convention fixes which global attributes and variables a SOFA file must
//! carry, the dimension letters spanning each variable, and the metadata
//! attached to position-bearing variables. Conventions are plain data: every
//! variant of [`Convention`] maps to a static [`ConventionSchema`], and one shared
//! algorithm ([`validate_schema`]) checks any schema against any store.
//!
//! ## Supported Conventions
//!
//! | Convention | DataType | RoomType | Data variables | Extra checks |
//! |------------|----------|----------|----------------|--------------|
//! | GeneralFIR | FIR | any | Data.IR, Data.SamplingRate, Data.Delay | |
//! | GeneralTF | TF | any | Data.Real, Data.Imag, N | |
//! | SimpleFreeFieldHRIR | FIR | free field | as GeneralFIR, ListenerView required | R = 2, E = 1 |
//! | SimpleFreeFieldTF | TF | free field | as GeneralTF, ListenerView required | R = 2, E = 1 |
//! | FreeFieldDirectivityTF | TF | free field | as GeneralTF, ListenerView required | Data.Real and Data.Imag share a shape |
//!
//! ## Base Rules
//!
//! Every convention (and the generic "is this a SOFA file" check, [`BASE_SCHEMA`])
//! requires the AES69 global attributes, the four position variables, and
//! compatible `Type`/`Units` pairs on them. Orientation variables (`*View`,
//! `*Up`) are checked only when present unless a convention requires them.

mod constants;
mod conventions;
mod validation;


use std::fmt;
use std::str::FromStr;

pub use constants::*;
pub use conventions::BASE_SCHEMA;
pub use validation::{validate_schema, ValidationOutcome, Violation};

use crate::dimensions::Dim;
use crate::store::ElementKind;
use crate::units::{CoordinateSystem, Units};

/// Predicate on the value of a global attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeRule {
    /// Any value
    Present,
    /// Exact text
    Equals(&'static str),
    /// Numeric value no lower than the bound
    AtLeast(f64),
}

impl AttributeRule {
    /// Whether `value` satisfies the rule
    pub fn holds(&self, value: &crate::store::AttributeValue) -> bool {
        match self {
            AttributeRule::Present => true,
            AttributeRule::Equals(expected) => value.to_string() == *expected,
            AttributeRule::AtLeast(min) => value.to_number().is_some_and(|v| v >= *min),
        }
    }
}

impl fmt::Display for AttributeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeRule::Present => f.write_str("any value"),
            AttributeRule::Equals(s) => write!(f, "'{}'", s),
            AttributeRule::AtLeast(min) => write!(f, "a number >= {}", min),
        }
    }
}

/// Required global attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeSpec {
    /// Attribute name
    pub name: &'static str,
    /// Value predicate
    pub rule: AttributeRule,
}

/// Metadata attributes a variable must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableMetadata {
    /// Nothing beyond the values
    None,
    /// `Type` and `Units`, with a compatible pairing; `default` is used when authoring
    Position {
        /// Pairing written by the builder
        default: (CoordinateSystem, Units),
    },
    /// `Units`, which must name this unit
    Units(Units),
}

/// Expected layout of one named variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    /// Variable name
    pub name: &'static str,
    /// Accepted dimension signatures; the first one is used when authoring
    pub signatures: &'static [&'static [Dim]],
    /// Stored element kind
    pub element: ElementKind,
    /// Absent variables fail validation only when required
    pub required: bool,
    /// Attached metadata attributes
    pub metadata: VariableMetadata,
}

/// Convention-specific check run once every variable has passed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraCheck {
    /// Both variables have identical shapes
    SameShape(&'static str, &'static str),
    /// A dimension has a fixed size in this convention
    DimensionEquals(Dim, usize),
}

/// Static description of one convention
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConventionSchema {
    /// Value of `SOFAConventions`; `None` for the generic base rules
    pub name: Option<&'static str>,
    /// `SOFAConventionsVersion` written when authoring
    pub version: &'static str,
    /// Required `DataType`, if constrained
    pub data_type: Option<&'static str>,
    /// Required `RoomType`, if constrained
    pub room_type: Option<&'static str>,
    /// Variables in check order
    pub variables: &'static [VariableSpec],
    /// Checks run after the variables
    pub extra: &'static [ExtraCheck],
}

impl ConventionSchema {
    /// Global attribute requirements in check order
    pub fn attribute_specs(&self) -> Vec<AttributeSpec> {
        let value_or_present = |v: Option<&'static str>| match v {
            Some(s) => AttributeRule::Equals(s),
            None => AttributeRule::Present,
        };
        vec![
            AttributeSpec { name: ATTR_CONVENTIONS, rule: AttributeRule::Equals(SOFA_CONVENTIONS_VALUE) },
            AttributeSpec { name: ATTR_VERSION, rule: AttributeRule::AtLeast(MIN_SOFA_VERSION) },
            AttributeSpec { name: ATTR_SOFA_CONVENTIONS, rule: value_or_present(self.name) },
            AttributeSpec { name: ATTR_SOFA_CONVENTIONS_VERSION, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_API_NAME, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_API_VERSION, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_AUTHOR_CONTACT, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_ORGANIZATION, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_LICENSE, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_DATA_TYPE, rule: value_or_present(self.data_type) },
            AttributeSpec { name: ATTR_ROOM_TYPE, rule: value_or_present(self.room_type) },
            AttributeSpec { name: ATTR_DATE_CREATED, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_DATE_MODIFIED, rule: AttributeRule::Present },
            AttributeSpec { name: ATTR_TITLE, rule: AttributeRule::Present },
        ]
    }

    /// Spec of a variable named by this schema
    pub fn variable(&self, name: &str) -> Option<&'static VariableSpec> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Accepted signatures of a variable named by this schema
    pub fn signatures_of(&self, name: &str) -> Option<&'static [&'static [Dim]]> {
        self.variable(name).map(|v| v.signatures)
    }
}

/// Name that is not one of the supported conventions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown convention: '{0}'")]
pub struct UnknownConvention(pub String);

/// Supported SOFA conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Convention {
    /// Impulse responses, any geometry
    GeneralFir,
    /// Transfer functions, any geometry
    GeneralTf,
    /// Free-field HRIRs of a two-eared listener
    SimpleFreeFieldHrir,
    /// Free-field HRTFs of a two-eared listener
    SimpleFreeFieldTf,
    /// Free-field directivity of a sound source
    FreeFieldDirectivityTf,
}

impl Convention {
    /// Every supported convention
    pub const ALL: [Convention; 5] = [
        Convention::GeneralFir,
        Convention::GeneralTf,
        Convention::SimpleFreeFieldHrir,
        Convention::SimpleFreeFieldTf,
        Convention::FreeFieldDirectivityTf,
    ];

    /// Name as written in `SOFAConventions`
    pub fn name(self) -> &'static str {
        match self {
            Convention::GeneralFir => "GeneralFIR",
            Convention::GeneralTf => "GeneralTF",
            Convention::SimpleFreeFieldHrir => "SimpleFreeFieldHRIR",
            Convention::SimpleFreeFieldTf => "SimpleFreeFieldTF",
            Convention::FreeFieldDirectivityTf => "FreeFieldDirectivityTF",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Result<Self, UnknownConvention> {
        Convention::ALL
            .into_iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| UnknownConvention(name.to_string()))
    }

    /// Static schema of the convention
    pub fn schema(self) -> &'static ConventionSchema {
        match self {
            Convention::GeneralFir => &conventions::GENERAL_FIR,
            Convention::GeneralTf => &conventions::GENERAL_TF,
            Convention::SimpleFreeFieldHrir => &conventions::SIMPLE_FREE_FIELD_HRIR,
            Convention::SimpleFreeFieldTf => &conventions::SIMPLE_FREE_FIELD_TF,
            Convention::FreeFieldDirectivityTf => &conventions::FREE_FIELD_DIRECTIVITY_TF,
        }
    }

    /// True for conventions storing time-domain impulse responses
    pub fn is_fir(self) -> bool {
        self.schema().data_type == Some("FIR")
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Convention {
    type Err = UnknownConvention;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Convention::from_name(s)
    }
}

/// Names of every supported convention
pub fn list_supported_conventions() -> Vec<&'static str> {
    Convention::ALL.iter().map(|c| c.name()).collect()
}

/// Signatures of any variable known to some convention
///
/// Signatures do not vary between conventions, so this is what files with an
/// unknown or missing `SOFAConventions` are resolved with.
pub fn known_signatures(name: &str) -> Option<&'static [&'static [Dim]]> {
    conventions::GENERAL_FIR
        .signatures_of(name)
        .or_else(|| conventions::GENERAL_TF.signatures_of(name))
}
