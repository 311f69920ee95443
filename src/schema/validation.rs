use log::debug;

use super::constants::{ATTR_TYPE, ATTR_UNITS};
use super::{ConventionSchema, ExtraCheck, VariableMetadata, VariableSpec};
use crate::dimensions::{BindError, Dim, DimensionConflict, DimensionRegistry};
use crate::file::SofaError;
use crate::layout::{Mismatch, ShapeMismatch};
use crate::store::{ArrayStore, AttributeScope, AttributeValue, Attributes, ElementKind};
use crate::units::{CoordinateSystem, UnknownCoordinateSystem, UnknownUnit, Units};

/// First requirement of a schema that a file does not meet
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Violation {
    /// Required attribute absent; variable attributes are named `Variable:Attribute`
    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    /// Global attribute present with a value the schema rejects
    #[error("Attribute '{name}' must be {expected}, found '{found}'")]
    AttributeValue {
        /// Attribute name
        name: String,
        /// Description of the accepted values
        expected: String,
        /// Value in the file
        found: String,
    },

    /// Required variable absent
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Variable rank or axis size disagrees with the schema
    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatch),

    /// Two variables disagree on a dimension size
    #[error(transparent)]
    DimensionConflict(#[from] DimensionConflict),

    /// Dimension size disagrees with a convention-specific constraint
    #[error("Dimension {dimension} must be {expected}, found {}", display_size(.found))]
    DimensionSize {
        /// Constrained letter
        dimension: Dim,
        /// Required size
        expected: usize,
        /// Resolved size, `None` if no variable used the letter
        found: Option<usize>,
    },

    /// Stored element kind disagrees with the schema
    #[error("Variable '{variable}' must hold {expected} values, found {found}")]
    ElementType {
        /// Variable name
        variable: String,
        /// Kind required by the schema
        expected: ElementKind,
        /// Kind in the file
        found: ElementKind,
    },

    /// `Units` attribute that is not in the units table
    #[error("{variable}: {source}")]
    UnknownUnit {
        /// Variable carrying the attribute
        variable: String,
        /// Lookup failure
        source: UnknownUnit,
    },

    /// `Type` attribute that is not in the coordinate system table
    #[error("{variable}: {source}")]
    UnknownCoordinateSystem {
        /// Variable carrying the attribute
        variable: String,
        /// Lookup failure
        source: UnknownCoordinateSystem,
    },

    /// `Type`/`Units` pair that does not belong together
    #[error("Variable '{variable}' uses {coordinates} coordinates with units '{units}'")]
    IncompatibleUnits {
        /// Variable name
        variable: String,
        /// Declared coordinate system
        coordinates: CoordinateSystem,
        /// Declared units
        units: Units,
    },

    /// `Units` attribute naming another unit than the schema requires
    #[error("Variable '{variable}' must be in {expected}, found {found}")]
    WrongUnits {
        /// Variable name
        variable: String,
        /// Required unit
        expected: Units,
        /// Declared unit
        found: Units,
    },
}

fn display_size(size: &Option<usize>) -> String {
    match size {
        Some(s) => s.to_string(),
        None => "nothing".to_string(),
    }
}

impl From<BindError> for Violation {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Conflict(c) => Violation::DimensionConflict(c),
            BindError::Shape(s) => Violation::ShapeMismatch(s),
        }
    }
}

/// Verdict of one schema check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    /// Convention checked, or `"SOFA"` for the base rules
    pub convention: &'static str,
    /// First violation found, `None` if the file conforms
    pub violation: Option<Violation>,
}

impl ValidationOutcome {
    /// True if no violation was found
    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }
}

/// Check `store` against `schema`.
///
/// The checks run in a fixed order and stop at the first violation: global
/// attributes, then each variable (presence, rank and dimension binding, fixed
/// sizes, element kind, metadata), then convention-specific checks. Violations
/// are part of the `Ok` outcome; `Err` is reserved for store failures.
/// Nothing is written to the store.
pub fn validate_schema(
    store: &dyn ArrayStore,
    schema: &ConventionSchema,
) -> Result<ValidationOutcome, SofaError> {
    let convention = schema.name.unwrap_or("SOFA");
    let violation = first_violation(store, schema)?;
    match &violation {
        Some(v) => debug!("{} is not a valid {} file: {}", store.describe(), convention, v),
        None => debug!("{} is a valid {} file", store.describe(), convention),
    }
    Ok(ValidationOutcome {
        convention,
        violation,
    })
}

fn first_violation(
    store: &dyn ArrayStore,
    schema: &ConventionSchema,
) -> Result<Option<Violation>, SofaError> {
    let globals = store
        .attributes(AttributeScope::Global)
        .map_err(|e| SofaError::store("global attributes", e))?;
    for spec in schema.attribute_specs() {
        let Some(value) = globals.get(spec.name) else {
            return Ok(Some(Violation::MissingAttribute(spec.name.to_string())));
        };
        if !spec.rule.holds(value) {
            return Ok(Some(Violation::AttributeValue {
                name: spec.name.to_string(),
                expected: spec.rule.to_string(),
                found: value.to_string(),
            }));
        }
    }

    let mut registry = DimensionRegistry::seeded(store);
    for spec in schema.variables {
        if let Some(v) = check_variable(store, spec, &mut registry)? {
            return Ok(Some(v));
        }
    }

    for check in schema.extra {
        if let Some(v) = run_extra_check(store, check, &registry) {
            return Ok(Some(v));
        }
    }
    Ok(None)
}

fn check_variable(
    store: &dyn ArrayStore,
    spec: &VariableSpec,
    registry: &mut DimensionRegistry,
) -> Result<Option<Violation>, SofaError> {
    let Some(shape) = store.variable_shape(spec.name) else {
        return Ok(spec
            .required
            .then(|| Violation::MissingVariable(spec.name.to_string())));
    };

    if let Err(e) = registry.bind_variable(spec.name, &shape, spec.signatures) {
        return Ok(Some(e.into()));
    }

    if let Some(found) = store.element_kind(spec.name) {
        if found != spec.element {
            return Ok(Some(Violation::ElementType {
                variable: spec.name.to_string(),
                expected: spec.element,
                found,
            }));
        }
    }

    if spec.metadata == VariableMetadata::None {
        return Ok(None);
    }
    let attrs = store
        .attributes(AttributeScope::Variable(spec.name))
        .map_err(|e| SofaError::store(spec.name, e))?;
    Ok(check_metadata(spec, &attrs))
}

fn text_attribute<'a>(
    attrs: &'a Attributes,
    variable: &str,
    name: &str,
) -> Result<&'a AttributeValue, Violation> {
    attrs
        .get(name)
        .ok_or_else(|| Violation::MissingAttribute(format!("{}:{}", variable, name)))
}

fn check_metadata(spec: &VariableSpec, attrs: &Attributes) -> Option<Violation> {
    let result = match spec.metadata {
        VariableMetadata::None => Ok(()),
        VariableMetadata::Position { .. } => check_position_metadata(spec.name, attrs),
        VariableMetadata::Units(expected) => check_units_metadata(spec.name, attrs, expected),
    };
    result.err()
}

fn parse_units(variable: &str, value: &AttributeValue) -> Result<Units, Violation> {
    Units::from_name(&value.to_string()).map_err(|source| Violation::UnknownUnit {
        variable: variable.to_string(),
        source,
    })
}

fn check_position_metadata(variable: &str, attrs: &Attributes) -> Result<(), Violation> {
    let type_value = text_attribute(attrs, variable, ATTR_TYPE)?;
    let units_value = text_attribute(attrs, variable, ATTR_UNITS)?;
    let coordinates = CoordinateSystem::from_name(&type_value.to_string()).map_err(|source| {
        Violation::UnknownCoordinateSystem {
            variable: variable.to_string(),
            source,
        }
    })?;
    let units = parse_units(variable, units_value)?;
    if !coordinates.accepts(units) {
        return Err(Violation::IncompatibleUnits {
            variable: variable.to_string(),
            coordinates,
            units,
        });
    }
    Ok(())
}

fn check_units_metadata(variable: &str, attrs: &Attributes, expected: Units) -> Result<(), Violation> {
    let found = parse_units(variable, text_attribute(attrs, variable, ATTR_UNITS)?)?;
    if found != expected {
        return Err(Violation::WrongUnits {
            variable: variable.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn run_extra_check(
    store: &dyn ArrayStore,
    check: &ExtraCheck,
    registry: &DimensionRegistry,
) -> Option<Violation> {
    match *check {
        ExtraCheck::SameShape(a, b) => {
            let expected = store.variable_shape(a)?;
            let found = store.variable_shape(b)?;
            (expected != found).then(|| {
                ShapeMismatch::new(b, Mismatch::Shape { expected, found }).into()
            })
        }
        ExtraCheck::DimensionEquals(dimension, expected) => {
            let found = registry.get(dimension);
            (found != Some(expected)).then_some(Violation::DimensionSize {
                dimension,
                expected,
                found,
            })
        }
    }
}
