//! # Array Store Adapter
//!
//! The convention layer never touches bytes on disk. It talks to a
//! self-describing N-dimensional array store through [`ArrayStore`]: variable and
//! attribute enumeration, axis sizes, and typed `f64` buffer I/O by variable name.
//!
//! ## Backends
//!
//! - [`MemoryStore`]: in-memory store, persisted as a JSON snapshot. Used for
//!   authoring, fixtures and tests.
//! - `NetcdfStore` (feature `netcdf`): AES69 `.sofa` files, which are netCDF-4/HDF5.

mod error;
mod memory;
#[cfg(feature = "netcdf")]
mod netcdf;

pub use error::StoreError;
pub use memory::{DimensionDecl, MemoryStore, StoredVariable};
#[cfg(feature = "netcdf")]
pub use self::netcdf::NetcdfStore;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric kind of a stored variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// 64-bit float (every SOFA numeric variable)
    Double,
    /// 32-bit float
    Float,
    /// Any integer width
    Int,
    /// Character data (string variables, S dimension)
    Char,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementKind::Double => "double",
            ElementKind::Float => "float",
            ElementKind::Int => "int",
            ElementKind::Char => "char",
        };
        f.write_str(name)
    }
}

/// Value of a global or variable attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Character attribute (the common case in SOFA)
    Text(String),
    /// Scalar numeric attribute
    Number(f64),
    /// Numeric vector attribute
    Numbers(Vec<f64>),
}

impl AttributeValue {
    /// Text content, if this is a character attribute
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric reading of the attribute; text is parsed
    pub fn to_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Text(s) => s.trim().parse().ok(),
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Numbers(v) if v.len() == 1 => Some(v[0]),
            AttributeValue::Numbers(_) => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::Numbers(v) => {
                let parts: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

/// One named attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Attribute value
    pub value: AttributeValue,
}

/// Attributes in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    /// Empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute by exact name
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|a| a.name == name).map(|a| &a.value)
    }

    /// Replace an existing attribute in place or append a new one
    pub fn insert(&mut self, name: impl Into<String>, value: AttributeValue) {
        let name = name.into();
        match self.0.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Attribute { name, value }),
        }
    }

    /// Remove an attribute, returning its value
    pub fn remove(&mut self, name: &str) -> Option<AttributeValue> {
        let pos = self.0.iter().position(|a| a.name == name)?;
        Some(self.0.remove(pos).value)
    }

    /// Iterate `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|a| (a.name.as_str(), &a.value))
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no attributes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AttributeValue)> for Attributes {
    fn from_iter<T: IntoIterator<Item = (String, AttributeValue)>>(iter: T) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

/// Which attribute table an operation addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeScope<'a> {
    /// File-level attributes
    Global,
    /// Attributes attached to one variable
    Variable(&'a str),
}

/// Generic handle onto a self-describing N-dimensional array file
///
/// Implementations are plain adapters: no SOFA semantics, no caching, no locking.
pub trait ArrayStore {
    /// Human-readable origin (path or label) for diagnostics
    fn describe(&self) -> String;

    /// Declared dimensions as `(name, size)`, in declaration order
    fn dimensions(&self) -> Vec<(String, usize)>;

    /// Variable names, in declaration order
    fn variables(&self) -> Vec<String>;

    /// Axis sizes of a variable, `None` if absent
    fn variable_shape(&self, name: &str) -> Option<Vec<usize>>;

    /// Stored element kind of a variable, `None` if absent
    fn element_kind(&self, name: &str) -> Option<ElementKind>;

    /// All attributes of one scope
    fn attributes(&self, scope: AttributeScope<'_>) -> Result<Attributes, StoreError>;

    /// Read a whole variable as `f64`; the stored element count must equal `expected_len`
    fn read_f64(&self, name: &str, expected_len: usize) -> Result<Vec<f64>, StoreError>;

    /// Overwrite a whole variable; `data` must match the stored element count
    fn write_f64(&mut self, name: &str, data: &[f64]) -> Result<(), StoreError>;

    /// Create or replace one attribute
    fn set_attribute(
        &mut self,
        scope: AttributeScope<'_>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError>;

    /// Make pending writes durable
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }

    /// Whether writes are accepted
    fn is_writable(&self) -> bool;

    /// Whether a variable exists
    fn has_variable(&self, name: &str) -> bool {
        self.variable_shape(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_json_forms() {
        let text: AttributeValue = serde_json::from_str("\"SOFA\"").unwrap();
        assert_eq!(text, AttributeValue::Text("SOFA".to_string()));
        let number: AttributeValue = serde_json::from_str("48000.0").unwrap();
        assert_eq!(number, AttributeValue::Number(48000.0));
        let numbers: AttributeValue = serde_json::from_str("[1.0, 2.0]").unwrap();
        assert_eq!(numbers, AttributeValue::Numbers(vec![1.0, 2.0]));
    }

    #[test]
    fn test_attribute_value_to_number() {
        assert_eq!(AttributeValue::from("2.1").to_number(), Some(2.1));
        assert_eq!(AttributeValue::from("free field").to_number(), None);
        assert_eq!(AttributeValue::Numbers(vec![3.0]).to_number(), Some(3.0));
    }

    #[test]
    fn test_attributes_keep_declaration_order() {
        let mut attrs = Attributes::new();
        attrs.insert("b", "1".into());
        attrs.insert("a", "2".into());
        attrs.insert("b", "3".into());
        let names: Vec<_> = attrs.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(attrs.get("b"), Some(&AttributeValue::from("3")));
        assert_eq!(attrs.remove("a"), Some(AttributeValue::from("2")));
        assert_eq!(attrs.len(), 1);
    }
}
