use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use super::{
    ArrayStore, AttributeScope, AttributeValue, Attributes, ElementKind, StoreError,
};
use crate::layout::element_count;

/// Declared dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionDecl {
    /// Dimension name (a SOFA letter for convention dimensions)
    pub name: String,
    /// Dimension size
    pub len: usize,
}

/// Variable held by a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredVariable {
    /// Variable name
    pub name: String,
    /// Names of the declared dimensions spanning each axis
    pub dimensions: Vec<String>,
    /// Stored element kind
    pub kind: ElementKind,
    /// Variable attributes
    #[serde(default)]
    pub attributes: Attributes,
    /// Flat row-major values
    #[serde(default, with = "exact_values")]
    pub values: Vec<f64>,
}

/// Variable values as JSON numbers, with non-finite values written as their
/// bit pattern (`"0x7ff8000000000000"`) since JSON has no NaN or infinity
mod exact_values {
    use std::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::ser::{SerializeSeq, Serializer};
    use serde::Deserialize;

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(values.len()))?;
        for v in values {
            if v.is_finite() {
                seq.serialize_element(v)?;
            } else {
                seq.serialize_element(&format!("{:#018x}", v.to_bits()))?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let elements: Vec<Element> = Vec::deserialize(deserializer)?;
        Ok(elements.into_iter().map(|e| e.0).collect())
    }

    struct Element(f64);

    impl<'de> Deserialize<'de> for Element {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ElementVisitor)
        }
    }

    struct ElementVisitor;

    impl<'de> Visitor<'de> for ElementVisitor {
        type Value = Element;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or a hexadecimal bit pattern")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Element, E> {
            Ok(Element(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Element, E> {
            Ok(Element(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Element, E> {
            Ok(Element(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Element, E> {
            v.strip_prefix("0x")
                .and_then(|hex| u64::from_str_radix(hex, 16).ok())
                .map(|bits| Element(f64::from_bits(bits)))
                .ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }
    }
}

/// In-memory array store with JSON snapshot persistence
///
/// Variables span named dimensions, so (as in netCDF) a variable's axis sizes
/// always come from the declared dimension table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    dimensions: Vec<DimensionDecl>,
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    variables: Vec<StoredVariable>,
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(skip)]
    read_only: bool,
    #[serde(skip)]
    dirty: bool,
}

impl MemoryStore {
    /// Empty, writable store not bound to any path
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON snapshot read-only
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let mut store = Self::load_snapshot(path.as_ref())?;
        store.read_only = true;
        Ok(store)
    }

    /// Load a JSON snapshot for update; [`ArrayStore::flush`] writes it back
    pub fn load_for_update(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::load_snapshot(path.as_ref())
    }

    fn load_snapshot(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)?;
        let mut store: MemoryStore = serde_json::from_str(&content)?;
        store.check_dimension_references()?;
        store.path = Some(path.to_path_buf());
        debug!(
            "Loaded snapshot {} ({} dimensions, {} variables)",
            path.display(),
            store.dimensions.len(),
            store.variables.len()
        );
        Ok(store)
    }

    fn check_dimension_references(&self) -> Result<(), StoreError> {
        for var in &self.variables {
            for dim in &var.dimensions {
                if self.dimension_len(dim).is_none() {
                    return Err(StoreError::UnknownDimension {
                        variable: var.name.clone(),
                        dimension: dim.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Write the snapshot atomically to `path`
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, self)?;
        tmp.write_all(b"\n")?;
        tmp.persist(path)?;
        debug!("Saved snapshot {}", path.display());
        Ok(())
    }

    /// Size of a declared dimension
    pub fn dimension_len(&self, name: &str) -> Option<usize> {
        self.dimensions.iter().find(|d| d.name == name).map(|d| d.len)
    }

    /// Declare a dimension, or resize an existing one
    pub fn add_dimension(&mut self, name: impl Into<String>, len: usize) {
        let name = name.into();
        match self.dimensions.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.len = len,
            None => self.dimensions.push(DimensionDecl { name, len }),
        }
        self.dirty = true;
    }

    /// Create or replace a variable spanning declared dimensions
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        dimensions: &[&str],
        kind: ElementKind,
        values: Vec<f64>,
    ) -> Result<(), StoreError> {
        let name = name.into();
        let mut shape = Vec::with_capacity(dimensions.len());
        for dim in dimensions {
            let len = self
                .dimension_len(dim)
                .ok_or_else(|| StoreError::UnknownDimension {
                    variable: name.clone(),
                    dimension: dim.to_string(),
                })?;
            shape.push(len);
        }
        let expected = element_count(&shape).unwrap_or(usize::MAX);
        if expected != values.len() {
            return Err(StoreError::LengthMismatch {
                variable: name,
                expected,
                found: values.len(),
            });
        }

        let var = StoredVariable {
            name,
            dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
            kind,
            attributes: Attributes::new(),
            values,
        };
        match self.variables.iter_mut().find(|v| v.name == var.name) {
            Some(existing) => *existing = var,
            None => self.variables.push(var),
        }
        self.dirty = true;
        Ok(())
    }

    /// Drop a variable; returns false if it did not exist
    pub fn remove_variable(&mut self, name: &str) -> bool {
        let before = self.variables.len();
        self.variables.retain(|v| v.name != name);
        let removed = self.variables.len() != before;
        self.dirty |= removed;
        removed
    }

    /// Drop an attribute; returns false if it did not exist
    pub fn remove_attribute(&mut self, scope: AttributeScope<'_>, name: &str) -> bool {
        let removed = match scope {
            AttributeScope::Global => self.attributes.remove(name).is_some(),
            AttributeScope::Variable(var) => self
                .variable_mut(var)
                .map(|v| v.attributes.remove(name).is_some())
                .unwrap_or(false),
        };
        self.dirty |= removed;
        removed
    }

    /// Dimension names spanning a variable
    pub fn variable_dimensions(&self, name: &str) -> Option<&[String]> {
        self.variable(name).map(|v| v.dimensions.as_slice())
    }

    /// Path the snapshot was loaded from
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn variable(&self, name: &str) -> Option<&StoredVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    fn variable_mut(&mut self, name: &str) -> Option<&mut StoredVariable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }
}

impl ArrayStore for MemoryStore {
    fn describe(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<memory>".to_string(),
        }
    }

    fn dimensions(&self) -> Vec<(String, usize)> {
        self.dimensions
            .iter()
            .map(|d| (d.name.clone(), d.len))
            .collect()
    }

    fn variables(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn variable_shape(&self, name: &str) -> Option<Vec<usize>> {
        let var = self.variable(name)?;
        var.dimensions
            .iter()
            .map(|d| self.dimension_len(d))
            .collect()
    }

    fn element_kind(&self, name: &str) -> Option<ElementKind> {
        self.variable(name).map(|v| v.kind)
    }

    fn attributes(&self, scope: AttributeScope<'_>) -> Result<Attributes, StoreError> {
        match scope {
            AttributeScope::Global => Ok(self.attributes.clone()),
            AttributeScope::Variable(name) => self
                .variable(name)
                .map(|v| v.attributes.clone())
                .ok_or_else(|| StoreError::UnknownVariable(name.to_string())),
        }
    }

    fn read_f64(&self, name: &str, expected_len: usize) -> Result<Vec<f64>, StoreError> {
        let var = self
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        if var.kind == ElementKind::Char {
            return Err(StoreError::Unsupported(format!(
                "'{}' holds character data",
                name
            )));
        }
        if var.values.len() != expected_len {
            return Err(StoreError::LengthMismatch {
                variable: name.to_string(),
                expected: expected_len,
                found: var.values.len(),
            });
        }
        Ok(var.values.clone())
    }

    fn write_f64(&mut self, name: &str, data: &[f64]) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let expected = self
            .variable_shape(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))
            .map(|shape| element_count(&shape).unwrap_or(usize::MAX))?;
        if expected != data.len() {
            return Err(StoreError::LengthMismatch {
                variable: name.to_string(),
                expected,
                found: data.len(),
            });
        }
        if let Some(var) = self.variable_mut(name) {
            var.values = data.to_vec();
        }
        self.dirty = true;
        Ok(())
    }

    fn set_attribute(
        &mut self,
        scope: AttributeScope<'_>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        match scope {
            AttributeScope::Global => self.attributes.insert(name, value),
            AttributeScope::Variable(var) => self
                .variable_mut(var)
                .ok_or_else(|| StoreError::UnknownVariable(var.to_string()))?
                .attributes
                .insert(name, value),
        }
        self.dirty = true;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty || self.read_only {
            return Ok(());
        }
        if let Some(path) = self.path.clone() {
            self.save(&path)?;
        }
        self.dirty = false;
        Ok(())
    }

    fn is_writable(&self) -> bool {
        !self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn small_store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_dimension("M", 2);
        store.add_dimension("C", 3);
        store
            .add_variable(
                "SourcePosition",
                &["M", "C"],
                ElementKind::Double,
                vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            )
            .unwrap();
        store
    }

    #[test]
    fn test_shape_from_named_dimensions() {
        let store = small_store();
        assert_eq!(store.variable_shape("SourcePosition"), Some(vec![2, 3]));
        assert_eq!(store.variable_shape("Missing"), None);
        assert_eq!(store.dimensions(), vec![("M".to_string(), 2), ("C".to_string(), 3)]);
    }

    #[test]
    fn test_add_variable_rejects_bad_length() {
        let mut store = small_store();
        let err = store
            .add_variable("ListenerPosition", &["M", "C"], ElementKind::Double, vec![0.0; 5])
            .unwrap_err();
        assert!(matches!(err, StoreError::LengthMismatch { expected: 6, found: 5, .. }));
    }

    #[test]
    fn test_add_variable_rejects_undeclared_dimension() {
        let mut store = small_store();
        let err = store
            .add_variable("X", &["Q"], ElementKind::Double, vec![])
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownDimension { .. }));
    }

    #[test]
    fn test_read_checks_expected_length() {
        let store = small_store();
        assert_eq!(store.read_f64("SourcePosition", 6).unwrap().len(), 6);
        assert!(matches!(
            store.read_f64("SourcePosition", 4),
            Err(StoreError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = small_store();
        store
            .set_attribute(AttributeScope::Global, "Conventions", "SOFA".into())
            .unwrap();
        store.save(&path).unwrap();

        let loaded = MemoryStore::load(&path).unwrap();
        assert_eq!(loaded.variables(), vec!["SourcePosition".to_string()]);
        assert_eq!(
            loaded.attributes(AttributeScope::Global).unwrap().get("Conventions"),
            Some(&AttributeValue::from("SOFA"))
        );
        assert!(!loaded.is_writable());
    }

    #[test]
    fn test_snapshot_keeps_non_finite_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let values = vec![
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::MIN_POSITIVE / 4.0,
            -0.0,
            0.1,
        ];
        let mut store = small_store();
        store.write_f64("SourcePosition", &values).unwrap();
        store.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"0x7ff0000000000000\""), "{}", text);
        assert!(!text.contains("null"));

        let loaded = MemoryStore::load(&path).unwrap();
        let read: Vec<u64> = loaded
            .read_f64("SourcePosition", 6)
            .unwrap()
            .iter()
            .map(|v| v.to_bits())
            .collect();
        let written: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
        assert_eq!(read, written);
    }

    #[test]
    fn test_snapshot_rejects_malformed_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"dimensions":[{"name":"N","len":1}],"variables":[{"name":"N","dimensions":["N"],"kind":"double","values":["nan"]}]}"#,
        )
        .unwrap();
        assert!(matches!(MemoryStore::load(&path), Err(StoreError::JsonError(_))));
    }

    #[test]
    fn test_read_only_snapshot_rejects_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        small_store().save(&path).unwrap();

        let mut loaded = MemoryStore::load(&path).unwrap();
        assert!(matches!(
            loaded.write_f64("SourcePosition", &[0.0; 6]),
            Err(StoreError::ReadOnly)
        ));
    }

    #[test]
    fn test_flush_writes_back_updates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        small_store().save(&path).unwrap();

        let mut store = MemoryStore::load_for_update(&path).unwrap();
        store.write_f64("SourcePosition", &[9.0; 6]).unwrap();
        store.flush().unwrap();

        let reloaded = MemoryStore::load(&path).unwrap();
        assert_eq!(reloaded.read_f64("SourcePosition", 6).unwrap(), vec![9.0; 6]);
    }
}
