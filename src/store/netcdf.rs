use std::path::{Path, PathBuf};

use log::debug;
use netcdf::types::{FloatType, NcVariableType};

use super::{ArrayStore, AttributeScope, AttributeValue, Attributes, ElementKind, StoreError};
use crate::layout::element_count;

enum Handle {
    Read(netcdf::File),
    Append(netcdf::FileMut),
}

/// AES69 `.sofa` file accessed through libnetcdf
pub struct NetcdfStore {
    handle: Handle,
    path: PathBuf,
}

impl NetcdfStore {
    /// Open a netCDF file read-only
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path)?;
        debug!("Opened netCDF file {} (read)", path.display());
        Ok(Self {
            handle: Handle::Read(file),
            path,
        })
    }

    /// Open a netCDF file for in-place updates
    pub fn append(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::append(&path)?;
        debug!("Opened netCDF file {} (append)", path.display());
        Ok(Self {
            handle: Handle::Append(file),
            path,
        })
    }

    fn file(&self) -> &netcdf::File {
        match &self.handle {
            Handle::Read(f) => f,
            Handle::Append(f) => f,
        }
    }

    fn file_mut(&mut self) -> Result<&mut netcdf::FileMut, StoreError> {
        match &mut self.handle {
            Handle::Read(_) => Err(StoreError::ReadOnly),
            Handle::Append(f) => Ok(f),
        }
    }
}

fn convert_attribute(value: netcdf::AttributeValue) -> Option<AttributeValue> {
    use netcdf::AttributeValue as Nc;
    let converted = match value {
        Nc::Str(s) => AttributeValue::Text(s),
        Nc::Strs(v) => AttributeValue::Text(v.join(", ")),
        Nc::Double(n) => AttributeValue::Number(n),
        Nc::Doubles(v) => AttributeValue::Numbers(v),
        Nc::Float(n) => AttributeValue::Number(n as f64),
        Nc::Floats(v) => AttributeValue::Numbers(v.into_iter().map(f64::from).collect()),
        Nc::Int(n) => AttributeValue::Number(n as f64),
        Nc::Ints(v) => AttributeValue::Numbers(v.into_iter().map(f64::from).collect()),
        Nc::Short(n) => AttributeValue::Number(n as f64),
        Nc::Shorts(v) => AttributeValue::Numbers(v.into_iter().map(f64::from).collect()),
        Nc::Uchar(n) => AttributeValue::Number(n as f64),
        Nc::Schar(n) => AttributeValue::Number(n as f64),
        Nc::Longlong(n) => AttributeValue::Number(n as f64),
        _ => return None,
    };
    Some(converted)
}

fn collect_attributes<'a>(attrs: impl Iterator<Item = netcdf::Attribute<'a>>) -> Result<Attributes, StoreError> {
    let mut out = Attributes::new();
    for attr in attrs {
        let name = attr.name().to_string();
        match convert_attribute(attr.value()?) {
            Some(value) => out.insert(name, value),
            None => debug!("Skipping attribute '{}' with unsupported type", name),
        }
    }
    Ok(out)
}

impl ArrayStore for NetcdfStore {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn dimensions(&self) -> Vec<(String, usize)> {
        self.file()
            .dimensions()
            .map(|d| (d.name(), d.len()))
            .collect()
    }

    fn variables(&self) -> Vec<String> {
        self.file().variables().map(|v| v.name()).collect()
    }

    fn variable_shape(&self, name: &str) -> Option<Vec<usize>> {
        let var = self.file().variable(name)?;
        Some(var.dimensions().iter().map(|d| d.len()).collect())
    }

    fn element_kind(&self, name: &str) -> Option<ElementKind> {
        let var = self.file().variable(name)?;
        let kind = match var.vartype() {
            NcVariableType::Float(FloatType::F64) => ElementKind::Double,
            NcVariableType::Float(FloatType::F32) => ElementKind::Float,
            NcVariableType::Int(_) => ElementKind::Int,
            _ => ElementKind::Char,
        };
        Some(kind)
    }

    fn attributes(&self, scope: AttributeScope<'_>) -> Result<Attributes, StoreError> {
        match scope {
            AttributeScope::Global => collect_attributes(self.file().attributes()),
            AttributeScope::Variable(name) => {
                let var = self
                    .file()
                    .variable(name)
                    .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
                collect_attributes(var.attributes())
            }
        }
    }

    fn read_f64(&self, name: &str, expected_len: usize) -> Result<Vec<f64>, StoreError> {
        let var = self
            .file()
            .variable(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let found = element_count(&shape).unwrap_or(usize::MAX);
        if found != expected_len {
            return Err(StoreError::LengthMismatch {
                variable: name.to_string(),
                expected: expected_len,
                found,
            });
        }
        Ok(var.get_values::<f64, _>(..)?)
    }

    fn write_f64(&mut self, name: &str, data: &[f64]) -> Result<(), StoreError> {
        let file = self.file_mut()?;
        let mut var = file
            .variable_mut(name)
            .ok_or_else(|| StoreError::UnknownVariable(name.to_string()))?;
        let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
        let expected = element_count(&shape).unwrap_or(usize::MAX);
        if expected != data.len() {
            return Err(StoreError::LengthMismatch {
                variable: name.to_string(),
                expected,
                found: data.len(),
            });
        }
        var.put_values(data, ..)?;
        Ok(())
    }

    fn set_attribute(
        &mut self,
        scope: AttributeScope<'_>,
        name: &str,
        value: AttributeValue,
    ) -> Result<(), StoreError> {
        let nc_value = match value {
            AttributeValue::Text(s) => netcdf::AttributeValue::Str(s),
            AttributeValue::Number(n) => netcdf::AttributeValue::Double(n),
            AttributeValue::Numbers(v) => netcdf::AttributeValue::Doubles(v),
        };
        let file = self.file_mut()?;
        match scope {
            AttributeScope::Global => {
                file.add_attribute(name, nc_value)?;
            }
            AttributeScope::Variable(var_name) => {
                let mut var = file
                    .variable_mut(var_name)
                    .ok_or_else(|| StoreError::UnknownVariable(var_name.to_string()))?;
                var.put_attribute(name, nc_value)?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        // libnetcdf syncs on close; the handle is closed when the store is dropped
        Ok(())
    }

    fn is_writable(&self) -> bool {
        matches!(self.handle, Handle::Append(_))
    }
}
