//! Dimension Registry
//!
//! SOFA names its axes with single letters shared across variables:
//!
//! | Letter | Meaning |
//! |--------|---------|
//! | `M` | measurements |
//! | `R` | receivers |
//! | `E` | emitters |
//! | `N` | data samples or frequency bins |
//! | `I` | singleton axis, always 1 |
//! | `C` | coordinate triplet, always 3 |
//! | `S` | string length |
//!
//! The registry records the first size seen for each letter and reports the
//! first disagreement. Sizes declared by the store itself seed the registry, so
//! a variable that contradicts a declared size is a shape error on that
//! variable rather than a conflict between two variables.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;

use crate::layout::{Mismatch, ShapeMismatch};
use crate::store::ArrayStore;

/// Dimension letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dim {
    /// Measurements
    M,
    /// Receivers
    R,
    /// Emitters
    E,
    /// Data samples / frequency bins
    N,
    /// Singleton
    I,
    /// Coordinate triplet
    C,
    /// String length
    S,
}

impl Dim {
    /// Every letter, in canonical order
    pub const ALL: [Dim; 7] = [Dim::M, Dim::R, Dim::E, Dim::N, Dim::I, Dim::C, Dim::S];

    /// Letter as stored in files
    pub fn letter(self) -> &'static str {
        match self {
            Dim::M => "M",
            Dim::R => "R",
            Dim::E => "E",
            Dim::N => "N",
            Dim::I => "I",
            Dim::C => "C",
            Dim::S => "S",
        }
    }

    /// Parse a stored dimension name; only exact single letters match
    pub fn from_name(name: &str) -> Option<Dim> {
        Dim::ALL.into_iter().find(|d| d.letter() == name)
    }

    /// Size mandated by the format, if any
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            Dim::I => Some(1),
            Dim::C => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Where a recorded size came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionOrigin {
    /// Dimension table of the store
    Declared,
    /// First variable that used the letter
    Variable(String),
}

impl fmt::Display for DimensionOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DimensionOrigin::Declared => f.write_str("the declared dimension"),
            DimensionOrigin::Variable(name) => write!(f, "'{}'", name),
        }
    }
}

/// Two variables disagree on the size of a shared dimension
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "Dimension {dimension} conflict: {first} has size {first_size}, '{second}' has size {second_size}"
)]
pub struct DimensionConflict {
    /// Letter in dispute
    pub dimension: Dim,
    /// Who recorded the size first
    pub first: DimensionOrigin,
    /// Size recorded first
    pub first_size: usize,
    /// Variable that disagreed
    pub second: String,
    /// Size found in that variable
    pub second_size: usize,
}

/// Why a variable could not be bound
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// Disagreement with another variable
    #[error(transparent)]
    Conflict(#[from] DimensionConflict),
    /// Wrong rank, or disagreement with a declared size
    #[error(transparent)]
    Shape(#[from] ShapeMismatch),
}

/// Resolved letter sizes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    sizes: BTreeMap<Dim, usize>,
}

impl Dimensions {
    /// Size of a letter, if resolved
    pub fn get(&self, dim: Dim) -> Option<usize> {
        self.sizes.get(&dim).copied()
    }

    /// Resolved `(letter, size)` pairs in canonical letter order
    pub fn iter(&self) -> impl Iterator<Item = (Dim, usize)> + '_ {
        self.sizes.iter().map(|(d, s)| (*d, *s))
    }

    /// Number of resolved letters
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// True if nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

/// Accumulates first-seen sizes per letter
#[derive(Debug, Clone, Default)]
pub struct DimensionRegistry {
    bound: BTreeMap<Dim, (usize, DimensionOrigin)>,
}

impl DimensionRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with the store's declared SOFA-letter dimensions
    ///
    /// Declared names that are not SOFA letters are ignored.
    pub fn seeded(store: &dyn ArrayStore) -> Self {
        let mut registry = Self::new();
        for (name, len) in store.dimensions() {
            if let Some(dim) = Dim::from_name(&name) {
                registry.bound.entry(dim).or_insert((len, DimensionOrigin::Declared));
            }
        }
        registry
    }

    /// Record `size` for `dim`, or compare against the recorded size
    pub fn bind(
        &mut self,
        dim: Dim,
        size: usize,
        origin: DimensionOrigin,
    ) -> Result<(), DimensionConflict> {
        match self.bound.get(&dim) {
            Some((recorded, first)) if *recorded != size => Err(DimensionConflict {
                dimension: dim,
                first: first.clone(),
                first_size: *recorded,
                second: match origin {
                    DimensionOrigin::Variable(name) => name,
                    DimensionOrigin::Declared => dim.letter().to_string(),
                },
                second_size: size,
            }),
            Some(_) => Ok(()),
            None => {
                self.bound.insert(dim, (size, origin));
                Ok(())
            }
        }
    }

    /// Bind every axis of `variable` through one of its accepted signatures
    ///
    /// Candidates are the signatures whose length equals the variable's rank,
    /// tried in order; the first one consistent with the registry and with the
    /// fixed sizes of `I` and `C` is committed
    /// and returned. When none is consistent nothing is recorded and the first
    /// disagreement of the first candidate is reported.
    pub fn bind_variable<'s>(
        &mut self,
        variable: &str,
        shape: &[usize],
        signatures: &[&'s [Dim]],
    ) -> Result<&'s [Dim], BindError> {
        let candidates: Vec<&'s [Dim]> = signatures
            .iter()
            .copied()
            .filter(|sig| sig.len() == shape.len())
            .collect();
        if candidates.is_empty() {
            let mut ranks: Vec<usize> = signatures.iter().map(|s| s.len()).collect();
            ranks.sort_unstable();
            ranks.dedup();
            return Err(ShapeMismatch::new(
                variable,
                Mismatch::Rank {
                    expected: ranks,
                    found: shape.len(),
                },
            )
            .into());
        }

        let mut first_error = None;
        for signature in candidates {
            match self.try_signature(variable, shape, signature) {
                Ok(()) => return Ok(signature),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        // candidates is non-empty, so at least one error was recorded
        Err(first_error.unwrap_or_else(|| {
            ShapeMismatch::new(
                variable,
                Mismatch::Rank {
                    expected: vec![],
                    found: shape.len(),
                },
            )
            .into()
        }))
    }

    fn try_signature(
        &mut self,
        variable: &str,
        shape: &[usize],
        signature: &[Dim],
    ) -> Result<(), BindError> {
        let mut trial = self.clone();
        for (&dim, &size) in signature.iter().zip(shape) {
            if let Some(fixed) = dim.fixed_size().filter(|&f| f != size) {
                return Err(ShapeMismatch::new(
                    variable,
                    Mismatch::Axis {
                        dimension: dim,
                        expected: fixed,
                        found: size,
                    },
                )
                .into());
            }
            if let Err(conflict) = trial.bind(dim, size, DimensionOrigin::Variable(variable.to_string())) {
                return Err(match conflict.first {
                    DimensionOrigin::Declared => ShapeMismatch::new(
                        variable,
                        Mismatch::Axis {
                            dimension: dim,
                            expected: conflict.first_size,
                            found: size,
                        },
                    )
                    .into(),
                    DimensionOrigin::Variable(_) => conflict.into(),
                });
            }
        }
        *self = trial;
        Ok(())
    }

    /// Seed from `store`, then bind every present variable `lookup` knows about
    ///
    /// Variables are scanned in the store's declaration order; scanning stops at
    /// the first failure.
    pub fn resolve<'s, F>(store: &dyn ArrayStore, lookup: F) -> Result<Dimensions, BindError>
    where
        F: Fn(&str) -> Option<&'s [&'s [Dim]]>,
    {
        let mut registry = Self::seeded(store);
        for name in store.variables() {
            let Some(signatures) = lookup(&name) else {
                continue;
            };
            let Some(shape) = store.variable_shape(&name) else {
                continue;
            };
            registry.bind_variable(&name, &shape, signatures)?;
        }
        let dims = registry.snapshot();
        debug!("Resolved {} dimensions for {}", dims.len(), store.describe());
        Ok(dims)
    }

    /// Size recorded for a letter
    pub fn get(&self, dim: Dim) -> Option<usize> {
        self.bound.get(&dim).map(|(size, _)| *size)
    }

    /// Immutable copy of the recorded sizes
    pub fn snapshot(&self) -> Dimensions {
        Dimensions {
            sizes: self.bound.iter().map(|(d, (s, _))| (*d, *s)).collect(),
        }
    }
}
