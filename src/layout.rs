//! Row-major layout of multi-dimensional SOFA variables.
//!
//! The array store hands out flat `f64` buffers. [`FlatBuffer`] pairs such a
//! buffer with the ordered axis sizes that give it a logical shape, and is the
//! only type that crosses from storage to semantic access.
//!
//! For a shape `[d0, d1, ..., dn-1]` the flat position of `(i0, ..., in-1)` is
//! `sum(ik * prod(dj for j > k))`: the last axis varies fastest.

use std::fmt;

use crate::dimensions::Dim;

/// How a variable's actual layout disagrees with what was expected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Wrong number of axes
    Rank {
        /// Accepted ranks
        expected: Vec<usize>,
        /// Actual rank
        found: usize,
    },
    /// One axis disagrees with the resolved size of its dimension
    Axis {
        /// Dimension bound to the axis
        dimension: Dim,
        /// Resolved size of the dimension
        expected: usize,
        /// Axis size found in the variable
        found: usize,
    },
    /// Element count disagrees with the product of the axis sizes
    Length {
        /// Element count implied by the shape
        expected: usize,
        /// Element count supplied or reported by the store
        found: usize,
    },
    /// Whole shape disagrees
    Shape {
        /// Expected axis sizes
        expected: Vec<usize>,
        /// Actual axis sizes
        found: Vec<usize>,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Rank { expected, found } => {
                if let [single] = expected.as_slice() {
                    write!(f, "rank: expected {}, found {}", single, found)
                } else {
                    write!(f, "rank: expected one of {:?}, found {}", expected, found)
                }
            }
            Mismatch::Axis {
                dimension,
                expected,
                found,
            } => write!(
                f,
                "dimension {}: expected {}, found {}",
                dimension, expected, found
            ),
            Mismatch::Length { expected, found } => {
                write!(f, "length: expected {}, found {}", expected, found)
            }
            Mismatch::Shape { expected, found } => {
                write!(f, "shape: expected {:?}, found {:?}", expected, found)
            }
        }
    }
}

/// A variable whose rank or size disagrees with the schema or the accessor used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Shape mismatch for '{variable}': {mismatch}")]
pub struct ShapeMismatch {
    /// Variable being checked or accessed
    pub variable: String,
    /// What disagreed
    pub mismatch: Mismatch,
}

impl ShapeMismatch {
    pub(crate) fn new(variable: impl Into<String>, mismatch: Mismatch) -> Self {
        Self {
            variable: variable.into(),
            mismatch,
        }
    }
}

/// Number of elements of a buffer with the given shape, `None` on overflow
pub fn element_count(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Row-major flat position of `index` within `shape`
///
/// Returns `None` when the rank differs or any component is out of bounds.
pub fn flat_index(shape: &[usize], index: &[usize]) -> Option<usize> {
    if shape.len() != index.len() {
        return None;
    }
    let mut flat = 0usize;
    for (&i, &d) in index.iter().zip(shape) {
        if i >= d {
            return None;
        }
        flat = flat.checked_mul(d)?.checked_add(i)?;
    }
    Some(flat)
}

/// Inverse of [`flat_index`]
pub fn unflatten_index(shape: &[usize], flat: usize) -> Option<Vec<usize>> {
    if flat >= element_count(shape)? {
        return None;
    }
    let mut index = vec![0; shape.len()];
    let mut rest = flat;
    for (slot, &d) in index.iter_mut().zip(shape).rev() {
        *slot = rest % d;
        rest /= d;
    }
    Some(index)
}

/// Contiguous `f64` values with a row-major logical shape
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBuffer {
    values: Vec<f64>,
    shape: Vec<usize>,
}

impl FlatBuffer {
    /// Pair `values` with `shape`; the element count must match exactly
    pub fn from_shape_vec(shape: Vec<usize>, values: Vec<f64>) -> Result<Self, Mismatch> {
        let expected = element_count(&shape).ok_or(Mismatch::Length {
            expected: usize::MAX,
            found: values.len(),
        })?;
        if expected != values.len() {
            return Err(Mismatch::Length {
                expected,
                found: values.len(),
            });
        }
        Ok(Self { values, shape })
    }

    /// Zero-filled buffer of the given shape; fails if the element count overflows
    pub fn zeros(shape: Vec<usize>) -> Result<Self, Mismatch> {
        let len = element_count(&shape).ok_or(Mismatch::Length {
            expected: usize::MAX,
            found: 0,
        })?;
        Ok(Self {
            values: vec![0.0; len],
            shape,
        })
    }

    /// Axis sizes, outermost first
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of axes
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the buffer holds no elements
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat values in row-major order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Consume the buffer, keeping the flat values
    pub fn into_vec(self) -> Vec<f64> {
        self.values
    }

    /// Value at a multi-index
    pub fn get(&self, index: &[usize]) -> Option<f64> {
        flat_index(&self.shape, index).and_then(|i| self.values.get(i).copied())
    }

    /// Overwrite the value at a multi-index; returns false if out of bounds
    pub fn set(&mut self, index: &[usize], value: f64) -> bool {
        match flat_index(&self.shape, index).and_then(|i| self.values.get_mut(i)) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Iterate `(multi-index, value)` pairs, outer axis to inner axis
    pub fn iter_indexed(&self) -> impl Iterator<Item = (Vec<usize>, f64)> + '_ {
        self.values.iter().enumerate().filter_map(move |(flat, &v)| {
            unflatten_index(&self.shape, flat).map(|index| (index, v))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_flat_index_matches_manual_3d() {
        // element [i][j][k] of [dim1][dim2][dim3] lives at dim2*dim3*i + dim3*j + k
        let shape = [4, 2, 5];
        assert_eq!(flat_index(&shape, &[0, 0, 0]), Some(0));
        assert_eq!(flat_index(&shape, &[1, 0, 0]), Some(10));
        assert_eq!(flat_index(&shape, &[3, 1, 4]), Some(2 * 5 * 3 + 5 + 4));
        assert_eq!(flat_index(&shape, &[4, 0, 0]), None);
        assert_eq!(flat_index(&shape, &[0, 0]), None);
    }

    #[test]
    fn test_buffer_length_checked() {
        let err = FlatBuffer::from_shape_vec(vec![2, 3], vec![0.0; 5]).unwrap_err();
        assert_eq!(
            err,
            Mismatch::Length {
                expected: 6,
                found: 5
            }
        );
    }

    #[test]
    fn test_iter_indexed_order() {
        let buf = FlatBuffer::from_shape_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let items: Vec<_> = buf.iter_indexed().collect();
        assert_eq!(items[0], (vec![0, 0], 1.0));
        assert_eq!(items[1], (vec![0, 1], 2.0));
        assert_eq!(items[2], (vec![1, 0], 3.0));
        assert_eq!(items[3], (vec![1, 1], 4.0));
    }

    #[test]
    fn test_set_and_get() {
        let mut buf = FlatBuffer::zeros(vec![3, 3]).unwrap();
        assert!(buf.set(&[2, 1], 7.5));
        assert!(!buf.set(&[3, 0], 1.0));
        assert_eq!(buf.get(&[2, 1]), Some(7.5));
        assert_eq!(buf.as_slice()[7], 7.5);
    }

    #[test]
    fn test_zeros_rejects_overflowing_shape() {
        assert!(matches!(
            FlatBuffer::zeros(vec![usize::MAX, 2]),
            Err(Mismatch::Length { .. })
        ));
        let empty = FlatBuffer::zeros(vec![0, 4]).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.get(&[0, 0]), None);
    }

    #[test]
    fn test_mismatch_display() {
        let m = ShapeMismatch::new(
            "ReceiverPosition",
            Mismatch::Axis {
                dimension: Dim::R,
                expected: 2,
                found: 3,
            },
        );
        assert_eq!(
            m.to_string(),
            "Shape mismatch for 'ReceiverPosition': dimension R: expected 2, found 3"
        );
    }

    fn shape_and_index() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
        prop::collection::vec(1usize..6, 1..5).prop_flat_map(|shape| {
            let index: Vec<_> = shape.iter().map(|&d| 0..d).collect();
            (Just(shape), index)
        })
    }

    proptest! {
        /// unflatten(flatten(index)) == index for every valid multi-index
        #[test]
        fn test_flatten_round_trip((shape, index) in shape_and_index()) {
            let flat = flat_index(&shape, &index).unwrap();
            prop_assert!(flat < element_count(&shape).unwrap());
            prop_assert_eq!(unflatten_index(&shape, flat), Some(index));
        }
    }
}
