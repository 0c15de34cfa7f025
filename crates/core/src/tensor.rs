//! Flat tensor buffer
//!
//! A `Tensor` is nothing more than an owned run of `f64` elements. Its shape
//! is never stored: every shape-sensitive operation in [`crate::algebra`]
//! receives extents or strides from the caller and validates them against
//! `len()` before touching the buffer.

use std::fmt::Write as _;

/// Default number of elements per displayed row
pub const DEFAULT_COLUMNS: usize = 4;

/// Largest tensor any operation will allocate
///
/// `matrix` enforces the same bound, so every tensor that exists can be
/// written out and replayed.
pub const MAX_TENSOR_LEN: usize = 1 << 26;

/// Owned row-major buffer of doubles
///
/// Cloning is always an explicit deep copy; no two values ever share a buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
}

impl Tensor {
    pub fn new() -> Self {
        Tensor { data: Vec::new() }
    }

    /// Tensor of `len` copies of `value`
    pub fn filled(len: usize, value: f64) -> Self {
        Tensor {
            data: vec![value; len],
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Apply `f` to every element in place
    pub fn map_in_place(&mut self, f: impl Fn(f64) -> f64) {
        for x in self.data.iter_mut() {
            *x = f(*x);
        }
    }

    /// Render as rows of `columns` elements, three decimals each
    ///
    /// This is a presentation wrap only; it knows nothing about the extents
    /// the data was built with. A `columns` of zero is treated as one.
    pub fn render(&self, columns: usize) -> String {
        let columns = columns.max(1);
        let Some((first, rest)) = self.data.split_first() else {
            return "[ ]".to_string();
        };

        let mut out = String::new();
        let _ = write!(out, "[ {:2.3}", first);
        for (offset, x) in rest.iter().enumerate() {
            if (offset + 1) % columns == 0 {
                let _ = write!(out, "\n  {:2.3}", x);
            } else {
                let _ = write!(out, " {:2.3}", x);
            }
        }
        out.push_str(" ]");
        out
    }
}

impl From<Vec<f64>> for Tensor {
    fn from(data: Vec<f64>) -> Self {
        Tensor { data }
    }
}

impl FromIterator<f64> for Tensor {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Tensor {
            data: iter.into_iter().collect(),
        }
    }
}
