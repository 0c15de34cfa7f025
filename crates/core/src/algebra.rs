//! Tensor algebra over flat buffers
//!
//! Pure functions: inputs are borrowed, results are freshly allocated. Shapes
//! are supplied per call as extents or strides and are checked against the
//! buffer length first, so no routine can index past `len()`.
//!
//! Layout convention is row-major with the fastest-varying axis first: a
//! `[a, b]` tensor stores element `(i, j)` at `i + j * a`.

use crate::error::{CalcError, Result};
use crate::tensor::{MAX_TENSOR_LEN, Tensor};

/// Require `len` to split evenly into blocks of `block`
fn check_divisible(op: &str, len: usize, block: usize) -> Result<usize> {
    if block == 0 {
        if len == 0 {
            return Ok(0);
        }
        return Err(CalcError::shape(op, format!("zero extent for {} elements", len)));
    }
    if len % block != 0 {
        return Err(CalcError::shape(
            op,
            format!("{} elements is not a multiple of {}", len, block),
        ));
    }
    Ok(len / block)
}

fn checked_product(op: &str, a: usize, b: usize) -> Result<usize> {
    a.checked_mul(b)
        .ok_or_else(|| CalcError::shape(op, format!("{} x {} is too large", a, b)))
}

/// Length of a result built from `a * b` elements, capped at `MAX_TENSOR_LEN`
fn output_len(op: &str, a: usize, b: usize) -> Result<usize> {
    let len = checked_product(op, a, b)?;
    if len > MAX_TENSOR_LEN {
        return Err(CalcError::shape(
            op,
            format!("{} elements exceeds the limit of {}", len, MAX_TENSOR_LEN),
        ));
    }
    Ok(len)
}

fn check_extent(op: &str, extent: usize) -> Result<()> {
    if extent == 0 {
        return Err(CalcError::shape(op, "extent must be positive"));
    }
    Ok(())
}

/// Combine `m` with `v` repeated cyclically along it
///
/// `result[i] = f(m[i], v[i % v.len()])`. `m.len()` must be a multiple of
/// `v.len()`; an empty `v` is only accepted against an empty `m`.
pub fn by_element(m: &Tensor, v: &Tensor, f: impl Fn(f64, f64) -> f64) -> Result<Tensor> {
    check_divisible("by_element", m.len(), v.len())?;
    let v = v.as_slice();
    Ok(m
        .as_slice()
        .iter()
        .enumerate()
        .map(|(i, &x)| f(x, v[i % v.len()]))
        .collect())
}

pub fn multiply(m: &Tensor, v: &Tensor) -> Result<Tensor> {
    by_element(m, v, |a, b| a * b)
}

pub fn divide(m: &Tensor, v: &Tensor) -> Result<Tensor> {
    by_element(m, v, |a, b| a / b)
}

/// Transpose a `[extent, len / extent]` matrix into `[len / extent, extent]`
pub fn transpose(v: &Tensor, extent: usize) -> Result<Tensor> {
    check_extent("transpose", extent)?;
    let rows = check_divisible("transpose", v.len(), extent)?;
    if v.is_empty() {
        return Ok(Tensor::new());
    }
    let src = v.as_slice();
    let mut out = vec![0.0; src.len()];
    for i in 0..extent {
        for j in 0..rows {
            out[j + i * rows] = src[i + j * extent];
        }
    }
    Ok(Tensor::from(out))
}

/// Swap the first two axes of a `[e1, e2, len / (e1 * e2)]` tensor
///
/// The trailing axis is a batch: each `e1 * e2` plane is transposed on its own.
pub fn transpose2(v: &Tensor, e1: usize, e2: usize) -> Result<Tensor> {
    check_extent("transpose2", e1)?;
    check_extent("transpose2", e2)?;
    let plane = checked_product("transpose2", e1, e2)?;
    let batches = check_divisible("transpose2", v.len(), plane)?;
    if v.is_empty() {
        return Ok(Tensor::new());
    }
    let src = v.as_slice();
    let mut out = vec![0.0; src.len()];
    for k in 0..batches {
        for j in 0..e2 {
            for i in 0..e1 {
                out[j + i * e2 + k * plane] = src[i + j * e1 + k * plane];
            }
        }
    }
    Ok(Tensor::from(out))
}

/// Naive matrix product of `[rows, extent]` by `[extent, cols]`
///
/// Accumulation runs over the contracted axis innermost, in index order.
pub fn multiply_matrix(left: &Tensor, right: &Tensor, extent: usize) -> Result<Tensor> {
    check_extent("multiply_matrix", extent)?;
    let rows = check_divisible("multiply_matrix", left.len(), extent)?;
    let cols = check_divisible("multiply_matrix", right.len(), extent)?;
    let (l, r) = (left.as_slice(), right.as_slice());
    let mut out = vec![0.0; output_len("multiply_matrix", rows, cols)?];
    for i in 0..rows {
        for j in 0..cols {
            for k in 0..extent {
                out[j + i * cols] += l[k + i * extent] * r[j + k * cols];
            }
        }
    }
    Ok(Tensor::from(out))
}

/// Dot each consecutive `v2.len()` block of `v1` with `v2`
pub fn dot(v1: &Tensor, v2: &Tensor) -> Result<Tensor> {
    if v2.is_empty() {
        return Err(CalcError::shape("dot", "inner vector is empty"));
    }
    check_divisible("dot", v1.len(), v2.len())?;
    let inner = v2.as_slice();
    Ok(v1
        .as_slice()
        .chunks_exact(inner.len())
        .map(|block| block.iter().zip(inner).map(|(a, b)| a * b).sum())
        .collect())
}

/// Generalized strided contraction
///
/// `m1` is read as `[stride1, inner_extent, d1]` and `m2` as
/// `[stride2, inner_extent, d2]`. The shared middle axis is summed away and
/// the result is laid out as `[stride1, stride2, d2, d1]`:
///
/// ```text
/// out[i1 + stride1 * (i2 + stride2 * (k2 + d2 * k1))]
///     = sum_j m1[i1 + j*stride1 + k1*stride1*inner_extent]
///           * m2[i2 + j*stride2 + k2*stride2*inner_extent]
/// ```
///
/// With both strides 1 and `inner_extent` equal to both lengths this is a
/// plain dot product in a one-element tensor.
pub fn inner_product(
    m1: &Tensor,
    m2: &Tensor,
    inner_extent: usize,
    stride1: usize,
    stride2: usize,
) -> Result<Tensor> {
    check_extent("inner", inner_extent)?;
    check_extent("inner", stride1)?;
    check_extent("inner", stride2)?;
    let block1 = checked_product("inner", stride1, inner_extent)?;
    let block2 = checked_product("inner", stride2, inner_extent)?;
    let d1 = check_divisible("inner", m1.len(), block1)?;
    let d2 = check_divisible("inner", m2.len(), block2)?;

    let len = output_len("inner", m1.len() / inner_extent, m2.len() / inner_extent)?;
    if len == 0 {
        return Ok(Tensor::new());
    }
    let (a, b) = (m1.as_slice(), m2.as_slice());
    let mut out = vec![0.0; len];

    for i1 in 0..stride1 {
        for i2 in 0..stride2 {
            for k2 in 0..d2 {
                for k1 in 0..d1 {
                    let mut acc = 0.0;
                    for j in 0..inner_extent {
                        acc += a[i1 + j * stride1 + k1 * block1] * b[i2 + j * stride2 + k2 * block2];
                    }
                    out[i1 + stride1 * (i2 + stride2 * (k2 + d2 * k1))] = acc;
                }
            }
        }
    }
    Ok(Tensor::from(out))
}

/// `divide(transpose(multiply(src, mult), mult.len()), div)`
pub fn bayes_rule(src: &Tensor, mult: &Tensor, div: &Tensor) -> Result<Tensor> {
    let joint = multiply(src, mult)?;
    let flipped = transpose(&joint, mult.len())?;
    divide(&flipped, div)
}
