//! Tensor commands
//!
//! Every command validates all of its operands with `peek_*` before the
//! first pop, so a type or shape failure leaves the stack exactly as it was.
//! Extents and strides arrive as scalars and are truncated toward zero.

use tcalc_core::algebra;
use tcalc_core::{CalcError, Environment, MAX_TENSOR_LEN, Outcome, Result, Tensor};

/// Convert a scalar operand into a non-negative integer extent
pub fn extent_of(op: &str, d: f64) -> Result<usize> {
    let t = d.trunc();
    if !t.is_finite() || t < 0.0 {
        return Err(CalcError::shape(op, format!("invalid extent {}", d)));
    }
    Ok(t as usize)
}

fn length_of(op: &str, d: f64) -> Result<usize> {
    let len = extent_of(op, d)?;
    if len > MAX_TENSOR_LEN {
        return Err(CalcError::shape(
            op,
            format!("{} elements exceeds the limit of {}", len, MAX_TENSOR_LEN),
        ));
    }
    Ok(len)
}

/// Replace the top `consumed` values with `result`
fn commit(env: &mut Environment, consumed: usize, result: Tensor) -> Result<Outcome> {
    env.stack.discard(consumed)?;
    env.stack.push(result);
    Ok(Outcome::Display)
}

// =============================================================================
// Construction
// =============================================================================

/// Gather `n` scalars into a tensor, first pushed becoming element 0
///
/// Stack effect: ( d0 d1 ... dn-1 n -- m )
pub fn matrix(env: &mut Environment) -> Result<Outcome> {
    let len = length_of("matrix", env.stack.peek_double(0)?)?;
    env.stack.require(len + 1)?;
    for index in 1..=len {
        env.stack.peek_double(index)?;
    }

    env.stack.discard(1)?;
    let mut data = vec![0.0; len];
    for slot in data.iter_mut().rev() {
        *slot = env.stack.pop_double()?;
    }
    env.stack.push(Tensor::from(data));
    Ok(Outcome::Display)
}

/// Stack effect: ( n -- m ) with every element 1.0
pub fn ones(env: &mut Environment) -> Result<Outcome> {
    let len = length_of("ones", env.stack.peek_double(0)?)?;
    commit(env, 1, Tensor::filled(len, 1.0))
}

/// Stack effect: ( m -- m n )
pub fn size(env: &mut Environment) -> Result<Outcome> {
    let len = env.stack.peek_matrix(0)?.len();
    env.stack.push(len as f64);
    Ok(Outcome::Display)
}

// =============================================================================
// Scalar-by-tensor, in place
// =============================================================================

fn scalar_in_place(env: &mut Environment, op: impl Fn(f64, f64) -> f64) -> Result<Outcome> {
    env.stack.peek_double(0)?;
    env.stack.peek_matrix(1)?;

    let d = env.stack.pop_double()?;
    let mut m = env.stack.pop_matrix()?;
    m.map_in_place(|x| op(x, d));
    env.stack.push(m);
    Ok(Outcome::Display)
}

/// Stack effect: ( m d -- m+d )
pub fn add_scalar(env: &mut Environment) -> Result<Outcome> {
    scalar_in_place(env, |x, d| x + d)
}

/// Stack effect: ( m d -- m*d )
pub fn multiply_scalar(env: &mut Environment) -> Result<Outcome> {
    scalar_in_place(env, |x, d| x * d)
}

/// Stack effect: ( m d -- m**d )
pub fn power_scalar(env: &mut Environment) -> Result<Outcome> {
    scalar_in_place(env, f64::powf)
}

// =============================================================================
// Tensor-by-tensor
// =============================================================================

/// Element-wise sum of two equal-length tensors
///
/// Stack effect: ( m m -- m )
pub fn add_tensors(env: &mut Environment) -> Result<Outcome> {
    let top = env.stack.peek_matrix(0)?.len();
    let below = env.stack.peek_matrix(1)?.len();
    if top != below {
        return Err(CalcError::shape(
            "m+m",
            format!("matrices do not have equal extents ({} and {})", below, top),
        ));
    }

    let mut m1 = env.stack.pop_matrix()?;
    let m2 = env.stack.pop_matrix()?;
    for (x, y) in m1.as_mut_slice().iter_mut().zip(m2.as_slice()) {
        *x += y;
    }
    env.stack.push(m1);
    Ok(Outcome::Display)
}

/// Cyclic broadcast multiply, `v` on top
///
/// Stack effect: ( m v -- m )
pub fn multiply_tensors(env: &mut Environment) -> Result<Outcome> {
    let result = algebra::multiply(env.stack.peek_matrix(1)?, env.stack.peek_matrix(0)?)?;
    commit(env, 2, result)
}

/// Cyclic broadcast divide, `v` on top
///
/// Stack effect: ( m v -- m )
pub fn divide_tensors(env: &mut Environment) -> Result<Outcome> {
    let result = algebra::divide(env.stack.peek_matrix(1)?, env.stack.peek_matrix(0)?)?;
    commit(env, 2, result)
}

/// Stack effect: ( m dExtent -- m )
pub fn transpose(env: &mut Environment) -> Result<Outcome> {
    let extent = extent_of("transpose", env.stack.peek_double(0)?)?;
    let result = algebra::transpose(env.stack.peek_matrix(1)?, extent)?;
    commit(env, 2, result)
}

/// Stack effect: ( m dExtent1 dExtent2 -- m )
pub fn transpose2(env: &mut Environment) -> Result<Outcome> {
    let e2 = extent_of("transpose2", env.stack.peek_double(0)?)?;
    let e1 = extent_of("transpose2", env.stack.peek_double(1)?)?;
    let result = algebra::transpose2(env.stack.peek_matrix(2)?, e1, e2)?;
    commit(env, 3, result)
}

/// Stack effect: ( left right dExtent -- m )
pub fn multiply_matrix(env: &mut Environment) -> Result<Outcome> {
    let extent = extent_of("mmul", env.stack.peek_double(0)?)?;
    let right = env.stack.peek_matrix(1)?;
    let left = env.stack.peek_matrix(2)?;
    let result = algebra::multiply_matrix(left, right, extent)?;
    commit(env, 3, result)
}

/// Stack effect: ( v1 v2 -- m )
pub fn dot(env: &mut Environment) -> Result<Outcome> {
    let result = algebra::dot(env.stack.peek_matrix(1)?, env.stack.peek_matrix(0)?)?;
    commit(env, 2, result)
}

/// Strided contraction
///
/// Stack effect: ( m1 m2 dExtent dStride1 dStride2 -- m )
pub fn inner(env: &mut Environment) -> Result<Outcome> {
    let stride2 = extent_of("inner", env.stack.peek_double(0)?)?;
    let stride1 = extent_of("inner", env.stack.peek_double(1)?)?;
    let extent = extent_of("inner", env.stack.peek_double(2)?)?;
    let m2 = env.stack.peek_matrix(3)?;
    let m1 = env.stack.peek_matrix(4)?;
    let result = algebra::inner_product(m1, m2, extent, stride1, stride2)?;
    commit(env, 5, result)
}

/// Stack effect: ( src mult div -- m )
pub fn bayes(env: &mut Environment) -> Result<Outcome> {
    let div = env.stack.peek_matrix(0)?;
    let mult = env.stack.peek_matrix(1)?;
    let src = env.stack.peek_matrix(2)?;
    let result = algebra::bayes_rule(src, mult, div)?;
    commit(env, 3, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tcalc_core::Value;

    fn is_tensor(value: &Value, expected: &[f64]) -> bool {
        matches!(value, Value::Tensor(t) if t.as_slice() == expected)
    }

    fn push_all(env: &mut Environment, values: Vec<Value>) {
        for v in values {
            env.stack.push(v);
        }
    }

    fn tensor(data: &[f64]) -> Value {
        Value::from(Tensor::from(data.to_vec()))
    }

    fn top(env: &Environment) -> &Value {
        env.stack.at_from_top(0).unwrap()
    }

    #[test]
    fn test_extent_of() {
        assert_eq!(extent_of("t", 3.9).unwrap(), 3);
        assert_eq!(extent_of("t", -0.5).unwrap(), 0);
        assert!(extent_of("t", -1.0).is_err());
        assert!(extent_of("t", f64::NAN).is_err());
        assert!(extent_of("t", f64::INFINITY).is_err());
    }

    #[test]
    fn test_matrix_reverse_fill() {
        let mut env = Environment::new();
        push_all(&mut env, vec![2.0.into(), 3.0.into()]);
        // extent 3 needs three scalars below it; only one is there
        assert!(matches!(matrix(&mut env), Err(CalcError::StackUnderflow)));
        assert_eq!(env.stack.size(), 2);

        let mut env = Environment::new();
        push_all(&mut env, vec![7.0.into(), 8.0.into(), 9.0.into(), 3.0.into()]);
        matrix(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[7.0, 8.0, 9.0]));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_matrix_keeps_push_order() {
        let mut env = Environment::new();
        push_all(&mut env, vec![2.0.into(), 3.0.into(), 2.0.into()]);
        matrix(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[2.0, 3.0]));
    }

    #[test]
    fn test_matrix_type_error_leaves_stack() {
        let mut env = Environment::new();
        push_all(&mut env, vec![Value::symbol("x"), 1.0.into(), 2.0.into()]);
        assert!(matches!(matrix(&mut env), Err(CalcError::TypeError { .. })));
        assert_eq!(env.stack.size(), 3);
    }

    #[test]
    fn test_matrix_zero() {
        let mut env = Environment::new();
        env.stack.push(0.0);
        matrix(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[]));
    }

    #[test]
    fn test_ones_and_size() {
        let mut env = Environment::new();
        env.stack.push(3.0);
        ones(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[1.0, 1.0, 1.0]));
        size(&mut env).unwrap();
        assert_eq!(env.stack.size(), 2);
        assert_eq!(top(&env), &Value::Scalar(3.0));
        assert!(is_tensor(env.stack.at_from_top(1).unwrap(), &[1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_ones_rejects_huge() {
        let mut env = Environment::new();
        env.stack.push(1e18);
        assert!(matches!(ones(&mut env), Err(CalcError::ShapeMismatch(_))));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_scalar_in_place_ops() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0]), 3.0.into()]);
        add_scalar(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[4.0, 5.0]));

        env.stack.push(2.0);
        multiply_scalar(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[8.0, 10.0]));

        env.stack.push(2.0);
        power_scalar(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[64.0, 100.0]));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_scalar_in_place_wrong_order() {
        let mut env = Environment::new();
        push_all(&mut env, vec![3.0.into(), tensor(&[1.0])]);
        assert!(matches!(add_scalar(&mut env), Err(CalcError::TypeError { .. })));
        assert_eq!(env.stack.size(), 2);
    }

    #[test]
    fn test_add_tensors() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0]), tensor(&[10.0, 20.0])]);
        add_tensors(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[11.0, 22.0]));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_add_tensors_mismatch_leaves_stack() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0]), tensor(&[1.0])]);
        assert!(matches!(
            add_tensors(&mut env),
            Err(CalcError::ShapeMismatch(_))
        ));
        assert_eq!(env.stack.size(), 2);
    }

    #[test]
    fn test_broadcast_ops() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0, 3.0, 4.0]), tensor(&[2.0, 4.0])]);
        multiply_tensors(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[2.0, 8.0, 6.0, 16.0]));

        env.stack.push(tensor(&[2.0]));
        divide_tensors(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[1.0, 4.0, 3.0, 8.0]));
    }

    #[test]
    fn test_transposes() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), 2.0.into()]);
        transpose(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[1.0, 3.0, 5.0, 2.0, 4.0, 6.0]));

        push_all(&mut env, vec![3.0.into(), 2.0.into()]);
        transpose2(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_transpose_bad_extent_leaves_stack() {
        let mut env = Environment::new();
        push_all(&mut env, vec![tensor(&[1.0, 2.0, 3.0]), 2.0.into()]);
        assert!(transpose(&mut env).is_err());
        assert_eq!(env.stack.size(), 2);
    }

    #[test]
    fn test_mmul_and_dot() {
        let mut env = Environment::new();
        push_all(
            &mut env,
            vec![tensor(&[1.0, 2.0, 3.0, 4.0]), tensor(&[5.0, 6.0, 7.0, 8.0]), 2.0.into()],
        );
        multiply_matrix(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[19.0, 22.0, 43.0, 50.0]));

        env.stack.push(tensor(&[1.0, 0.0]));
        dot(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[19.0, 43.0]));
    }

    #[test]
    fn test_inner() {
        let mut env = Environment::new();
        push_all(
            &mut env,
            vec![
                tensor(&[1.0, 2.0, 3.0]),
                tensor(&[4.0, 5.0, 6.0]),
                3.0.into(),
                1.0.into(),
                1.0.into(),
            ],
        );
        inner(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[32.0]));
        assert_eq!(env.stack.size(), 1);
    }

    #[test]
    fn test_inner_type_error_consumes_nothing() {
        let mut env = Environment::new();
        push_all(
            &mut env,
            vec![
                3.0.into(),
                tensor(&[4.0, 5.0, 6.0]),
                3.0.into(),
                1.0.into(),
                1.0.into(),
            ],
        );
        assert!(matches!(inner(&mut env), Err(CalcError::TypeError { .. })));
        assert_eq!(env.stack.size(), 5);
    }

    #[test]
    fn test_bayes() {
        let mut env = Environment::new();
        push_all(
            &mut env,
            vec![
                tensor(&[1.0, 1.0, 1.0, 1.0]),
                tensor(&[2.0, 4.0]),
                tensor(&[2.0, 2.0]),
            ],
        );
        bayes(&mut env).unwrap();
        assert!(is_tensor(top(&env), &[1.0, 1.0, 2.0, 2.0]));
    }
}
