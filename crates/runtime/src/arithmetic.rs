//! Scalar arithmetic
//!
//! Binary operators pop `a` (top) and then `b`. Commutative ops don't care;
//! `-` and `/` compute `b - a` and `b / a`, so `5 2 -` is 3.
//!
//! # Division
//!
//! IEEE 754 semantics throughout: `1 0 /` is `inf` and `0 0 /` is NaN. These
//! are valid values, not errors.

use tcalc_core::{Environment, Outcome, Result};

/// Take `(a, b)` off the stack, leaving it untouched unless both are scalars
fn pop_two(env: &mut Environment) -> Result<(f64, f64)> {
    let a = env.stack.peek_double(0)?;
    let b = env.stack.peek_double(1)?;
    env.stack.discard(2)?;
    Ok((a, b))
}

fn binary(env: &mut Environment, op: impl Fn(f64, f64) -> f64) -> Result<Outcome> {
    let (a, b) = pop_two(env)?;
    env.stack.push(op(a, b));
    Ok(Outcome::Display)
}

/// Stack effect: ( b a -- b+a )
pub fn add(env: &mut Environment) -> Result<Outcome> {
    binary(env, |a, b| a + b)
}

/// Stack effect: ( b a -- b-a )
pub fn subtract(env: &mut Environment) -> Result<Outcome> {
    binary(env, |a, b| b - a)
}

/// Stack effect: ( b a -- b*a )
pub fn multiply(env: &mut Environment) -> Result<Outcome> {
    binary(env, |a, b| a * b)
}

/// Stack effect: ( b a -- b/a )
pub fn divide(env: &mut Environment) -> Result<Outcome> {
    binary(env, |a, b| b / a)
}
