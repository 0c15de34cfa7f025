//! Text serialization of Values
//!
//! The output is itself calculator input: feeding it back through the
//! tokenizer rebuilds an equal value. Scalars carry sixteen decimals.
//!
//! # Format
//!
//! - Scalar: `2.5000000000000000`
//! - Tensor: `1.0000000000000000 2.0000000000000000 2 matrix`
//! - Symbol: `$$name`
//! - String: `"text"`
//!
//! Non-finite numbers have no literal form, so they are written as the
//! division that produces them: `1 0 /`, `-1 0 /`, `0 0 /`.

use crate::environment::Environment;
use crate::value::Value;
use std::io::Write;

fn push_number(d: f64, buf: &mut String) {
    if d.is_nan() {
        buf.push_str("0 0 /");
    } else if d == f64::INFINITY {
        buf.push_str("1 0 /");
    } else if d == f64::NEG_INFINITY {
        buf.push_str("-1 0 /");
    } else {
        buf.push_str(&format!("{:.16}", d));
    }
}

/// Serialize one value into replayable input text
pub fn serialize_value(value: &Value) -> String {
    let mut buf = String::new();
    match value {
        Value::Scalar(d) => push_number(*d, &mut buf),
        Value::Tensor(t) => {
            for &x in t.as_slice() {
                push_number(x, &mut buf);
                buf.push(' ');
            }
            buf.push_str(&format!("{} matrix", t.len()));
        }
        Value::Symbol(s) => {
            buf.push_str("$$");
            buf.push_str(s);
        }
        Value::String(s) => {
            buf.push('"');
            buf.push_str(s);
            buf.push('"');
        }
    }
    buf
}

/// Write the whole environment as replayable text
///
/// Variables come first, each followed by its `store` directive, then the
/// stack from bottom to top so replay pushes it back in the same order.
pub fn write_state(env: &Environment, out: &mut impl Write) -> std::io::Result<()> {
    for (name, value) in env.variables() {
        writeln!(out, "{}", serialize_value(value))?;
        writeln!(out, "$${} store", name)?;
    }
    for value in env.stack.iter() {
        writeln!(out, "{}", serialize_value(value))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::Tensor;

    #[test]
    fn test_scalar() {
        assert_eq!(serialize_value(&Value::from(2.5)), "2.5000000000000000");
        assert_eq!(serialize_value(&Value::from(-1.0)), "-1.0000000000000000");
    }

    #[test]
    fn test_tensor() {
        let v = Value::from(Tensor::from(vec![1.0, 2.0]));
        assert_eq!(
            serialize_value(&v),
            "1.0000000000000000 2.0000000000000000 2 matrix"
        );
        assert_eq!(serialize_value(&Value::from(Tensor::new())), "0 matrix");
    }

    #[test]
    fn test_text_variants() {
        assert_eq!(serialize_value(&Value::symbol("x")), "$$x");
        assert_eq!(serialize_value(&Value::string("hi")), "\"hi\"");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(serialize_value(&Value::from(f64::INFINITY)), "1 0 /");
        assert_eq!(serialize_value(&Value::from(f64::NEG_INFINITY)), "-1 0 /");
        assert_eq!(serialize_value(&Value::from(f64::NAN)), "0 0 /");
    }

    #[test]
    fn test_write_state_order() {
        let mut env = Environment::new();
        env.store("y", Value::from(2.0));
        env.store("x", Value::symbol("q"));
        env.stack.push(1.0);
        env.stack.push(Value::string("top"));

        let mut out = Vec::new();
        write_state(&env, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "$$q\n$$x store\n2.0000000000000000\n$$y store\n1.0000000000000000\n\"top\"\n"
        );
    }
}
