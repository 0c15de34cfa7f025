//! Value: what the calculator talks about
//!
//! A closed sum type. The active variant alone decides which accessor
//! succeeds; asking for the wrong one is a `TypeError`, never a silent read.

use crate::error::{CalcError, Result};
use crate::tensor::{DEFAULT_COLUMNS, Tensor};
use std::fmt;

/// A single stack entry or stored variable
///
/// `clone()` is a deep copy for every variant: tensors copy their buffer and
/// text variants copy their bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// IEEE 754 double
    Scalar(f64),

    /// Flat element buffer; shape is supplied by whichever command reads it
    Tensor(Tensor),

    /// Unevaluated variable name (`$$name`)
    Symbol(String),

    /// Quoted literal (`"text"`)
    String(String),
}

/// Variant tag, used in type errors and typed pops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Tensor,
    Symbol,
    String,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Scalar => "scalar",
            ValueKind::Tensor => "matrix",
            ValueKind::Symbol => "symbol",
            ValueKind::String => "string",
        };
        f.write_str(name)
    }
}

impl Value {
    pub fn symbol(name: impl Into<String>) -> Self {
        Value::Symbol(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Tensor(_) => ValueKind::Tensor,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::String(_) => ValueKind::String,
        }
    }

    fn mismatch(&self, expected: ValueKind) -> CalcError {
        CalcError::TypeError {
            expected,
            actual: self.kind(),
        }
    }

    pub fn as_scalar(&self) -> Result<f64> {
        match self {
            Value::Scalar(d) => Ok(*d),
            other => Err(other.mismatch(ValueKind::Scalar)),
        }
    }

    pub fn as_tensor(&self) -> Result<&Tensor> {
        match self {
            Value::Tensor(t) => Ok(t),
            other => Err(other.mismatch(ValueKind::Tensor)),
        }
    }

    pub fn as_symbol(&self) -> Result<&str> {
        match self {
            Value::Symbol(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::Symbol)),
        }
    }

    pub fn as_string(&self) -> Result<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    /// Consume into the owned tensor, handing the value back on mismatch
    pub fn into_tensor(self) -> std::result::Result<Tensor, Value> {
        match self {
            Value::Tensor(t) => Ok(t),
            other => Err(other),
        }
    }

    /// Console form: `= 7.000000`, `= [ ... ]`, `= $name`, `= "text"`
    pub fn render(&self, columns: usize) -> String {
        match self {
            Value::Scalar(d) => format!("= {:.6}", d),
            Value::Tensor(t) => format!("= {}", t.render(columns)),
            Value::Symbol(s) => format!("= ${}", s),
            Value::String(s) => format!("= \"{}\"", s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_COLUMNS))
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Scalar(d)
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Value::Tensor(t)
    }
}
