//! Error kinds for the evaluation core
//!
//! Every failure a token can cause is classified here. None of them is fatal:
//! the REPL reports the message and keeps the environment for the next token.

use crate::value::ValueKind;
use std::fmt;

/// Error raised while handling a token or running a command
#[derive(Debug)]
pub enum CalcError {
    /// A pop or peek was attempted with too few values on the stack
    StackUnderflow,
    /// The value on the stack has the wrong variant
    TypeError {
        expected: ValueKind,
        actual: ValueKind,
    },
    /// Buffer lengths are inconsistent with the extents an operation was given
    ShapeMismatch(String),
    /// `$name` or `load` referenced a variable that was never stored
    UndefinedVariable { name: String },
    /// `@N` referenced past the bottom of the stack
    IndexOutOfRange { index: usize, size: usize },
    /// A numeric literal or reference token is malformed
    ParseError(String),
    /// A token starts with `"` but does not end with one
    UnterminatedString(String),
    /// The token matched no lexical class and no command
    UnrecognizedCommand { token: String },
    /// Command provider lifecycle misuse (loading twice, unloading nothing)
    Engine(String),
    /// Reading or writing persisted state failed
    Io(std::io::Error),
    /// A token failed while replaying persisted state
    Replay { line: usize, source: Box<CalcError> },
}

impl CalcError {
    /// Shorthand for a shape error tagged with the operation name
    pub fn shape(op: &str, detail: impl fmt::Display) -> Self {
        CalcError::ShapeMismatch(format!("{}: {}", op, detail))
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::StackUnderflow => write!(f, "stack underflow"),
            CalcError::TypeError { expected, actual } => {
                write!(f, "type error: expected {}, found {}", expected, actual)
            }
            CalcError::ShapeMismatch(msg) => write!(f, "shape mismatch: {}", msg),
            CalcError::UndefinedVariable { name } => write!(f, "undefined variable: {}", name),
            CalcError::IndexOutOfRange { index, size } => {
                write!(f, "stack index {} out of range (stack has {})", index, size)
            }
            CalcError::ParseError(msg) => write!(f, "parse error: {}", msg),
            CalcError::UnterminatedString(token) => {
                write!(f, "unterminated string literal: {}", token)
            }
            CalcError::UnrecognizedCommand { token } => write!(
                f,
                "Input not recognized: {}. Use 'help' for command list.",
                token
            ),
            CalcError::Engine(msg) => write!(f, "{}", msg),
            CalcError::Io(e) => write!(f, "I/O error: {}", e),
            CalcError::Replay { line, source } => write!(f, "line {}: {}", line, source),
        }
    }
}

impl std::error::Error for CalcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CalcError::Io(e) => Some(e),
            CalcError::Replay { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CalcError {
    fn from(e: std::io::Error) -> Self {
        CalcError::Io(e)
    }
}

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, CalcError>;
