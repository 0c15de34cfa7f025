//! tcalc core: the evaluation machine of an RPN tensor calculator
//!
//! Key design principles:
//! - Value: closed sum of Scalar, Tensor, Symbol and String
//! - Tensor: flat `f64` buffer whose shape is supplied per operation
//! - Stack: typed pops that never consume a value of the wrong variant
//! - Environment: the stack plus named variables, passed `&mut` to commands
//!
//! # Modules
//!
//! - `algebra`: element-wise ops, transposes, matrix multiply, contractions
//! - `command`: command table rows and the `CommandProvider` trait
//! - `environment`: interpreter state
//! - `error`: error kinds surfaced at the REPL boundary
//! - `interpreter`: token dispatch and state replay
//! - `serialize`: replayable text form of values and whole sessions
//! - `stack`: operand stack
//! - `tensor`: the flat buffer type and its display
//! - `token`: lexical classes of input tokens
//! - `value`: the Value enum

pub mod algebra;
pub mod command;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod serialize;
pub mod stack;
pub mod tensor;
pub mod token;
pub mod value;

pub use command::{CommandEntry, CommandFn, CommandProvider, CommandTable, Outcome};
pub use environment::{DisplaySettings, Environment};
pub use error::{CalcError, Result};
pub use interpreter::{Interpreter, ReplayStats};
pub use serialize::{serialize_value, write_state};
pub use stack::Stack;
pub use tensor::{DEFAULT_COLUMNS, MAX_TENSOR_LEN, Tensor};
pub use value::{Value, ValueKind};
