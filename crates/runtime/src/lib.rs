//! tcalc runtime: the built-in command table
//!
//! Every command is a plain `fn(&mut Environment) -> Result<Outcome>`. The
//! table below is the order `help` lists them in and the order lookups scan.
//!
//! # Modules
//!
//! - `arithmetic`: scalar `+ - * /`
//! - `stack_ops`: `pop`, `stack`, `serialize`, `exit`
//! - `tensor_ops`: construction, broadcasting, transposes, contractions
//! - `variables`: `store` and `load`

pub mod arithmetic;
pub mod stack_ops;
pub mod tensor_ops;
pub mod variables;

use tcalc_core::{CommandEntry, CommandTable, Environment, Outcome, Result};

/// Name the built-in provider reports in logs
pub const BUILTIN_PROVIDER: &str = "builtin";

pub static BUILTINS: &[CommandEntry] = &[
    CommandEntry::new("help", "help", help),
    CommandEntry::new("exit", "exit", stack_ops::exit),
    CommandEntry::new("stack", "stack :: ->", stack_ops::stack),
    CommandEntry::new("pop", "pop :: * ->", stack_ops::pop),
    CommandEntry::new("serialize", "serialize :: * -> *", stack_ops::serialize),
    CommandEntry::new(
        "inner",
        "inner :: m1 m2 dExtent dStride1 dStride2 -> m",
        tensor_ops::inner,
    ),
    CommandEntry::new("load", "load :: y -> *", variables::load),
    CommandEntry::new("store", "store :: * y ->", variables::store),
    CommandEntry::new("matrix", "matrix :: d... dLen -> m", tensor_ops::matrix),
    CommandEntry::new("ones", "ones :: dLen -> m", tensor_ops::ones),
    CommandEntry::new("size", "size :: m -> m d", tensor_ops::size),
    CommandEntry::new("m+", "m+ :: m d -> m", tensor_ops::add_scalar),
    CommandEntry::new("m*", "m* :: m d -> m", tensor_ops::multiply_scalar),
    CommandEntry::new("m**", "m** :: m d -> m", tensor_ops::power_scalar),
    CommandEntry::new("m+m", "m+m :: m m -> m", tensor_ops::add_tensors),
    CommandEntry::new("+", "+ :: d d -> d", arithmetic::add),
    CommandEntry::new("-", "- :: d d -> d", arithmetic::subtract),
    CommandEntry::new("*", "* :: d d -> d", arithmetic::multiply),
    CommandEntry::new("/", "/ :: d d -> d", arithmetic::divide),
    CommandEntry::new(
        "transpose",
        "transpose :: m dExtent -> m",
        tensor_ops::transpose,
    ),
    CommandEntry::new(
        "transpose2",
        "transpose2 :: m dExtent1 dExtent2 -> m",
        tensor_ops::transpose2,
    ),
    CommandEntry::new("mmul", "mmul :: m m dExtent -> m", tensor_ops::multiply_matrix),
    CommandEntry::new("dot", "dot :: m m -> m", tensor_ops::dot),
    CommandEntry::new("m*m", "m*m :: m m -> m", tensor_ops::multiply_tensors),
    CommandEntry::new("m/m", "m/m :: m m -> m", tensor_ops::divide_tensors),
    CommandEntry::new("bayes", "bayes :: m m m -> m", tensor_ops::bayes),
];

const SPECIAL_OPERATIONS: &str = "\
Special operations:
  <N>      push the number N
  @<N>     push a copy of the value N positions below the top
  $<name>  push a copy of variable <name>
  $$<name> push the symbol <name>";

/// The table as a provider for `Interpreter`
pub fn builtin_provider() -> CommandTable {
    CommandTable::new(BUILTIN_PROVIDER, BUILTINS)
}

/// Command listing printed by `help`
pub fn help_text() -> String {
    let mut out = String::from("Commands:");
    for entry in BUILTINS {
        out.push_str("\n  ");
        out.push_str(entry.signature);
    }
    out.push('\n');
    out.push_str(SPECIAL_OPERATIONS);
    out
}

/// Stack effect: ( -- )
pub fn help(_env: &mut Environment) -> Result<Outcome> {
    Ok(Outcome::Print(help_text()))
}
