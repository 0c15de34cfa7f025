//! Variable commands
//!
//! Variables live in the environment's map and are only ever replaced by a
//! later `store` under the same name.

use tcalc_core::{Environment, Outcome, Result};
use tracing::debug;

/// Bind a value to a symbol's name, replacing any previous binding
///
/// Stack effect: ( value symbol -- )
pub fn store(env: &mut Environment) -> Result<Outcome> {
    env.stack.peek_symbol(0)?;
    env.stack.require(2)?;

    let name = env.stack.pop_symbol()?;
    let value = env.stack.pop()?;
    debug!(%name, kind = %value.kind(), "store");
    env.store(name, value);
    Ok(Outcome::Display)
}

/// Push an independent copy of a stored variable
///
/// Stack effect: ( symbol -- value )
pub fn load(env: &mut Environment) -> Result<Outcome> {
    let value = env.load(env.stack.peek_symbol(0)?)?;
    env.stack.discard(1)?;
    env.stack.push(value);
    Ok(Outcome::Display)
}
