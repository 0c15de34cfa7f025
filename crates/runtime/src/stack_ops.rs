//! Stack and session commands
//!
//! These don't compute anything; they drop, list or print values, or ask the
//! boundary to end the session.

use tcalc_core::{Environment, Outcome, Result, serialize_value};

/// Stack effect: ( x -- )
pub fn pop(env: &mut Environment) -> Result<Outcome> {
    env.stack.pop()?;
    Ok(Outcome::Display)
}

/// Print every element, top labelled 0
pub fn stack(env: &mut Environment) -> Result<Outcome> {
    Ok(Outcome::Print(env.stack.render(env.display.columns)))
}

/// Print the replayable text form of the top value
///
/// Stack effect: ( x -- x )
pub fn serialize(env: &mut Environment) -> Result<Outcome> {
    let text = serialize_value(env.stack.at_from_top(0)?);
    Ok(Outcome::Print(text))
}

pub fn exit(_env: &mut Environment) -> Result<Outcome> {
    Ok(Outcome::Exit)
}
