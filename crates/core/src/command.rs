//! Command table shape and the provider abstraction
//!
//! A provider is anything that can hand the interpreter an ordered list of
//! `(name, signature, function)` entries. How it was obtained (linked in,
//! configured, generated) is not the interpreter's concern.

use crate::environment::Environment;
use crate::error::Result;

/// What a command asks the boundary to do once it has run
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Show the top of the stack if auto display is on
    Display,
    /// Nothing to show
    Quiet,
    /// Text for the console
    Print(String),
    /// Normal termination request
    Exit,
}

/// Signature every command implements
pub type CommandFn = fn(&mut Environment) -> Result<Outcome>;

/// One immutable row of a command table
#[derive(Clone, Copy)]
pub struct CommandEntry {
    /// Exact, case-sensitive token that invokes the command
    pub name: &'static str,

    /// Human-readable stack effect, e.g. `m+ :: m d -> m`
    pub signature: &'static str,

    pub function: CommandFn,
}

impl CommandEntry {
    pub const fn new(name: &'static str, signature: &'static str, function: CommandFn) -> Self {
        CommandEntry {
            name,
            signature,
            function,
        }
    }
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Source of the dispatch table
pub trait CommandProvider {
    /// Label used in logs
    fn name(&self) -> &str;

    fn commands(&self) -> &[CommandEntry];

    /// First entry whose name matches exactly
    fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.commands().iter().find(|c| c.name == name)
    }
}

/// Provider over a fixed, statically built table
#[derive(Debug, Clone, Copy)]
pub struct CommandTable {
    name: &'static str,
    entries: &'static [CommandEntry],
}

impl CommandTable {
    pub const fn new(name: &'static str, entries: &'static [CommandEntry]) -> Self {
        CommandTable { name, entries }
    }
}

impl CommandProvider for CommandTable {
    fn name(&self) -> &str {
        self.name
    }

    fn commands(&self) -> &[CommandEntry] {
        self.entries
    }
}
