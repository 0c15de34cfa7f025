//! Token dispatcher
//!
//! Owns the session's `Environment` and, optionally, one command provider.
//! Each token is classified (see [`crate::token`]) and either pushes a value
//! or runs the matching command. A failed token aborts only itself; the
//! environment carries on for the next one.

use crate::command::{CommandProvider, Outcome};
use crate::environment::Environment;
use crate::error::{CalcError, Result};
use crate::token::{Token, classify};
use crate::value::Value;
use std::io::BufRead;
use tracing::{debug, info};

/// Counters reported by [`Interpreter::replay`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub lines: usize,
    pub tokens: usize,
    /// An `exit` token was reached and the rest of the input was skipped
    pub exited: bool,
}

pub struct Interpreter {
    env: Environment,
    provider: Option<Box<dyn CommandProvider>>,
}

impl Interpreter {
    pub fn new(provider: Option<Box<dyn CommandProvider>>) -> Self {
        Interpreter {
            env: Environment::new(),
            provider,
        }
    }

    pub fn with_provider(provider: impl CommandProvider + 'static) -> Self {
        Self::new(Some(Box::new(provider)))
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn provider(&self) -> Option<&dyn CommandProvider> {
        self.provider.as_deref()
    }

    pub fn load_provider(&mut self, provider: Box<dyn CommandProvider>) -> Result<()> {
        if self.provider.is_some() {
            return Err(CalcError::Engine("Engine is already loaded.".to_string()));
        }
        info!(provider = provider.name(), "command provider loaded");
        self.provider = Some(provider);
        Ok(())
    }

    pub fn unload_provider(&mut self) -> Result<Box<dyn CommandProvider>> {
        let provider = self
            .provider
            .take()
            .ok_or_else(|| CalcError::Engine("Engine is not loaded.".to_string()))?;
        info!(provider = provider.name(), "command provider unloaded");
        Ok(provider)
    }

    /// Classify and execute one token
    pub fn handle_token(&mut self, token: &str) -> Result<Outcome> {
        match classify(token)? {
            Token::Number(d) => self.env.stack.push(d),
            Token::Symbol(name) => self.env.stack.push(Value::symbol(name)),
            Token::Variable(name) => {
                let value = self.env.load(name)?;
                self.env.stack.push(value);
            }
            Token::StackRef(index) => {
                let value = self.env.stack.at_from_top(index)?.clone();
                self.env.stack.push(value);
            }
            Token::Str(text) => {
                self.env.stack.push(Value::string(text));
                return Ok(Outcome::Quiet);
            }
            Token::Command(name) => return self.run_command(name),
        }
        Ok(Outcome::Display)
    }

    fn run_command(&mut self, name: &str) -> Result<Outcome> {
        let entry = self
            .provider
            .as_deref()
            .and_then(|p| p.find(name))
            .copied()
            .ok_or_else(|| CalcError::UnrecognizedCommand {
                token: name.to_string(),
            })?;
        debug!(command = entry.name, depth = self.env.stack.size(), "dispatch");
        (entry.function)(&mut self.env)
    }

    /// Run every whitespace-delimited token of one line
    ///
    /// Each outcome, `Exit` included, is passed to `report` together with the
    /// environment as it stands after that token. Stops at the first failing
    /// token, leaving the rest of the line unexecuted. Returns `true` once an
    /// `exit` token has been reached.
    pub fn handle_line(
        &mut self,
        line: &str,
        mut report: impl FnMut(&Environment, Outcome),
    ) -> Result<bool> {
        for token in line.split_whitespace() {
            let outcome = self.handle_token(token)?;
            let exit = outcome == Outcome::Exit;
            report(&self.env, outcome);
            if exit {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Feed every line of `input` through `handle_line` without display
    ///
    /// Stops at the first failing token, reporting its 1-based line.
    pub fn replay(&mut self, input: impl BufRead) -> Result<ReplayStats> {
        let mut stats = ReplayStats::default();
        for (number, line) in input.lines().enumerate() {
            let line = line?;
            stats.lines += 1;
            let exited = self
                .handle_line(&line, |_, outcome| {
                    stats.tokens += 1;
                    if let Outcome::Print(text) = outcome {
                        debug!(%text, "suppressed output during replay");
                    }
                })
                .map_err(|e| CalcError::Replay {
                    line: number + 1,
                    source: Box::new(e),
                })?;
            if exited {
                stats.exited = true;
                return Ok(stats);
            }
        }
        info!(lines = stats.lines, tokens = stats.tokens, "replay finished");
        Ok(stats)
    }
}
