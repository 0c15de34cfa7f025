//! Console session
//!
//! Wraps an `Interpreter` with the commands that only make sense at a
//! console: writing and replaying state files, `pwd`, and swapping the
//! command provider in and out. Output goes to any `Write` and filename
//! prompts go through a caller-supplied closure, so the whole thing runs
//! without a terminal.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tcalc_core::{Interpreter, Outcome, Result, write_state};
use tcalc_runtime::builtin_provider;
use tracing::{debug, info};

const FILENAME_PROMPT: &str = "Filename>";

const HOST_HELP: &str = "\
Console commands:
  dump          write variables and stack to a file
  load-file     replay a file written by dump
  pwd           print the working directory
  load-engine   enable the built-in commands
  unload-engine disable the built-in commands";

/// Commands handled here rather than by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    Dump,
    LoadFile,
    Pwd,
    LoadEngine,
    UnloadEngine,
}

impl HostCommand {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "dump" => Some(HostCommand::Dump),
            "load-file" => Some(HostCommand::LoadFile),
            "pwd" => Some(HostCommand::Pwd),
            "load-engine" => Some(HostCommand::LoadEngine),
            "unload-engine" => Some(HostCommand::UnloadEngine),
            _ => None,
        }
    }
}

/// What the read loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

pub struct Session {
    interp: Interpreter,
}

impl Session {
    pub fn new(interp: Interpreter) -> Self {
        Session { interp }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interp
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interp
    }

    /// Run one line of input
    ///
    /// A failing token prints its message and the rest of the line is
    /// dropped. Only failures writing to `out` are returned.
    pub fn run_line(
        &mut self,
        line: &str,
        out: &mut impl Write,
        ask: &mut impl FnMut(&str) -> Option<String>,
    ) -> io::Result<Flow> {
        for token in line.split_whitespace() {
            match self.run_token(token, out, ask) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(Flow::Exit),
                Err(e) => {
                    debug!(%token, error = %e, "token failed, discarding rest of line");
                    writeln!(out, "{}", e)?;
                    break;
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn run_token(
        &mut self,
        token: &str,
        out: &mut impl Write,
        ask: &mut impl FnMut(&str) -> Option<String>,
    ) -> Result<Flow> {
        if let Some(command) = HostCommand::parse(token) {
            return self.run_host(command, out, ask);
        }
        if token == "help" && self.interp.provider().is_none() {
            writeln!(out, "{}", HOST_HELP)?;
            return Ok(Flow::Continue);
        }

        match self.interp.handle_token(token)? {
            Outcome::Display => {
                let env = self.interp.env();
                if env.display.auto_display {
                    if let Ok(top) = env.stack.at_from_top(0) {
                        writeln!(out, "{}", top.render(env.display.columns))?;
                    }
                }
            }
            Outcome::Quiet => {}
            Outcome::Print(text) => {
                writeln!(out, "{}", text)?;
                if token == "help" {
                    writeln!(out, "{}", HOST_HELP)?;
                }
            }
            Outcome::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn run_host(
        &mut self,
        command: HostCommand,
        out: &mut impl Write,
        ask: &mut impl FnMut(&str) -> Option<String>,
    ) -> Result<Flow> {
        match command {
            HostCommand::Dump => {
                if let Some(name) = ask_filename(out, ask)? {
                    let path = self.dump_to_path(Path::new(&name))?;
                    writeln!(out, "Wrote state to \"{}\".", path.display())?;
                }
            }
            HostCommand::LoadFile => {
                if let Some(name) = ask_filename(out, ask)? {
                    let path = self.load_from_path(Path::new(&name))?;
                    writeln!(out, "Loaded file \"{}\".", path.display())?;
                }
            }
            HostCommand::Pwd => {
                writeln!(out, "{}", std::env::current_dir()?.display())?;
            }
            HostCommand::LoadEngine => {
                self.interp.load_provider(Box::new(builtin_provider()))?;
            }
            HostCommand::UnloadEngine => {
                self.interp.unload_provider()?;
            }
        }
        Ok(Flow::Continue)
    }

    /// Write variables then stack to `path`, returning the absolute path
    pub fn dump_to_path(&self, path: &Path) -> Result<PathBuf> {
        let path = std::path::absolute(path)?;
        let mut file = BufWriter::new(File::create(&path)?);
        write_state(self.interp.env(), &mut file)?;
        file.flush()?;
        info!(path = %path.display(), "state written");
        Ok(path)
    }

    /// Replay a state file without displaying anything
    ///
    /// Values pushed before a failing token stay on the stack.
    pub fn load_from_path(&mut self, path: &Path) -> Result<PathBuf> {
        let path = std::path::absolute(path)?;
        let file = File::open(&path)?;
        let stats = self.interp.replay(BufReader::new(file))?;
        info!(
            path = %path.display(),
            lines = stats.lines,
            tokens = stats.tokens,
            "state file loaded"
        );
        Ok(path)
    }
}

/// Prompt for a filename; `None` if input ended or the answer was blank
fn ask_filename(
    out: &mut impl Write,
    ask: &mut impl FnMut(&str) -> Option<String>,
) -> io::Result<Option<String>> {
    out.flush()?;
    Ok(ask(FILENAME_PROMPT)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
