//! tcalc - RPN calculator for scalars and flat tensors
//!
//! Reads whitespace-separated tokens line by line. Numbers, `$$symbols`,
//! `$variables`, `@N` stack references and `"strings"` push values; anything
//! else runs a command.
//!
//! Usage:
//!   tcalc                       # Start with an empty stack
//!   tcalc --load state.txt      # Replay a dumped session first
//!   tcalc --quiet --columns 8   # No auto display, wider tensor rows
//!
//! Type `help` at the prompt for the command list.

mod config;
mod session;

use clap::Parser as ClapParser;
use config::Config;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use session::{Flow, Session};
use std::io::{self, Write};
use std::path::PathBuf;
use tcalc_core::Interpreter;
use tcalc_runtime::builtin_provider;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "tcalc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "RPN calculator for scalars and flat tensors", long_about = None)]
struct Args {
    /// Configuration file (default: ~/.config/tcalc/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// State file to replay before the first prompt
    #[arg(long)]
    load: Option<PathBuf>,

    /// Start with the built-in commands unloaded
    #[arg(long)]
    no_engine: bool,

    /// Tensor elements per displayed row
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    columns: Option<u16>,

    /// Don't print the top of the stack after each command
    #[arg(short, long)]
    quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let provider = if args.no_engine {
        None
    } else {
        Some(Box::new(builtin_provider()) as Box<dyn tcalc_core::CommandProvider>)
    };
    let mut interp = Interpreter::new(provider);
    let display = &mut interp.env_mut().display;
    *display = config.display_settings();
    if let Some(columns) = args.columns {
        display.columns = usize::from(columns);
    }
    if args.quiet {
        display.auto_display = false;
    }

    let mut session = Session::new(interp);
    if let Some(path) = args.load.as_ref().or(config.repl.startup_file.as_ref()) {
        match session.load_from_path(path) {
            Ok(path) => println!("Loaded file \"{}\".", path.display()),
            Err(e) => eprintln!("{}", e),
        }
    }

    if let Err(e) = repl_loop(&mut session, &config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tcalc={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `--config` must load; the default location is optional and only warned about
fn load_config(args: &Args) -> Result<Config, String> {
    if let Some(path) = &args.config {
        return Config::load(path);
    }
    match Config::default_path() {
        Some(path) if path.exists() => Config::load(&path).or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring config file");
            Ok(Config::default())
        }),
        _ => Ok(Config::default()),
    }
}

fn history_file() -> Option<PathBuf> {
    home::home_dir().map(|d| d.join(".local/share/tcalc_history"))
}

fn repl_loop(session: &mut Session, config: &Config) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;

    let history = if config.repl.history {
        history_file()
    } else {
        None
    };
    if let Some(ref path) = history {
        let _ = rl.load_history(path);
    }

    let mut stdout = io::stdout();
    loop {
        match rl.readline(&config.repl.prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let mut ask = |prompt: &str| rl.readline(prompt).ok();
                let flow = session.run_line(&line, &mut stdout, &mut ask)?;
                stdout.flush()?;
                if flow == Flow::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    if let Some(ref path) = history {
        let _ = rl.save_history(path);
    }
    info!("session ended");
    Ok(())
}
