//! rlua: Lua lexer driver.
//!
//! Usage:
//!   rlua [repl]
//!   rlua tokenize [--format json] [--strict] <FILE>...

mod echo;
mod error;
mod repl;

use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use log::{debug, info};
use rayon::prelude::*;
use rlua_core::LineMap;
use rlua_diagnostics::{format_message, messages, Diagnostic, DiagnosticCollection};
use rlua_options::{load_options, EchoFormat, ReplOptions};
use rlua_scanner::{Scanner, Token};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use crate::echo::write_token;
use crate::error::CliError;

#[derive(ClapParser, Debug)]
#[command(name = "rlua", about = "rlua - A Lua lexer written in Rust", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to a JSON options file.
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Token echo format.
    #[arg(long, value_enum, global = true)]
    format: Option<FormatArg>,

    /// Print scanner diagnostics in the REPL.
    #[arg(long, global = true)]
    diagnostics: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the interactive lexer loop (default).
    Repl {
        /// Prompt printed before each line.
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Scan files and print their tokens.
    Tokenize {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Exit with status 2 if any error diagnostic is reported.
        #[arg(long)]
        strict: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Debug,
    Json,
}

impl From<FormatArg> for EchoFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Debug => EchoFormat::Debug,
            FormatArg::Json => EchoFormat::Json,
        }
    }
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = match resolve_options(&cli) {
        Ok(options) => options,
        Err(e) => {
            print_error(&e.to_string());
            process::exit(1);
        }
    };

    let code = match cli.command {
        None => run_repl(&options),
        Some(Command::Repl { .. }) => run_repl(&options),
        Some(Command::Tokenize { ref files, strict }) => run_tokenize(files, strict, options.echo_format),
    };
    process::exit(code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Defaults, then the options file, then command-line flags.
fn resolve_options(cli: &Cli) -> Result<ReplOptions, CliError> {
    let mut options = match cli.config {
        Some(ref path) => {
            debug!("loading options from {}", path.display());
            load_options(path)?
        }
        None => ReplOptions::default(),
    };
    if let Some(format) = cli.format {
        options.echo_format = format.into();
    }
    if cli.diagnostics {
        options.show_diagnostics = true;
    }
    if let Some(Command::Repl { prompt: Some(ref prompt) }) = cli.command {
        options.prompt = prompt.clone();
    }
    Ok(options)
}

fn run_repl(options: &ReplOptions) -> i32 {
    let user = std::env::var("USER").ok();
    print!("{}", repl::greeting(user.as_deref()));

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    match repl::start(stdin.lock(), &mut stdout, options) {
        Ok(()) => 0,
        Err(e) => {
            print_error(&e.to_string());
            1
        }
    }
}

/// A scanned input file.
struct FileScan {
    path: String,
    line_map: LineMap,
    tokens: Vec<Token>,
    diagnostics: DiagnosticCollection,
}

fn scan_file(path: &Path) -> Result<FileScan, CliError> {
    let display = path.display().to_string();
    let bytes = std::fs::read(path).map_err(|source| CliError::Read {
        path: display.clone(),
        source,
    })?;
    let source = String::from_utf8_lossy(&bytes);

    let mut scanner = Scanner::new(&source);
    let tokens = scanner.tokenize();
    let mut diagnostics = scanner.take_diagnostics();
    diagnostics.set_file(&display);

    let count = tokens.len().to_string();
    info!(
        "{}",
        format_message(messages::SCANNED_0_TOKENS_IN_1.message, &[count.as_str(), display.as_str()])
    );

    Ok(FileScan {
        path: display,
        line_map: LineMap::new(&source),
        tokens,
        diagnostics,
    })
}

fn run_tokenize(files: &[PathBuf], strict: bool, format: EchoFormat) -> i32 {
    let results: Vec<Result<FileScan, CliError>> = files.par_iter().map(|path| scan_file(path)).collect();

    let use_color = atty_is_terminal();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let mut io_failed = false;
    let mut error_count = 0;

    for result in results {
        let scan = match result {
            Ok(scan) => scan,
            Err(e) => {
                print_error(&e.to_string());
                io_failed = true;
                continue;
            }
        };
        if files.len() > 1 && format == EchoFormat::Debug {
            if let Err(e) = writeln!(out, "==> {} <==", scan.path) {
                print_error(&e.to_string());
                return 1;
            }
        }
        for token in &scan.tokens {
            if let Err(e) = write_token(&mut out, token, format) {
                print_error(&e.to_string());
                return 1;
            }
        }
        for diagnostic in scan.diagnostics.diagnostics() {
            print_diagnostic(diagnostic, &scan.line_map, use_color);
        }
        error_count += scan.diagnostics.error_count();
    }
    if let Err(e) = out.flush() {
        print_error(&e.to_string());
        return 1;
    }

    if io_failed {
        1
    } else if strict && error_count > 0 {
        2
    } else {
        0
    }
}

fn print_diagnostic(diag: &Diagnostic, line_map: &LineMap, use_color: bool) {
    if !use_color {
        eprintln!("{}", diag.render(line_map));
        return;
    }
    if let Some(ref file) = diag.file {
        eprint!("{}{}{}", CYAN, file, RESET);
        if let Some(span) = diag.span {
            eprint!(":{}", line_map.line_and_column_of(span.start));
        }
        eprint!(": ");
    }
    let color = if diag.is_error() { RED } else { YELLOW };
    eprintln!(
        "{}{}{}{} {}LUA{}{}: {}",
        BOLD, color, diag.category, RESET, CYAN, diag.code, RESET, diag.message_text
    );
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true
    }
}
