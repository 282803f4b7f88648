//! Wiring between the parsed command line, logging, and the dispatcher.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::cli::{self, CompileJavaFiles, Dispatcher, MergeJarFiles};

/// Installs the stderr log subscriber. `RUST_LOG` overrides the level.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
    if let Err(e) = installed {
        eprintln!("warning: could not install logger: {e}");
    }
}

/// Dispatcher with every module this crate provides.
pub fn build_dispatcher(javac: PathBuf) -> Dispatcher {
    Dispatcher::new()
        .register(CompileJavaFiles::with_javac(javac))
        .register(MergeJarFiles)
}

/// Maps a module exit code onto a process exit code. Codes outside
/// `1..=255` become 1 so a failure never reads as success.
pub fn to_exit_code(code: i32) -> ExitCode {
    if code == 0 {
        return ExitCode::SUCCESS;
    }
    ExitCode::from(u8::try_from(code).ok().filter(|&c| c != 0).unwrap_or(1))
}

/// Public entry for running the CLI.
pub fn run_cli_app() -> ExitCode {
    let args = cli::run();
    init_logging(args.verbose);
    let javac = cli::resolve_javac(args.javac);
    tracing::debug!(javac = %javac.display(), "resolved compiler");
    let mut dispatcher = build_dispatcher(javac);
    to_exit_code(dispatcher.dispatch(&args.command))
}
