use clap::Parser;
use std::path::{Path, PathBuf};

pub mod dispatch;
pub mod modules;

pub use dispatch::{Dispatcher, Module, THEN};
pub use modules::{CompileJavaFiles, MergeJarFiles};

/// Environment variable naming the Java compiler executable.
pub const JAVAC_ENV: &str = "JVMCH_JAVAC";

#[derive(Parser, Debug)]
#[command(name = "jvmch", author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose debug logging.
    #[arg(short, long)]
    pub verbose: bool,

    /// Java compiler executable. If not provided, JVMCH_JAVAC, then
    /// $JAVA_HOME/bin/javac, then `javac` from PATH.
    #[arg(long, value_name = "PATH")]
    pub javac: Option<PathBuf>,

    /// `<command> [command-arguments] ['--then' <command> [command-arguments]]*`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

fn javac_file_name() -> &'static str {
    if cfg!(windows) {
        "javac.exe"
    } else {
        "javac"
    }
}

/// Picks the compiler executable.
///
/// Priority:
/// 1. `--javac` command-line argument.
/// 2. `JVMCH_JAVAC` environment variable.
/// 3. `$JAVA_HOME/bin/javac`, if that file exists.
/// 4. `javac`, looked up on `PATH` when launched.
pub fn resolve_javac(javac_opt: Option<PathBuf>) -> PathBuf {
    if let Some(javac) = javac_opt {
        return javac;
    }
    if let Some(javac) = std::env::var_os(JAVAC_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(javac);
    }
    if let Some(home) = std::env::var_os("JAVA_HOME") {
        let candidate = Path::new(&home).join("bin").join(javac_file_name());
        if candidate.is_file() {
            return candidate;
        }
    }
    PathBuf::from(javac_file_name())
}

/// Parses command-line arguments using `clap`.
pub fn run() -> Args {
    Args::parse()
}
