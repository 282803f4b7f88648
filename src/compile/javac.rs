//! The platform Java compiler seam.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::JvmchError;

/// Something that compiles Java sources into class files.
///
/// Implementations report the compiler's own result code; diagnostics go
/// wherever the compiler sends them.
pub trait JavaCompiler {
    /// Compiles `sources` writing class files under `out_dir`.
    /// Both are canonical absolute paths.
    fn compile(&self, out_dir: &Path, sources: &[PathBuf]) -> Result<i32, JvmchError>;
}

/// Runs an external `javac` with inherited standard streams.
#[derive(Debug, Clone)]
pub struct SystemJavac {
    program: PathBuf,
}

impl SystemJavac {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

/// Builds `-d <out_dir> <sources...>`.
pub fn javac_args(out_dir: &Path, sources: &[PathBuf]) -> Vec<OsString> {
    let mut args = Vec::with_capacity(sources.len() + 2);
    args.push(OsString::from("-d"));
    args.push(out_dir.as_os_str().to_owned());
    args.extend(sources.iter().map(|s| s.as_os_str().to_owned()));
    args
}

impl JavaCompiler for SystemJavac {
    fn compile(&self, out_dir: &Path, sources: &[PathBuf]) -> Result<i32, JvmchError> {
        let args = javac_args(out_dir, sources);
        debug!(program = %self.program.display(), ?args, "invoking compiler");
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| JvmchError::CompilerLaunch {
                source,
                program: self.program.clone(),
            })?;
        Ok(status_code(status))
    }
}

/// Converts a process status into a numeric result code. A process killed by
/// a signal reports `128 + signal` like a POSIX shell.
pub fn status_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
