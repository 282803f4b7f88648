use std::path::{Path, PathBuf};

use thiserror::Error;

/// The primary error type for all operations in the `jvmch` crate.
///
/// Every variant carries the path that was being worked on so the logged
/// diagnostic is enough to find the offending file.
#[derive(Debug, Error)]
pub enum JvmchError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error on path '{}': {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// The archive container could not be read or written.
    #[error("archive error on '{}': {source}", path.display())]
    Zip {
        #[source]
        source: zip::result::ZipError,
        path: PathBuf,
    },

    /// Directory traversal failed while collecting compiled artifacts.
    #[error("could not walk directory '{}': {source}", path.display())]
    Walk {
        #[source]
        source: walkdir::Error,
        path: PathBuf,
    },

    /// A walked path did not live under the directory being packaged.
    #[error("could not strip prefix '{}' from path '{}'", prefix.display(), path.display())]
    StripPrefix { prefix: PathBuf, path: PathBuf },

    /// The platform compiler process could not be started.
    #[error("failed to launch compiler '{}': {source}", program.display())]
    CompilerLaunch {
        #[source]
        source: std::io::Error,
        program: PathBuf,
    },
}

impl JvmchError {
    /// Builds a `map_err` adapter that tags an I/O error with `path`.
    pub fn io(path: &Path) -> impl FnOnce(std::io::Error) -> JvmchError + '_ {
        move |source| JvmchError::Io {
            source,
            path: path.to_path_buf(),
        }
    }

    /// Builds a `map_err` adapter that tags an archive error with `path`.
    pub fn zip(path: &Path) -> impl FnOnce(zip::result::ZipError) -> JvmchError + '_ {
        move |source| JvmchError::Zip {
            source,
            path: path.to_path_buf(),
        }
    }
}

/// Logs `err` with its full source chain at error level.
pub fn log_error(context: &str, err: &JvmchError) {
    let mut chain = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    tracing::error!(error = ?err, causes = ?chain, "{context}: {err}");
}
