//! # jvmch Core Library
//!
//! Helpers for building JVM projects without a build tool:
//!
//! - [`archive`]: merging JAR files and packaging class files into a JAR.
//! - [`compile`]: staging Java sources under the names `javac` requires,
//!   running the compiler, and collecting its output.
//! - [`cli`]: the module dispatcher behind the `jvmch` binary.
//!
//! ## Examples
//!
//! ```no_run
//! use jvmch::archive::{merge_archives, MergeOptions};
//! use std::path::{Path, PathBuf};
//!
//! let inputs = [PathBuf::from("a.jar"), PathBuf::from("b.jar")];
//! let summary = merge_archives(Path::new("all.jar"), &inputs, &MergeOptions::default())?;
//! println!("{} entries", summary.entries);
//! # Ok::<(), jvmch::JvmchError>(())
//! ```

pub mod archive;
pub mod cli;
pub mod compile;
pub mod error;
pub use error::JvmchError;

pub mod cli_runner;

// Filesystem helpers
pub mod fsx;
