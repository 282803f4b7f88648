//! # Java Compilation Driver
//!
//! Compiles a set of Java sources into a JAR in four steps:
//!
//! 1. infer each source's qualified name ([`identity`]);
//! 2. copy it into the scratch directory under the path `javac` expects;
//! 3. run the compiler once over every staged file ([`javac`]);
//! 4. collect the `.class` files from the scratch tree into the output JAR.
//!
//! The scratch directory is created if missing and never removed.

pub mod identity;
pub mod javac;
pub mod random;

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::archive::write_jar;
use crate::error::log_error;
use crate::fsx::{copy_stream, create_parent_dirs, relative_slash_path};
use crate::JvmchError;

pub use identity::{scan_source, staged_relative_path, TypeScan};
pub use javac::{JavaCompiler, SystemJavac};
pub use random::{FallbackNamer, JavaRandom, FALLBACK_SEED};

/// Exit code reported when staging, launching or packaging hits an I/O error.
pub const IO_FAILURE_EXIT_CODE: i32 = 100;

/// Buffer size for copying sources into the scratch directory.
pub const COPY_BUFFER_SIZE: usize = 0x10000;

/// File name suffix of compiled artifacts.
pub const CLASS_EXTENSION: &str = ".class";

/// A source file copied into the scratch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSource {
    pub original: PathBuf,
    pub identity: String,
    pub staged: PathBuf,
}

/// How a compile run ended when no I/O error got in the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileOutcome {
    /// Compilation succeeded and the JAR holds `entries` class files.
    Packaged { entries: usize },
    /// The compiler reported this non-zero code; nothing was packaged.
    CompilerFailed(i32),
}

impl CompileOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            CompileOutcome::Packaged { .. } => 0,
            CompileOutcome::CompilerFailed(code) => *code,
        }
    }
}

/// Infers the identity of the source at `path`.
pub fn source_identity<R: RngCore>(
    path: &Path,
    namer: &mut FallbackNamer<R>,
) -> Result<String, JvmchError> {
    let bytes = fs::read(path).map_err(JvmchError::io(path))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(scan_source(&text).into_identity(namer))
}

/// Copies every file of `sources` into `scratch` under its inferred path.
///
/// `scratch` should already be canonical; staged paths are built under it.
pub fn stage_sources<R: RngCore>(
    scratch: &Path,
    sources: &[PathBuf],
    namer: &mut FallbackNamer<R>,
) -> Result<Vec<StagedSource>, JvmchError> {
    let mut staged: Vec<StagedSource> = Vec::with_capacity(sources.len());
    let mut by_target: HashMap<PathBuf, usize> = HashMap::new();

    for source in sources {
        let identity = source_identity(source, namer)?;
        let target = scratch.join(staged_relative_path(&identity));
        if let Some(&earlier) = by_target.get(&target) {
            warn!(
                source = %source.display(),
                earlier = %staged[earlier].original.display(),
                %identity,
                "two sources map to the same file; the earlier one is overwritten"
            );
        }
        copy_file(source, &target)?;
        debug!(source = %source.display(), %identity, staged = %target.display(), "staged source");
        by_target.insert(target.clone(), staged.len());
        staged.push(StagedSource {
            original: source.clone(),
            identity,
            staged: target,
        });
    }
    Ok(staged)
}

fn copy_file(from: &Path, to: &Path) -> Result<(), JvmchError> {
    create_parent_dirs(to)?;
    let input = File::open(from).map_err(JvmchError::io(from))?;
    let output = File::create(to).map_err(JvmchError::io(to))?;
    let mut reader = BufReader::with_capacity(COPY_BUFFER_SIZE, input);
    let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, output);
    copy_stream(&mut reader, &mut writer, COPY_BUFFER_SIZE).map_err(JvmchError::io(from))?;
    writer.flush().map_err(JvmchError::io(to))
}

/// Lists every file under `dir` whose name ends with `extension`, as paths
/// relative to `dir` joined with `/`, in depth-first walk order.
pub fn find_artifacts(dir: &Path, extension: &str) -> Result<Vec<String>, JvmchError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(|source| JvmchError::Walk {
            source,
            path: dir.to_path_buf(),
        })?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(extension) {
            found.push(relative_slash_path(dir, entry.path())?);
        }
    }
    Ok(found)
}

/// Runs the whole pipeline. Compiler failures are an outcome, not an error.
pub fn compile_sources<C, R>(
    scratch: &Path,
    output: &Path,
    sources: &[PathBuf],
    compiler: &C,
    namer: &mut FallbackNamer<R>,
) -> Result<CompileOutcome, JvmchError>
where
    C: JavaCompiler + ?Sized,
    R: RngCore,
{
    fs::create_dir_all(scratch).map_err(JvmchError::io(scratch))?;
    let root = scratch.canonicalize().map_err(JvmchError::io(scratch))?;

    let staged = stage_sources(&root, sources, namer)?;
    let staged_paths = staged
        .iter()
        .map(|s| s.staged.canonicalize().map_err(JvmchError::io(&s.staged)))
        .collect::<Result<Vec<_>, _>>()?;

    let code = compiler.compile(&root, &staged_paths)?;
    if code != 0 {
        warn!(code, "compiler reported failure; skipping packaging");
        return Ok(CompileOutcome::CompilerFailed(code));
    }

    let classes = find_artifacts(&root, CLASS_EXTENSION)?;
    write_jar(output, &root, &classes)?;
    info!(
        sources = sources.len(),
        classes = classes.len(),
        output = %output.display(),
        "compiled sources"
    );
    Ok(CompileOutcome::Packaged {
        entries: classes.len(),
    })
}

/// [`compile_sources`] mapped to a process exit code: 0, the compiler's own
/// code, or [`IO_FAILURE_EXIT_CODE`] after logging the error.
pub fn compile_to_exit_code<C, R>(
    scratch: &Path,
    output: &Path,
    sources: &[PathBuf],
    compiler: &C,
    namer: &mut FallbackNamer<R>,
) -> i32
where
    C: JavaCompiler + ?Sized,
    R: RngCore,
{
    match compile_sources(scratch, output, sources, compiler, namer) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            log_error("compilation aborted", &e);
            IO_FAILURE_EXIT_CODE
        }
    }
}
