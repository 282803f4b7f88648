//! # JAR Archives
//!
//! Reading and writing of the ZIP-based JAR container. Two operations live here:
//!
//! - [`merge_archives`] concatenates the entries of several JARs into one.
//! - [`write_jar`] packages files from a directory under given entry names.
//!
//! Entry bodies are always streamed through a fixed buffer; no entry is held
//! in memory as a whole.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::fsx::copy_stream;
use crate::JvmchError;

/// Buffer size used when copying entry bodies between archives.
pub const MERGE_BUFFER_SIZE: usize = 8 * 1024;

/// Buffer size used when copying files from disk into an archive.
pub const PACKAGE_BUFFER_SIZE: usize = 64 * 1024;

/// Entry name of the JAR manifest.
pub const MANIFEST_NAME: &str = "META-INF/MANIFEST.MF";

/// Options controlling [`merge_archives`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Skip `META-INF/MANIFEST.MF` entries instead of copying them.
    pub drop_manifest: bool,
}

/// What a merge did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of input archives read.
    pub archives: usize,
    /// Number of entries written to the output.
    pub entries: usize,
    /// Number of entries skipped because of [`MergeOptions::drop_manifest`].
    pub skipped: usize,
}

/// Returns true if `name` is the JAR manifest entry.
pub fn is_manifest(name: &str) -> bool {
    name.eq_ignore_ascii_case(MANIFEST_NAME)
}

/// Merges `inputs` into a freshly created archive at `output`.
///
/// Entries are written in input order, then stored order within each input.
/// Duplicate names are passed through unchanged. The first failure aborts the
/// whole merge; whatever was written to `output` so far is left in place.
pub fn merge_archives(
    output: &Path,
    inputs: &[PathBuf],
    options: &MergeOptions,
) -> Result<MergeSummary, JvmchError> {
    let out_file = File::create(output).map_err(JvmchError::io(output))?;
    let mut writer = ZipWriter::new(BufWriter::new(out_file));
    let mut summary = MergeSummary::default();

    for input in inputs {
        let copied = append_archive(&mut writer, input, options)?;
        summary.archives += 1;
        summary.entries += copied.entries;
        summary.skipped += copied.skipped;
    }

    let mut inner = writer.finish().map_err(JvmchError::zip(output))?;
    inner.flush().map_err(JvmchError::io(output))?;

    info!(
        output = %output.display(),
        archives = summary.archives,
        entries = summary.entries,
        "merged archives"
    );
    Ok(summary)
}

/// Copies every entry of the archive at `input` into `writer`.
fn append_archive<W: Write + Seek>(
    writer: &mut ZipWriter<W>,
    input: &Path,
    options: &MergeOptions,
) -> Result<MergeSummary, JvmchError> {
    let file = File::open(input).map_err(JvmchError::io(input))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(JvmchError::zip(input))?;
    let mut summary = MergeSummary::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(JvmchError::zip(input))?;
        let name = entry.name().to_string();

        if options.drop_manifest && is_manifest(&name) {
            debug!(archive = %input.display(), entry = %name, "skipping manifest");
            summary.skipped += 1;
            continue;
        }

        let mut entry_options = FileOptions::default()
            .compression_method(writable_method(entry.compression()))
            .last_modified_time(entry.last_modified())
            .large_file(entry.size() >= u64::from(u32::MAX));
        if let Some(mode) = entry.unix_mode() {
            entry_options = entry_options.unix_permissions(mode & 0o7777);
        }

        if entry.is_dir() {
            writer
                .add_directory(name.as_str(), entry_options)
                .map_err(JvmchError::zip(input))?;
        } else {
            writer
                .start_file(name.as_str(), entry_options)
                .map_err(JvmchError::zip(input))?;
            copy_stream(&mut entry, writer, MERGE_BUFFER_SIZE).map_err(JvmchError::io(input))?;
        }
        debug!(archive = %input.display(), entry = %name, "copied entry");
        summary.entries += 1;
    }

    Ok(summary)
}

/// Maps the method an entry was read with to one the writer can produce.
fn writable_method(method: CompressionMethod) -> CompressionMethod {
    match method {
        CompressionMethod::Stored => CompressionMethod::Stored,
        CompressionMethod::Bzip2 => CompressionMethod::Bzip2,
        CompressionMethod::Zstd => CompressionMethod::Zstd,
        _ => CompressionMethod::Deflated,
    }
}

/// Writes a new archive at `output` holding `base.join(name)` for each name in
/// `entries`, in the given order, under that name.
pub fn write_jar(output: &Path, base: &Path, entries: &[String]) -> Result<(), JvmchError> {
    let out_file = File::create(output).map_err(JvmchError::io(output))?;
    let mut writer = ZipWriter::new(BufWriter::new(out_file));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for name in entries {
        let path = base.join(name);
        let mut source = File::open(&path).map_err(JvmchError::io(&path))?;
        writer
            .start_file(name.as_str(), options)
            .map_err(JvmchError::zip(output))?;
        copy_stream(&mut source, &mut writer, PACKAGE_BUFFER_SIZE)
            .map_err(JvmchError::io(&path))?;
        debug!(entry = %name, "packaged");
    }

    let mut inner = writer.finish().map_err(JvmchError::zip(output))?;
    inner.flush().map_err(JvmchError::io(output))?;
    info!(output = %output.display(), entries = entries.len(), "wrote jar");
    Ok(())
}

/// Reads the entry names of the archive at `path` in stored order.
pub fn entry_names(path: &Path) -> Result<Vec<String>, JvmchError> {
    let file = File::open(path).map_err(JvmchError::io(path))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(JvmchError::zip(path))?;
    let mut names = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index(i).map_err(JvmchError::zip(path))?;
        names.push(entry.name().to_string());
    }
    Ok(names)
}
