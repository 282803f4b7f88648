//! Small filesystem helpers shared by the merger and the compiler driver.
//!
//! Copies are always streamed through a caller-sized buffer; nothing here
//! reads a whole file into memory.

use std::io::{self, Read, Write};
use std::path::{Component, Path};

use crate::JvmchError;

/// Copies `reader` into `writer` through a buffer of `buf_size` bytes.
/// Returns the number of bytes copied.
pub fn copy_stream<R, W>(reader: &mut R, writer: &mut W, buf_size: usize) -> io::Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buffer = vec![0u8; buf_size];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..n])?;
        total += n as u64;
    }
}

/// Creates every missing parent directory of `path`.
pub fn create_parent_dirs(path: &Path) -> Result<(), JvmchError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(JvmchError::io(parent))
        }
        _ => Ok(()),
    }
}

/// Renders `path` relative to `base` with `/` separators, the form archive
/// entry names use on every platform.
pub fn relative_slash_path(base: &Path, path: &Path) -> Result<String, JvmchError> {
    let rel = path.strip_prefix(base).map_err(|_| JvmchError::StripPrefix {
        prefix: base.to_path_buf(),
        path: path.to_path_buf(),
    })?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    Ok(parts.join("/"))
}
