// src/utils/log.rs

//! Log output plumbing for the CLI.
//!
//! Log lines go to stderr and, when `logging.file` is set, are appended to a
//! file as well.

use std::fs::{File, OpenOptions};
use std::io::{self, Stderr, Write};
use std::path::{Path, PathBuf};

/// Writer that duplicates every write into two sinks.
pub struct TeeWriter<A, B> {
    first: A,
    second: B,
}

impl<A: Write, B: Write> TeeWriter<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A: Write, B: Write> Write for TeeWriter<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.first.write_all(buf)?;
        self.second.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.first.flush()?;
        self.second.flush()
    }
}

/// Resolve the configured log file against `base_dir`. `None` when disabled.
pub fn log_file_path(file: &str, base_dir: &Path) -> Option<PathBuf> {
    let file = file.trim();
    if file.is_empty() {
        return None;
    }
    let path = PathBuf::from(file);
    Some(if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    })
}

/// Open `path` for appending, creating it if needed.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Stderr tee'd into the log file at `path`.
pub fn stderr_and_file(path: &Path) -> io::Result<TeeWriter<Stderr, File>> {
    Ok(TeeWriter::new(io::stderr(), open_log_file(path)?))
}
