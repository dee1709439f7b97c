use log::warn;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::conversion::{to_lines, TransformError};
use crate::types::{LabelRecord, ParseError};

/// Errors raised while reading or writing dataset files.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("directory does not exist: {0}")]
    MissingDirectory(PathBuf),
    #[error("{path}: {source}")]
    Fs {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}:{line}: {source}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        source: ParseError,
    },
    #[error(transparent)]
    Transform(#[from] TransformError),
}

fn fs_err(path: &Path) -> impl FnOnce(std::io::Error) -> IoError + '_ {
    move |source| IoError::Fs {
        path: path.to_path_buf(),
        source,
    }
}

/// Safely create an output directory and return its path.
///
/// An existing directory is removed and recreated so stale files from a
/// previous run never leak into the new output; the deletion is logged.
pub fn create_output_directory(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        warn!(
            "Directory {:?} already exists. Deleting and recreating it.",
            path
        );
        fs::remove_dir_all(path).and_then(|_| fs::create_dir_all(path))?;
    } else {
        fs::create_dir_all(path)?;
    }
    Ok(path.to_path_buf())
}

/// Remove every file and subdirectory inside `path`, keeping `path` itself.
pub fn empty_directory(path: &Path) -> Result<(), IoError> {
    if !path.exists() {
        return Err(IoError::MissingDirectory(path.to_path_buf()));
    }

    for entry in fs::read_dir(path).map_err(fs_err(path))? {
        let entry = entry.map_err(fs_err(path))?;
        let child = entry.path();
        if child.is_dir() {
            fs::remove_dir_all(&child).map_err(fs_err(&child))?;
        } else {
            fs::remove_file(&child).map_err(fs_err(&child))?;
        }
    }

    Ok(())
}

/// Write a label table to disk, one line per record with a trailing newline.
///
/// No header and no blank separators; line order is record order.
pub fn write_label_file(path: &Path, labels: &[LabelRecord]) -> Result<(), IoError> {
    let lines = to_lines(labels)?;

    let mut writer = BufWriter::new(File::create(path).map_err(fs_err(path))?);
    for line in &lines {
        writeln!(writer, "{line}").map_err(fs_err(path))?;
    }
    writer.flush().map_err(fs_err(path))?;

    Ok(())
}

/// Read a label file back into a table, preserving line order.
///
/// Blank lines are skipped; any malformed line fails the whole call with its
/// 1-based line number.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRecord>, IoError> {
    let reader = BufReader::new(File::open(path).map_err(fs_err(path))?);

    let mut labels = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(fs_err(path))?;
        if line.trim().is_empty() {
            continue;
        }
        let record = line.parse().map_err(|source| IoError::MalformedLine {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        labels.push(record);
    }

    Ok(labels)
}
