mod csv;
mod errors;
mod json;
#[cfg(test)]
mod tests;
mod xml;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::RawRecord;

pub use errors::FormatError;

/// The transaction file formats the ingestion front-end understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionFormat {
    Csv,
    Json,
    Xml,
}

impl TransactionFormat {
    /// Infers the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }
}

/// Collects the transaction files under a path.
///
/// A file is returned as-is when its extension is supported; a directory is
/// scanned recursively and its matches returned in sorted order so batch
/// processing is deterministic.
pub fn gather_transaction_files(path: &Path) -> Result<Vec<PathBuf>, FormatError> {
    if !path.exists() {
        return Err(FormatError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    if path.is_file() {
        return match TransactionFormat::from_path(path) {
            Some(_) => Ok(vec![path.to_path_buf()]),
            None => Err(FormatError::UnsupportedFormat(path.display().to_string())),
        };
    }

    let mut files = Vec::new();
    walk(path, &mut files)?;
    files.sort();

    Ok(files)
}

fn walk(directory: &Path, files: &mut Vec<PathBuf>) -> Result<(), io::Error> {
    for entry in fs::read_dir(directory)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if TransactionFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }

    Ok(())
}

/// Parses one transaction file into raw field mappings tagged with their
/// provenance. Normalization and per-record validation happen downstream so
/// one malformed record cannot take its siblings with it.
pub fn load_raw_records(
    path: &Path,
    override_format: Option<TransactionFormat>,
) -> Result<Vec<RawRecord>, FormatError> {
    let format = match override_format {
        Some(format) => format,
        None => TransactionFormat::from_path(path)
            .ok_or_else(|| FormatError::UnsupportedFormat(path.display().to_string()))?,
    };

    let source_path = path.display().to_string();

    match format {
        TransactionFormat::Csv => csv::load(path, &source_path),
        TransactionFormat::Json => json::load(path, &source_path),
        TransactionFormat::Xml => xml::load(path, &source_path),
    }
}
