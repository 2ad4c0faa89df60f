use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use csv::{ReaderBuilder, Trim};

use crate::formats::FormatError;
use crate::models::{FieldMap, RawRecord};

/// Reads a CSV file whose header row names the transaction fields. Each data
/// row becomes one raw mapping of header to cell value.
pub fn load(path: &Path, source_path: &str) -> Result<Vec<RawRecord>, FormatError> {
    let file = File::open(path)?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;

        if row.iter().all(str::is_empty) {
            continue;
        }

        let fields: FieldMap = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), Some(value.to_string())))
            .collect();

        records.push(RawRecord {
            fields,
            source_path: source_path.to_string(),
        });
    }

    Ok(records)
}
