use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;

use crate::formats::FormatError;
use crate::models::{FieldMap, RawRecord};

/// Reads a JSON file holding either a top-level array of transaction objects
/// or an object with a `transactions` array. Scalar values are coerced to
/// their string form; explicit nulls stay null for the normalizer to
/// default.
pub fn load(path: &Path, source_path: &str) -> Result<Vec<RawRecord>, FormatError> {
    let file = File::open(path)?;
    let payload: Value = serde_json::from_reader(BufReader::new(file))?;

    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("transactions") {
            Some(Value::Array(entries)) => entries,
            None => Vec::new(),
            Some(_) => return Err(FormatError::InvalidJsonPayload),
        },
        _ => return Err(FormatError::InvalidJsonPayload),
    };

    entries
        .into_iter()
        .map(|entry| match entry {
            Value::Object(object) => {
                let fields: FieldMap = object
                    .into_iter()
                    .map(|(key, value)| (key, scalar_to_string(value)))
                    .collect();

                Ok(RawRecord {
                    fields,
                    source_path: source_path.to_string(),
                })
            }
            _ => Err(FormatError::InvalidJsonPayload),
        })
        .collect()
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}
