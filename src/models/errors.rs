use thiserror::Error;

/// Per-record normalization failure.
///
/// Each variant names the offending field and carries the record id as found
/// in the raw mapping (possibly empty) plus the source path, so a rejection
/// can be correlated back to exactly one input record. The caller decides
/// whether to skip, log, or abort; rejecting one record never affects its
/// siblings.
#[derive(Debug, Error)]
pub enum MalformedRecord {
    #[error("Missing amount in record [{record_id}] from [{source_path}]")]
    MissingAmount {
        record_id: String,
        source_path: String,
    },
    #[error("Invalid amount '{value}' in record [{record_id}] from [{source_path}]")]
    InvalidAmount {
        record_id: String,
        value: String,
        source_path: String,
    },
    #[error("Missing timestamp in record [{record_id}] from [{source_path}]")]
    MissingTimestamp {
        record_id: String,
        source_path: String,
    },
    #[error("Invalid timestamp '{value}' in record [{record_id}] from [{source_path}]")]
    InvalidTimestamp {
        record_id: String,
        value: String,
        source_path: String,
    },
}
