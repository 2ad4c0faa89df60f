use thiserror::Error;

/// File-level loader failures. One unreadable file is logged and skipped by
/// the pipeline; it never aborts the rest of the batch.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("JSON payload must be an array of transactions or an object with a 'transactions' array")]
    InvalidJsonPayload,
}
