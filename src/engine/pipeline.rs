use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, spawn_blocking};
use tracing::{debug, error, warn};

use crate::engine::detect_fraud;
use crate::formats::{gather_transaction_files, load_raw_records};
use crate::models::{Finding, RawRecord, Record};

/// Batch ingestion and detection pipeline.
///
/// A blocking reader task parses transaction files into raw field mappings
/// and feeds them through a bounded channel; the consumer normalizes each
/// mapping, skipping malformed records with a warning, and runs the rule
/// engine once over the collected batch. Detection itself is pure and
/// synchronous; the split only keeps file parsing off the async runtime.
pub struct FraudPipeline {
    backpressure: usize,
}

impl FraudPipeline {
    pub fn new() -> Self {
        Self { backpressure: 256 }
    }

    /// Runs the end-to-end pipeline for one input path (a transaction file
    /// or a directory scanned recursively for csv/json/xml files).
    pub async fn run(&self, path: &Path) -> anyhow::Result<Vec<Finding>> {
        let (sender, receiver) = mpsc::channel::<RawRecord>(self.backpressure);
        let reader_handle = self.spawn_file_reader(path.to_path_buf(), sender);
        let records = collect_records(receiver).await;

        if let Err(error) = reader_handle.await {
            error!("File ingestion task failed: {error}");
        }

        debug!("Normalized {} records from [{}]", records.len(), path.display());

        Ok(detect_fraud(&records))
    }

    fn spawn_file_reader(&self, path: PathBuf, sender: mpsc::Sender<RawRecord>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let files = match gather_transaction_files(&path) {
                Ok(files) => files,
                Err(error) => {
                    error!("Error gathering transaction files at [{}]: {error}", path.display());
                    return;
                }
            };

            for file in files {
                match load_raw_records(&file, None) {
                    Ok(raw_records) => {
                        for raw in raw_records {
                            if sender.blocking_send(raw).is_err() {
                                return;
                            }
                        }
                    }
                    Err(error) => {
                        error!("Skipping unreadable file [{}]: {error}", file.display());
                    }
                }
            }
        })
    }
}

impl Default for FraudPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes raw mappings as they arrive. A malformed record is logged and
/// skipped; its siblings keep flowing.
async fn collect_records(mut receiver: mpsc::Receiver<RawRecord>) -> Vec<Record> {
    let mut records = Vec::new();

    while let Some(raw) = receiver.recv().await {
        match Record::from_mapping(&raw.fields, &raw.source_path) {
            Ok(record) => records.push(record),
            Err(error) => warn!("{error}"),
        }
    }

    records
}
