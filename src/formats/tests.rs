use super::{FormatError, TransactionFormat, gather_transaction_files, load_raw_records};

use std::fs;
use std::path::Path;

use anyhow::Result;
use tempfile::tempdir;

use crate::models::RawRecord;

fn field<'a>(record: &'a RawRecord, key: &str) -> Option<&'a str> {
    record.fields.get(key).and_then(|value| value.as_deref())
}

#[test]
fn test_csv_rows_become_raw_mappings() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.csv");
    fs::write(
        &path,
        "id,timestamp,account_id,amount\n\
         t1, 2024-01-01T00:00:00Z ,acc-1,100\n\
         \n\
         t2,2024-01-01T01:00:00Z,acc-2,200\n",
    )?;

    let records = load_raw_records(&path, None)?;

    assert_eq!(records.len(), 2);
    assert_eq!(field(&records[0], "id"), Some("t1"));
    assert_eq!(field(&records[0], "timestamp"), Some("2024-01-01T00:00:00Z"));
    assert_eq!(field(&records[1], "amount"), Some("200"));
    assert_eq!(records[0].source_path, path.display().to_string());

    Ok(())
}

#[test]
fn test_json_accepts_top_level_array() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.json");
    fs::write(
        &path,
        r#"[{"id": "t1", "timestamp": "2024-01-01T00:00:00Z", "amount": 120.5}]"#,
    )?;

    let records = load_raw_records(&path, None)?;

    assert_eq!(records.len(), 1);
    assert_eq!(field(&records[0], "amount"), Some("120.5"));

    Ok(())
}

#[test]
fn test_json_accepts_transactions_object_and_preserves_nulls() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.json");
    fs::write(
        &path,
        r#"{"transactions": [{"id": "t1", "amount": "10", "description": null}]}"#,
    )?;

    let records = load_raw_records(&path, None)?;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].fields.get("description"), Some(&None));

    Ok(())
}

#[test]
fn test_json_object_without_transactions_key_is_empty() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.json");
    fs::write(&path, r#"{"metadata": "only"}"#)?;

    let records = load_raw_records(&path, None)?;

    assert!(records.is_empty());

    Ok(())
}

#[test]
fn test_json_rejects_non_collection_payload() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.json");
    fs::write(&path, r#""just a string""#)?;

    let result = load_raw_records(&path, None);

    assert!(matches!(result, Err(FormatError::InvalidJsonPayload)));

    Ok(())
}

#[test]
fn test_xml_transaction_elements_become_raw_mappings() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.xml");
    fs::write(
        &path,
        "<transactions>\
           <transaction>\
             <id>t1</id>\
             <timestamp>2024-01-01T00:00:00Z</timestamp>\
             <account_id>acc-1</account_id>\
             <amount>4000</amount>\
             <unrelated>ignored</unrelated>\
           </transaction>\
           <transaction>\
             <id>t2</id>\
             <Timestamp>2024-01-01T01:00:00Z</Timestamp>\
             <Amount>5000</Amount>\
           </transaction>\
         </transactions>",
    )?;

    let records = load_raw_records(&path, None)?;

    assert_eq!(records.len(), 2);
    assert_eq!(field(&records[0], "amount"), Some("4000"));
    assert_eq!(field(&records[0], "account_id"), Some("acc-1"));
    assert_eq!(field(&records[1], "amount"), Some("5000"));
    assert_eq!(field(&records[1], "timestamp"), Some("2024-01-01T01:00:00Z"));
    assert_eq!(records[1].fields.get("account_id"), Some(&None));

    Ok(())
}

#[test]
fn test_gather_walks_directories_recursively_in_sorted_order() -> Result<()> {
    let directory = tempdir()?;
    fs::create_dir(directory.path().join("nested"))?;
    fs::write(directory.path().join("b.json"), "[]")?;
    fs::write(directory.path().join("a.csv"), "id\n")?;
    fs::write(directory.path().join("notes.txt"), "skip me")?;
    fs::write(directory.path().join("nested").join("c.xml"), "<transactions/>")?;

    let files = gather_transaction_files(directory.path())?;
    let names: Vec<_> = files
        .iter()
        .filter_map(|file| file.file_name().and_then(|name| name.to_str()))
        .collect();

    assert_eq!(names, vec!["a.csv", "b.json", "c.xml"]);

    Ok(())
}

#[test]
fn test_gather_accepts_a_single_supported_file() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.csv");
    fs::write(&path, "id\n")?;

    let files = gather_transaction_files(&path)?;

    assert_eq!(files, vec![path]);

    Ok(())
}

#[test]
fn test_gather_rejects_unsupported_extension() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("batch.txt");
    fs::write(&path, "not transactions")?;

    let result = gather_transaction_files(&path);

    assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));

    Ok(())
}

#[test]
fn test_gather_reports_missing_path() {
    let result = gather_transaction_files(Path::new("does-not-exist"));

    assert!(matches!(result, Err(FormatError::Io(_))));
}

#[test]
fn test_format_override_wins_over_extension() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("export.txt");
    fs::write(&path, "id,amount\nt1,10\n")?;

    let records = load_raw_records(&path, Some(TransactionFormat::Csv))?;

    assert_eq!(records.len(), 1);
    assert_eq!(field(&records[0], "amount"), Some("10"));

    Ok(())
}

#[test]
fn test_format_inference_is_case_insensitive() {
    assert_eq!(
        TransactionFormat::from_path(Path::new("batch.CSV")),
        Some(TransactionFormat::Csv)
    );
    assert_eq!(TransactionFormat::from_path(Path::new("batch.parquet")), None);
}
