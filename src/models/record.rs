use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::errors::MalformedRecord;

/// Raw string-keyed fields as produced by the format loaders. Values are
/// optional because JSON payloads may carry explicit nulls.
pub type FieldMap = HashMap<String, Option<String>>;

/// A parsed-but-unvalidated record paired with its provenance, as it travels
/// from a format loader to the normalizer.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub fields: FieldMap,
    pub source_path: String,
}

/// Canonical, immutable representation of one financial movement.
///
/// Instances are only constructed through [`Record::from_mapping`], which
/// rejects any input whose `amount` or `timestamp` is missing or unparsable.
/// Every other field carries a documented default, so the canonical form has
/// no absent values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Opaque identifier, unique within one ingestion batch.
    pub id: String,
    /// Primary ordering key. Offset-aware; naive input is assumed UTC.
    pub timestamp: DateTime<FixedOffset>,
    /// The originating account.
    pub account_id: String,
    /// Free-text transaction type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Exact decimal monetary value. Detection arithmetic never touches
    /// binary floating point.
    pub amount: Decimal,
    pub currency: String,
    /// The other party; may be empty.
    pub counterparty: String,
    /// Transaction country code.
    pub country: String,
    /// The account's declared home country.
    pub account_home_country: String,
    pub description: String,
    /// Which input file produced this record. Carried for audit, never read
    /// by detection rules.
    pub source_path: String,
}

impl Record {
    /// Normalizes one raw field mapping into a canonical record.
    ///
    /// `amount` and `timestamp` are mandatory and accept the capitalized key
    /// variants `Amount`/`Timestamp` found in heterogeneous source files.
    /// All remaining fields fall back to their defaults when absent, null,
    /// or empty after trimming.
    ///
    /// # Errors
    /// Returns [`MalformedRecord`] naming the offending field, the record id
    /// as found in the raw mapping (possibly empty), and the source path.
    pub fn from_mapping(fields: &FieldMap, source_path: &str) -> Result<Self, MalformedRecord> {
        let get = |key: &str, default: &str| -> String {
            match fields.get(key).and_then(|value| value.as_deref()) {
                Some(value) if !value.trim().is_empty() => value.trim().to_string(),
                _ => default.to_string(),
            }
        };

        let record_id = get("id", "");

        let amount_raw = first_present(fields, "amount", "Amount").ok_or_else(|| {
            MalformedRecord::MissingAmount {
                record_id: record_id.clone(),
                source_path: source_path.to_string(),
            }
        })?;

        let amount = Decimal::from_str(&amount_raw).map_err(|_| MalformedRecord::InvalidAmount {
            record_id: record_id.clone(),
            value: amount_raw.clone(),
            source_path: source_path.to_string(),
        })?;

        let timestamp_raw = first_present(fields, "timestamp", "Timestamp").ok_or_else(|| {
            MalformedRecord::MissingTimestamp {
                record_id: record_id.clone(),
                source_path: source_path.to_string(),
            }
        })?;

        let timestamp =
            parse_timestamp(&timestamp_raw).ok_or_else(|| MalformedRecord::InvalidTimestamp {
                record_id: record_id.clone(),
                value: timestamp_raw.clone(),
                source_path: source_path.to_string(),
            })?;

        let home_country_fallback = get("home_country", "US");

        Ok(Self {
            id: record_id,
            timestamp,
            account_id: get("account_id", ""),
            kind: get("type", "transfer"),
            amount,
            currency: get("currency", "USD"),
            counterparty: get("counterparty", ""),
            country: get("country", "US"),
            account_home_country: get("account_home_country", &home_country_fallback),
            description: get("description", ""),
            source_path: source_path.to_string(),
        })
    }

    /// Projects the canonical record back into its mapping form. The amount
    /// keeps its exact decimal string and the timestamp is normalized to
    /// RFC 3339.
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("id".to_string(), self.id.clone()),
            ("timestamp".to_string(), self.timestamp.to_rfc3339()),
            ("account_id".to_string(), self.account_id.clone()),
            ("type".to_string(), self.kind.clone()),
            ("amount".to_string(), self.amount.to_string()),
            ("currency".to_string(), self.currency.clone()),
            ("counterparty".to_string(), self.counterparty.clone()),
            ("country".to_string(), self.country.clone()),
            (
                "account_home_country".to_string(),
                self.account_home_country.clone(),
            ),
            ("description".to_string(), self.description.clone()),
            ("source_path".to_string(), self.source_path.clone()),
        ])
    }
}

/// Returns the first non-empty value among two key variants.
fn first_present(fields: &FieldMap, key: &str, alternate: &str) -> Option<String> {
    [key, alternate]
        .iter()
        .filter_map(|candidate| fields.get(*candidate).and_then(|value| value.as_deref()))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Accepts an RFC 3339 instant, falling back to a naive ISO-8601 datetime
/// interpreted as UTC when no offset is present.
fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed);
    }

    raw.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}
