use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::formats::FormatError;
use crate::models::{FieldMap, RawRecord};

/// One `<transaction>` element, with one child element per field. Unknown
/// children are ignored; known ones are carried over verbatim so the
/// normalizer applies the same defaulting as for every other format.
#[derive(Debug, Deserialize)]
struct XmlTransaction {
    id: Option<String>,
    #[serde(alias = "Timestamp")]
    timestamp: Option<String>,
    account_id: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(alias = "Amount")]
    amount: Option<String>,
    currency: Option<String>,
    counterparty: Option<String>,
    country: Option<String>,
    account_home_country: Option<String>,
    home_country: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct XmlBatch {
    #[serde(rename = "transaction", default)]
    transactions: Vec<XmlTransaction>,
}

impl XmlTransaction {
    fn into_field_map(self) -> FieldMap {
        FieldMap::from([
            ("id".to_string(), self.id),
            ("timestamp".to_string(), self.timestamp),
            ("account_id".to_string(), self.account_id),
            ("type".to_string(), self.kind),
            ("amount".to_string(), self.amount),
            ("currency".to_string(), self.currency),
            ("counterparty".to_string(), self.counterparty),
            ("country".to_string(), self.country),
            ("account_home_country".to_string(), self.account_home_country),
            ("home_country".to_string(), self.home_country),
            ("description".to_string(), self.description),
        ])
    }
}

/// Reads an XML file whose root wraps a list of `<transaction>` elements.
pub fn load(path: &Path, source_path: &str) -> Result<Vec<RawRecord>, FormatError> {
    let file = File::open(path)?;

    let batch: XmlBatch = quick_xml::de::from_reader(BufReader::new(file))
        .map_err(|error| FormatError::Xml(error.to_string()))?;

    Ok(batch
        .transactions
        .into_iter()
        .map(|transaction| RawRecord {
            fields: transaction.into_field_map(),
            source_path: source_path.to_string(),
        })
        .collect())
}
