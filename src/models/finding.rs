use std::collections::BTreeMap;
use std::fmt;
use std::fmt::{Display, Formatter};

use serde::Serialize;

/// The five detection strategies, serialized under their stable wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    LargeTransaction,
    RapidBurst,
    SplitPayment,
    RoundAmount,
    ForeignActivity,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::LargeTransaction => "large_transaction",
            Rule::RapidBurst => "rapid_burst",
            Rule::SplitPayment => "split_payment",
            Rule::RoundAmount => "round_amount",
            Rule::ForeignActivity => "foreign_activity",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// One rule's evidence that a record or group of records matches a
/// suspicious pattern.
///
/// Findings are ephemeral: produced by one `detect_fraud` invocation and
/// handed to the caller, never persisted by this crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule: Rule,
    /// Implicated record ids, in the order the window evaluation added them.
    pub transaction_ids: Vec<String>,
    /// Rule-specific diagnostics. A `BTreeMap` keeps serialized output
    /// stably ordered for comparison.
    pub details: BTreeMap<String, String>,
}

impl Finding {
    pub fn new(rule: Rule, transaction_ids: Vec<String>, details: BTreeMap<String, String>) -> Self {
        Self {
            rule,
            transaction_ids,
            details,
        }
    }
}
