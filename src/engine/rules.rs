use std::collections::{BTreeMap, HashMap, VecDeque};

use chrono::Duration;
use rust_decimal::Decimal;

use crate::models::{Finding, Record, Rule};

const LARGE_TRANSACTION_THRESHOLD: i64 = 10_000;
const RAPID_BURST_COUNT: usize = 3;
const RAPID_BURST_WINDOW_MINUTES: i64 = 2;
const SPLIT_PAYMENT_COUNT: usize = 3;
const SPLIT_PAYMENT_WINDOW_MINUTES: i64 = 10;
const SPLIT_PAYMENT_THRESHOLD: i64 = 10_000;
const ROUND_AMOUNT_THRESHOLD: i64 = 1_000;
const ROUND_AMOUNT_MODULUS: i64 = 100;

/// Evaluates every detection rule over one batch of canonical records.
///
/// Records are stable-sorted by timestamp (equal timestamps keep their input
/// order), then the five rules run unconditionally over that single sorted
/// sequence. Their findings are concatenated in a fixed order —
/// large_transaction, rapid_burst, split_payment, round_amount,
/// foreign_activity — which is part of the observable contract. The engine
/// holds no state between invocations and never fails on well-formed input.
pub fn detect_fraud(records: &[Record]) -> Vec<Finding> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let mut findings = Vec::new();
    findings.extend(find_large_transactions(&ordered));
    findings.extend(find_rapid_bursts(&ordered));
    findings.extend(find_split_payments(&ordered));
    findings.extend(find_round_amounts(&ordered));
    findings.extend(find_foreign_activity(&ordered));
    findings
}

/// One finding per record whose amount strictly exceeds the threshold.
/// A record of exactly 10,000 does not qualify.
fn find_large_transactions(ordered: &[&Record]) -> Vec<Finding> {
    ordered
        .iter()
        .filter(|tx| tx.amount > Decimal::from(LARGE_TRANSACTION_THRESHOLD))
        .map(|tx| {
            Finding::new(
                Rule::LargeTransaction,
                vec![tx.id.clone()],
                BTreeMap::from([
                    ("amount".to_string(), tx.amount.to_string()),
                    (
                        "threshold".to_string(),
                        LARGE_TRANSACTION_THRESHOLD.to_string(),
                    ),
                ]),
            )
        })
        .collect()
}

/// Three or more transactions on the same account within a trailing
/// two-minute window.
///
/// Per account, a deque holds the current window: push the next transaction,
/// evict from the front while the newest-to-front delta strictly exceeds the
/// window (exactly at the boundary is retained), then emit over the whole
/// window once it reaches the trigger count. One member is evicted after
/// emitting so a sustained run does not re-trigger on every subsequent
/// transaction, while a later independent burst still reports.
fn find_rapid_bursts(ordered: &[&Record]) -> Vec<Finding> {
    let window_limit = Duration::minutes(RAPID_BURST_WINDOW_MINUTES);
    let mut findings = Vec::new();

    for (account_id, transactions) in group_by(ordered, |tx| tx.account_id.as_str()) {
        let mut window: VecDeque<&Record> = VecDeque::new();

        for tx in transactions {
            window.push_back(tx);

            while window
                .front()
                .is_some_and(|front| tx.timestamp - front.timestamp > window_limit)
            {
                window.pop_front();
            }

            if window.len() >= RAPID_BURST_COUNT {
                findings.push(Finding::new(
                    Rule::RapidBurst,
                    window.iter().map(|entry| entry.id.clone()).collect(),
                    BTreeMap::from([
                        ("account_id".to_string(), account_id.to_string()),
                        ("count".to_string(), window.len().to_string()),
                    ]),
                ));
                window.pop_front();
            }
        }
    }

    findings
}

/// Potential structuring: three or more transactions between the same
/// (account, counterparty) pair within a trailing ten-minute window whose
/// cumulative amount strictly exceeds the threshold.
///
/// The window keeps a running decimal total, subtracting amounts as aged
/// members leave the front. It is deliberately NOT reset after emitting, so
/// a sustained pattern produces overlapping findings as new transactions
/// arrive. Downstream consumers own deduplication.
fn find_split_payments(ordered: &[&Record]) -> Vec<Finding> {
    let window_limit = Duration::minutes(SPLIT_PAYMENT_WINDOW_MINUTES);
    let threshold = Decimal::from(SPLIT_PAYMENT_THRESHOLD);
    let mut findings = Vec::new();

    for ((account_id, counterparty), transactions) in
        group_by(ordered, |tx| (tx.account_id.as_str(), tx.counterparty.as_str()))
    {
        let mut window: VecDeque<&Record> = VecDeque::new();
        let mut total = Decimal::ZERO;

        for tx in transactions {
            window.push_back(tx);
            total += tx.amount;

            while window
                .front()
                .is_some_and(|front| tx.timestamp - front.timestamp > window_limit)
            {
                if let Some(front) = window.pop_front() {
                    total -= front.amount;
                }
            }

            if window.len() >= SPLIT_PAYMENT_COUNT && total > threshold {
                findings.push(Finding::new(
                    Rule::SplitPayment,
                    window.iter().map(|entry| entry.id.clone()).collect(),
                    BTreeMap::from([
                        ("account_id".to_string(), account_id.to_string()),
                        ("counterparty".to_string(), counterparty.to_string()),
                        ("total".to_string(), total.to_string()),
                    ]),
                ));
            }
        }
    }

    findings
}

/// Amounts of at least 1,000 that are an exact multiple of 100, on the
/// stored decimal value.
fn find_round_amounts(ordered: &[&Record]) -> Vec<Finding> {
    ordered
        .iter()
        .filter(|tx| {
            tx.amount >= Decimal::from(ROUND_AMOUNT_THRESHOLD)
                && tx.amount % Decimal::from(ROUND_AMOUNT_MODULUS) == Decimal::ZERO
        })
        .map(|tx| {
            Finding::new(
                Rule::RoundAmount,
                vec![tx.id.clone()],
                BTreeMap::from([("amount".to_string(), tx.amount.to_string())]),
            )
        })
        .collect()
}

/// Records whose transaction country differs from the account's declared
/// home country. Either side being empty suppresses the finding.
fn find_foreign_activity(ordered: &[&Record]) -> Vec<Finding> {
    ordered
        .iter()
        .filter(|tx| {
            !tx.country.is_empty()
                && !tx.account_home_country.is_empty()
                && tx.country != tx.account_home_country
        })
        .map(|tx| {
            Finding::new(
                Rule::ForeignActivity,
                vec![tx.id.clone()],
                BTreeMap::from([
                    ("country".to_string(), tx.country.clone()),
                    (
                        "account_home_country".to_string(),
                        tx.account_home_country.clone(),
                    ),
                ]),
            )
        })
        .collect()
}

/// Groups the sorted sequence by key, keeping timestamp order inside each
/// group and yielding groups in first-seen order so output stays
/// deterministic across runs.
fn group_by<'a, K, F>(ordered: &[&'a Record], key_of: F) -> Vec<(K, Vec<&'a Record>)>
where
    K: std::hash::Hash + Eq + Clone,
    F: Fn(&'a Record) -> K,
{
    let mut order: Vec<K> = Vec::new();
    let mut groups: HashMap<K, Vec<&Record>> = HashMap::new();

    for &tx in ordered {
        let key = key_of(tx);
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            })
            .push(tx);
    }

    order
        .into_iter()
        .map(|key| {
            let group = groups.remove(&key).unwrap_or_default();
            (key, group)
        })
        .collect()
}
