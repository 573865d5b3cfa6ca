use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One row of the transaction table.
///
/// Rows sharing a `block_index` form one logical block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(rename = "index")]
    pub block_index: i64,
    pub block_timestamp: DateTime<Utc>,
    pub previous_hash: String,
    pub nonce: i64,
    pub hash: String,
    pub sender: String,
    pub receiver: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub transaction_timestamp: DateTime<Utc>,
    pub transaction_id: String,
}

impl TransactionRecord {
    /// Render the value of a named column, `None` for unknown columns
    pub fn attribute(&self, name: &str) -> Option<String> {
        let value = match name {
            "index" => self.block_index.to_string(),
            "block_timestamp" => self.block_timestamp.format(TIMESTAMP_FORMAT).to_string(),
            "previous_hash" => self.previous_hash.clone(),
            "nonce" => self.nonce.to_string(),
            "hash" => self.hash.clone(),
            "sender" => self.sender.clone(),
            "receiver" => self.receiver.clone(),
            "amount" => self.amount.to_string(),
            "transaction_timestamp" => self
                .transaction_timestamp
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            "transaction_id" => self.transaction_id.clone(),
            _ => return None,
        };
        Some(value)
    }
}

/// Aggregates over the rows of one block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub transaction_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub unique_senders: usize,
    pub unique_receivers: usize,
}

impl BlockSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        let mut transaction_count = 0;
        let mut total_amount = Decimal::ZERO;
        let mut senders = HashSet::new();
        let mut receivers = HashSet::new();

        for record in records {
            transaction_count += 1;
            total_amount += record.amount;
            senders.insert(record.sender.as_str());
            receivers.insert(record.receiver.as_str());
        }

        Self {
            transaction_count,
            total_amount,
            unique_senders: senders.len(),
            unique_receivers: receivers.len(),
        }
    }
}

/// Format an amount as `$1,234.56`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{frac_part}")
}

/// Format a timestamp the way block summaries present it
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
