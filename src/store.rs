//! In-memory transaction table, loaded once at startup and read-only afterwards

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::models::TransactionRecord;

/// Cell values read as missing, matching the usual dataframe NA tokens
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Largest accepted `|amount|`.
///
/// Keeps every sum over the table far below `Decimal::MAX`, so aggregates
/// never overflow.
pub fn max_abs_amount() -> Decimal {
    Decimal::from(1_000_000_000_000_000_000_u64)
}

fn is_missing(value: Option<&str>) -> bool {
    value.map_or(true, |v| NA_TOKENS.contains(&v.trim()))
}

/// Raw CSV row; any missing field drops the row
#[derive(Debug, Deserialize)]
struct CsvRow {
    index: Option<String>,
    block_timestamp: Option<String>,
    previous_hash: Option<String>,
    nonce: Option<String>,
    hash: Option<String>,
    sender: Option<String>,
    receiver: Option<String>,
    amount: Option<String>,
    transaction_timestamp: Option<String>,
    transaction_id: Option<String>,
}

impl CsvRow {
    /// `Ok(None)` for a row with a missing field, `Err` for an unparseable one
    fn into_record(self, line: usize) -> Result<Option<TransactionRecord>> {
        let fields = [
            &self.index,
            &self.block_timestamp,
            &self.previous_hash,
            &self.nonce,
            &self.hash,
            &self.sender,
            &self.receiver,
            &self.amount,
            &self.transaction_timestamp,
            &self.transaction_id,
        ];
        if fields.iter().any(|f| is_missing(f.as_deref())) {
            return Ok(None);
        }

        // All fields are present past this point
        let get = |f: Option<String>| f.unwrap_or_default().trim().to_string();

        Ok(Some(TransactionRecord {
            block_index: parse_integer(&get(self.index), "index", line)?,
            block_timestamp: parse_epoch(&get(self.block_timestamp), "block_timestamp", line)?,
            previous_hash: get(self.previous_hash),
            nonce: parse_integer(&get(self.nonce), "nonce", line)?,
            hash: get(self.hash),
            sender: get(self.sender),
            receiver: get(self.receiver),
            amount: parse_amount(&get(self.amount), line)?,
            transaction_timestamp: parse_epoch(
                &get(self.transaction_timestamp),
                "transaction_timestamp",
                line,
            )?,
            transaction_id: get(self.transaction_id),
        }))
    }
}

fn invalid(column: &str, value: &str, line: usize) -> ChainRagError {
    ChainRagError::DataLoad(format!("line {line}: invalid {column} value '{value}'"))
}

/// Integers may have been written as `12.0` by upstream tooling
fn parse_integer(value: &str, column: &str, line: usize) -> Result<i64> {
    if let Ok(n) = value.parse::<i64>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 => Ok(f as i64),
        _ => Err(invalid(column, value, line)),
    }
}

/// Unix epoch seconds, integer or fractional
fn parse_epoch(value: &str, column: &str, line: usize) -> Result<DateTime<Utc>> {
    let seconds: f64 = value.parse().map_err(|_| invalid(column, value, line))?;
    if !seconds.is_finite() {
        return Err(invalid(column, value, line));
    }
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
        .ok_or_else(|| invalid(column, value, line))
}

fn parse_amount(value: &str, line: usize) -> Result<Decimal> {
    let amount = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid("amount", value, line))?;
    if amount.abs() > max_abs_amount() {
        return Err(ChainRagError::DataLoad(format!(
            "line {line}: amount '{value}' out of range"
        )));
    }
    Ok(amount)
}

/// Immutable table of transaction records
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: Vec<TransactionRecord>,
}

impl TransactionStore {
    /// Build from parsed records; amounts beyond [`max_abs_amount`] are dropped
    pub fn from_records(mut records: Vec<TransactionRecord>) -> Self {
        let before = records.len();
        records.retain(|r| r.amount.abs() <= max_abs_amount());
        if records.len() < before {
            warn!("Dropped {} records with out-of-range amounts", before - records.len());
        }
        Self { records }
    }

    /// Load a CSV file with a header row
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let store = Self::from_reader(file)?;
        info!(
            "Loaded {} transactions from {}",
            store.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    /// Parse CSV from any reader.
    ///
    /// Rows with a missing field or an unparseable value are dropped and
    /// counted; only I/O failures abort the load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut missing = 0usize;
        let mut malformed = 0usize;
        for (i, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
            // Header is line 1
            let line = i + 2;
            let parsed = match row {
                Ok(row) => row.into_record(line),
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => Err(ChainRagError::DataLoad(format!("line {line}: {e}"))),
            };
            match parsed {
                Ok(Some(record)) => records.push(record),
                Ok(None) => missing += 1,
                Err(e) => {
                    debug!("Skipping row: {}", e);
                    malformed += 1;
                }
            }
        }

        if missing > 0 {
            warn!("Dropped {} rows with missing fields", missing);
        }
        if malformed > 0 {
            warn!("Dropped {} rows with unparseable values", malformed);
        }
        Ok(Self { records })
    }

    /// Load the table, degrading to an empty store when the file is absent or unreadable
    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Data file '{}' not found. Some features may not work.",
                path.display()
            );
            return Self::default();
        }
        match Self::from_csv_path(path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Error loading data: {}", e);
                Self::default()
            }
        }
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All rows of one block, in table order
    pub fn block(&self, index: i64) -> Vec<&TransactionRecord> {
        self.records
            .iter()
            .filter(|r| r.block_index == index)
            .collect()
    }

    /// Distinct block indices in order of first appearance
    pub fn block_indices(&self) -> Vec<i64> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.block_index))
            .map(|r| r.block_index)
            .collect()
    }
}
