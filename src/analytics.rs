//! Read-only aggregates over the transaction table

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::collections::HashSet;

use chrono::NaiveDate;
use chrono::Timelike;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::models::TransactionRecord;
use crate::store::TransactionStore;

/// Default number of addresses returned by the top-N rankings
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStats {
    pub total_blocks: usize,
    pub total_transactions: usize,
    pub unique_senders: usize,
    pub unique_receivers: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_volume: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_transaction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_transaction: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub min_transaction: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<TransactionRecord>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeOverTime {
    pub dates: Vec<String>,
    #[serde(serialize_with = "serialize_decimals")]
    pub volumes: Vec<Decimal>,
}

/// Addresses ranked by summed amount
#[derive(Debug, Clone, Serialize)]
pub struct AddressRanking {
    pub addresses: Vec<String>,
    #[serde(serialize_with = "serialize_decimals")]
    pub amounts: Vec<Decimal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockDistribution {
    pub blocks: Vec<i64>,
    pub transaction_counts: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionTimeline {
    pub hours: Vec<u32>,
    pub counts: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkStats {
    pub total_unique_addresses: usize,
    pub most_active_sender: Option<String>,
    pub most_active_receiver: Option<String>,
    pub sender_transaction_count: usize,
    pub receiver_transaction_count: usize,
}

fn serialize_decimals<S>(values: &[Decimal], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use rust_decimal::prelude::ToPrimitive;
    use serde::ser::SerializeSeq;

    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for v in values {
        seq.serialize_element(&v.to_f64().unwrap_or(0.0))?;
    }
    seq.end()
}

fn non_empty(store: &TransactionStore) -> Result<&[TransactionRecord]> {
    if store.is_empty() {
        Err(ChainRagError::NoDataAvailable)
    } else {
        Ok(store.records())
    }
}

pub fn dataset_stats(store: &TransactionStore) -> Result<DatasetStats> {
    let records = non_empty(store)?;

    let total_volume: Decimal = records.iter().map(|r| r.amount).sum();
    let max_transaction = records.iter().map(|r| r.amount).max().unwrap_or_default();
    let min_transaction = records.iter().map(|r| r.amount).min().unwrap_or_default();

    Ok(DatasetStats {
        total_blocks: store.block_indices().len(),
        total_transactions: records.len(),
        unique_senders: distinct(records.iter().map(|r| r.sender.as_str())),
        unique_receivers: distinct(records.iter().map(|r| r.receiver.as_str())),
        total_volume,
        average_transaction: total_volume / Decimal::from(records.len()),
        max_transaction,
        min_transaction,
    })
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> usize {
    values.collect::<HashSet<_>>().len()
}

/// One page of transactions; `page` is 1-based
pub fn paginate(store: &TransactionStore, page: usize, per_page: usize) -> Result<TransactionPage> {
    let records = non_empty(store)?;
    let page = page.max(1);
    let per_page = per_page.max(1);

    let start = (page - 1).saturating_mul(per_page).min(records.len());
    let end = start.saturating_add(per_page).min(records.len());

    Ok(TransactionPage {
        transactions: records[start..end].to_vec(),
        total: records.len(),
        page,
        per_page,
        total_pages: records.len().div_ceil(per_page),
    })
}

/// Summed amount per UTC calendar day of the transaction timestamp
pub fn volume_over_time(store: &TransactionStore) -> Result<VolumeOverTime> {
    let records = non_empty(store)?;

    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for r in records {
        *daily.entry(r.transaction_timestamp.date_naive()).or_default() += r.amount;
    }

    let (dates, volumes) = daily
        .into_iter()
        .map(|(date, volume)| (date.to_string(), volume))
        .unzip();
    Ok(VolumeOverTime { dates, volumes })
}

pub fn top_senders(store: &TransactionStore, n: usize) -> Result<AddressRanking> {
    let records = non_empty(store)?;
    Ok(rank_by_amount(records.iter().map(|r| (r.sender.as_str(), r.amount)), n))
}

pub fn top_receivers(store: &TransactionStore, n: usize) -> Result<AddressRanking> {
    let records = non_empty(store)?;
    Ok(rank_by_amount(records.iter().map(|r| (r.receiver.as_str(), r.amount)), n))
}

fn rank_by_amount<'a>(pairs: impl Iterator<Item = (&'a str, Decimal)>, n: usize) -> AddressRanking {
    let mut order = Vec::new();
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for (address, amount) in pairs {
        let entry = totals.entry(address).or_insert_with(|| {
            order.push(address);
            Decimal::ZERO
        });
        *entry += amount;
    }

    let mut ranked: Vec<(&str, Decimal)> = order.into_iter().map(|a| (a, totals[a])).collect();
    // Stable sort keeps first-seen order among equal totals
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);

    let (addresses, amounts) = ranked
        .into_iter()
        .map(|(a, amount)| (a.to_string(), amount))
        .unzip();
    AddressRanking { addresses, amounts }
}

pub fn block_distribution(store: &TransactionStore) -> Result<BlockDistribution> {
    let records = non_empty(store)?;

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.block_index).or_default() += 1;
    }

    let (blocks, transaction_counts) = counts.into_iter().unzip();
    Ok(BlockDistribution {
        blocks,
        transaction_counts,
    })
}

/// Transaction count per hour of day
pub fn transaction_timeline(store: &TransactionStore) -> Result<TransactionTimeline> {
    let records = non_empty(store)?;

    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.transaction_timestamp.hour()).or_default() += 1;
    }

    let (hours, counts) = counts.into_iter().unzip();
    Ok(TransactionTimeline { hours, counts })
}

pub fn network_stats(store: &TransactionStore) -> Result<NetworkStats> {
    let records = non_empty(store)?;

    let addresses: HashSet<&str> = records
        .iter()
        .flat_map(|r| [r.sender.as_str(), r.receiver.as_str()])
        .collect();

    let (most_active_sender, sender_transaction_count) =
        most_frequent(records.iter().map(|r| r.sender.as_str()));
    let (most_active_receiver, receiver_transaction_count) =
        most_frequent(records.iter().map(|r| r.receiver.as_str()));

    Ok(NetworkStats {
        total_unique_addresses: addresses.len(),
        most_active_sender,
        most_active_receiver,
        sender_transaction_count,
        receiver_transaction_count,
    })
}

/// Highest count wins; ties go to the first address seen
fn most_frequent<'a>(values: impl Iterator<Item = &'a str>) -> (Option<String>, usize) {
    let mut order = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values {
        let c = counts.entry(v).or_insert_with(|| {
            order.push(v);
            0
        });
        *c += 1;
    }

    order
        .into_iter()
        .fold((None, 0), |(best, best_count), addr| {
            let count = counts[addr];
            if count > best_count {
                (Some(addr.to_string()), count)
            } else {
                (best, best_count)
            }
        })
}
