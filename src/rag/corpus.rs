//! Natural-language documents synthesised from the transaction table

use std::fmt::Write as _;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::knowledge::KnowledgeBase;
use crate::models::format_currency;
use crate::models::format_timestamp;
use crate::models::BlockSummary;
use crate::models::TransactionRecord;
use crate::store::TransactionStore;

/// Number of largest transfers listed in a block summary
const TOP_TRANSACTIONS: usize = 3;

/// Characters of an address kept in a summary
const ADDRESS_PREFIX_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    BlockSummary,
    Concept,
}

/// One retrievable unit of text
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: String,
    pub kind: DocumentKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_index: Option<i64>,
    /// Rows of the summarised block; empty for concept documents
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<TransactionRecord>,
}

impl Document {
    pub fn is_block(&self) -> bool {
        self.kind == DocumentKind::BlockSummary
    }

    pub fn is_concept(&self) -> bool {
        self.kind == DocumentKind::Concept
    }
}

/// Build the corpus: one summary per block in first-appearance order,
/// then one document per knowledge-base concept.
pub fn build_corpus(store: &TransactionStore, knowledge_base: &KnowledgeBase) -> Vec<Document> {
    let mut documents: Vec<Document> = store
        .block_indices()
        .into_iter()
        .map(|block| {
            let rows = store.block(block);
            Document {
                id: format!("block_{block}"),
                kind: DocumentKind::BlockSummary,
                text: summarize_block(block, &rows),
                block_index: Some(block),
                records: rows.into_iter().cloned().collect(),
            }
        })
        .collect();

    documents.extend(knowledge_base.concepts().iter().map(|concept| Document {
        id: format!("concept_{}", concept.name),
        kind: DocumentKind::Concept,
        text: concept.document.to_string(),
        block_index: None,
        records: Vec::new(),
    }));

    documents
}

/// Render the fixed-template paragraph describing one block
pub fn summarize_block(block: i64, rows: &[&TransactionRecord]) -> String {
    let summary = BlockSummary::from_records(rows.iter().copied());
    let average = if summary.transaction_count == 0 {
        Decimal::ZERO
    } else {
        summary.total_amount / Decimal::from(summary.transaction_count)
    };
    let created = rows
        .first()
        .map_or_else(|| "unknown time".to_string(), |r| format_timestamp(&r.block_timestamp));

    let mut text = format!(
        "Block {block} contains {} transaction(s) with a total volume of {}. \
         The block involves {} unique sender(s) and {} unique receiver(s). \
         The average transaction amount is {}. \
         This block was created at {created}.",
        summary.transaction_count,
        format_currency(summary.total_amount),
        summary.unique_senders,
        summary.unique_receivers,
        format_currency(average),
    );

    if !rows.is_empty() {
        let mut largest: Vec<&TransactionRecord> = rows.to_vec();
        largest.sort_by(|a, b| b.amount.cmp(&a.amount));

        text.push_str(" Top transactions include: ");
        for tx in largest.into_iter().take(TOP_TRANSACTIONS) {
            let _ = write!(
                text,
                "{} from {}... to {}...; ",
                format_currency(tx.amount),
                address_prefix(&tx.sender),
                address_prefix(&tx.receiver),
            );
        }
    }

    text
}

fn address_prefix(address: &str) -> String {
    address.chars().take(ADDRESS_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use chrono::Utc;

    use super::*;

    fn tx(block: i64, sender: &str, receiver: &str, amount: &str) -> TransactionRecord {
        TransactionRecord {
            block_index: block,
            block_timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            previous_hash: "00".into(),
            nonce: 1,
            hash: "ff".into(),
            sender: sender.into(),
            receiver: receiver.into(),
            amount: Decimal::from_str(amount).unwrap(),
            transaction_timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 6).unwrap(),
            transaction_id: format!("{sender}-{amount}"),
        }
    }

    #[test]
    fn test_block_summary_text() {
        let a = tx(1, "abcdefghijkl", "zyxwvutsrq", "1000.5");
        let b = tx(1, "abcdefghijkl", "r2", "20");
        let text = summarize_block(1, &[&a, &b]);
        assert_eq!(
            text,
            "Block 1 contains 2 transaction(s) with a total volume of $1,020.50. \
             The block involves 1 unique sender(s) and 2 unique receiver(s). \
             The average transaction amount is $510.25. \
             This block was created at 2024-01-02 03:04:05. \
             Top transactions include: $1,000.50 from abcdefgh... to zyxwvuts...; \
             $20.00 from abcdefgh... to r2...; "
        );
    }

    #[test]
    fn test_only_three_largest_listed() {
        let rows: Vec<TransactionRecord> = ["1", "5", "3", "4"]
            .iter()
            .map(|a| tx(2, "s", "r", a))
            .collect();
        let refs: Vec<&TransactionRecord> = rows.iter().collect();
        let text = summarize_block(2, &refs);
        let listed = text.split("Top transactions include: ").nth(1).unwrap();
        assert!(listed.starts_with("$5.00"));
        assert!(!listed.contains("$1.00"));
        assert_eq!(listed.matches(';').count(), 3);
    }

    #[test]
    fn test_corpus_layout() {
        let store = TransactionStore::from_records(vec![
            tx(3, "s", "r", "1"),
            tx(1, "s", "r", "2"),
            tx(3, "t", "r", "3"),
        ]);
        let kb = KnowledgeBase::builtin();
        let corpus = build_corpus(&store, &kb);

        assert_eq!(corpus.len(), 2 + kb.concepts().len());
        assert_eq!(corpus[0].id, "block_3");
        assert_eq!(corpus[0].records.len(), 2);
        assert_eq!(corpus[1].id, "block_1");
        assert!(corpus[2].is_concept());
        assert_eq!(corpus[2].id, format!("concept_{}", kb.concepts()[0].name));
    }

    #[test]
    fn test_empty_store_has_only_concepts() {
        let kb = KnowledgeBase::builtin();
        let corpus = build_corpus(&TransactionStore::default(), &kb);
        assert!(corpus.iter().all(Document::is_concept));
    }
}
