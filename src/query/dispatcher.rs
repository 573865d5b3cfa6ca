//! Routes extracted intents to block, concept or general handlers

use std::sync::Arc;

use tracing::debug;
use tracing::warn;

use super::entities::EntityExtractor;
use super::envelope::ResponseEnvelope;
use super::envelope::ResponseKind;
use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::models::BlockSummary;
use crate::models::TransactionRecord;
use crate::store::TransactionStore;

const GREETING_TRIGGERS: &[&str] = &["hello", "hi", "hey", "greetings"];

pub const GREETING_MESSAGE: &str = "Hello! Welcome to Chain Explorer. I can help you analyze your blockchain data. Try asking about specific blocks, transactions, or blockchain concepts.";

pub const HELP_MESSAGE: &str = "I can help you with blockchain data analysis. Try asking about specific blocks, transactions, or concepts like 'hash', 'nonce', or 'transaction'.";

/// Rule-based question answering over the transaction table
pub struct QueryDispatcher {
    store: Arc<TransactionStore>,
    extractor: EntityExtractor,
}

impl QueryDispatcher {
    pub fn new(store: Arc<TransactionStore>, extractor: EntityExtractor) -> Self {
        Self { store, extractor }
    }

    /// Answer `query`; failures come back as `error` envelopes, never as `Err`
    pub fn process(&self, query: &str) -> ResponseEnvelope {
        match self.try_process(query) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(kind = e.kind(), "Query failed: {}", e);
                ResponseEnvelope::from_error(&e)
            }
        }
    }

    fn try_process(&self, query: &str) -> Result<ResponseEnvelope> {
        if self.store.is_empty() {
            return Err(ChainRagError::NoDataAvailable);
        }

        let entities = self.extractor.extract(query)?;
        debug!(?entities, "Extracted entities");

        if let Some(block) = entities.block_number {
            return self.handle_block_query(block, entities.attribute);
        }
        if let Some(concept) = entities.concept {
            return self.handle_concept_query(concept);
        }
        Ok(handle_general_query(query))
    }

    fn handle_block_query(&self, block: i64, attribute: Option<&str>) -> Result<ResponseEnvelope> {
        let rows = self.store.block(block);
        let Some(first) = rows.first().copied() else {
            return Err(ChainRagError::BlockNotFound(block));
        };

        let summary = BlockSummary::from_records(rows.iter().copied());
        let records: Vec<TransactionRecord> = rows.iter().map(|r| (*r).clone()).collect();

        match attribute {
            Some(attr) => {
                let value = first
                    .attribute(attr)
                    .ok_or_else(|| ChainRagError::InvalidAttribute(attr.to_string()))?;
                Ok(ResponseEnvelope::block_data(
                    format!("The {attr} of block {block} is {value}"),
                    records,
                    summary,
                )
                .with_highlight(attr))
            }
            None => Ok(ResponseEnvelope::block_data(
                format!("Here's the information for block {block}:"),
                records,
                summary,
            )),
        }
    }

    fn handle_concept_query(&self, concept: &str) -> Result<ResponseEnvelope> {
        let concept = self
            .extractor
            .knowledge_base()
            .get(concept)
            .ok_or_else(|| ChainRagError::Custom(format!("unknown concept '{concept}'")))?;
        Ok(ResponseEnvelope::concept_explanation(concept))
    }
}

fn handle_general_query(query: &str) -> ResponseEnvelope {
    let lowered = query.to_lowercase();
    if GREETING_TRIGGERS.iter().any(|w| lowered.contains(w)) {
        ResponseEnvelope::new(ResponseKind::Greeting, GREETING_MESSAGE).with_suggestions()
    } else {
        ResponseEnvelope::new(ResponseKind::General, HELP_MESSAGE).with_suggestions()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use super::*;

    fn tx(block: i64, sender: &str, amount: &str) -> TransactionRecord {
        TransactionRecord {
            block_index: block,
            block_timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            previous_hash: "0000".into(),
            nonce: 314,
            hash: format!("hash-{block}"),
            sender: sender.into(),
            receiver: "receiver01".into(),
            amount: Decimal::from_str(amount).unwrap(),
            transaction_timestamp: Utc.timestamp_opt(1_700_000_010, 0).unwrap(),
            transaction_id: format!("tx-{block}-{amount}"),
        }
    }

    fn dispatcher(records: Vec<TransactionRecord>) -> QueryDispatcher {
        QueryDispatcher::new(
            Arc::new(TransactionStore::from_records(records)),
            EntityExtractor::default(),
        )
    }

    #[test]
    fn test_block_summary_response() {
        let d = dispatcher(vec![tx(1, "abc12345xyz", "10.00"), tx(1, "abc12345xyz", "20.00")]);
        let env = d.process("Show me block 1");
        assert_eq!(env.kind, ResponseKind::BlockData);
        assert_eq!(env.response_text, "Here's the information for block 1:");
        let summary = env.summary.unwrap();
        assert_eq!(summary.transaction_count, 2);
        assert_eq!(summary.total_amount, Decimal::from(30));
        assert_eq!(summary.unique_senders, 1);
        assert_eq!(env.data.unwrap().len(), 2);
    }

    #[test]
    fn test_attribute_response_uses_first_row() {
        let d = dispatcher(vec![tx(4, "a", "1.5"), tx(4, "b", "2")]);
        let env = d.process("What is the nonce of block 4?");
        assert_eq!(env.kind, ResponseKind::BlockData);
        assert_eq!(env.response_text, "The nonce of block 4 is 314");
        assert_eq!(env.highlight.as_deref(), Some("nonce"));
    }

    #[test]
    fn test_missing_block() {
        let d = dispatcher(vec![tx(1, "a", "1")]);
        let env = d.process("What is in block 42?");
        assert_eq!(env.kind, ResponseKind::Error);
        assert!(env.response_text.contains("42"));
        assert!(!env.suggestions.is_empty());
    }

    #[test]
    fn test_attribute_that_is_not_a_column() {
        let d = dispatcher(vec![tx(1, "a", "1")]);
        let env = d.process("what is the timestamp of block 1");
        assert_eq!(env.kind, ResponseKind::Error);
        assert_eq!(env.response_text, "Attribute 'timestamp' not found in block data");
    }

    #[test]
    fn test_concept_and_general() {
        let d = dispatcher(vec![tx(1, "a", "1")]);

        let env = d.process("Explain what a hash is");
        assert_eq!(env.kind, ResponseKind::ConceptExplanation);
        assert_eq!(env.concept.as_deref(), Some("hash"));

        let env = d.process("hello there");
        assert_eq!(env.kind, ResponseKind::Greeting);
        assert_eq!(env.response_text, GREETING_MESSAGE);

        let env = d.process("asdkjalksd");
        assert_eq!(env.kind, ResponseKind::General);
        assert_eq!(env.response_text, HELP_MESSAGE);
    }

    #[test]
    fn test_empty_store() {
        let d = dispatcher(Vec::new());
        for q in ["block 1", "Explain what a hash is", "hello"] {
            let env = d.process(q);
            assert_eq!(env.kind, ResponseKind::Error);
            assert_eq!(env.response_text, "No data available");
        }
    }

    #[test]
    fn test_out_of_range_block_is_reported() {
        let d = dispatcher(vec![tx(1, "a", "1")]);
        let env = d.process("block 123456789012345678901234567890");
        assert_eq!(env.kind, ResponseKind::Error);
        assert!(env.response_text.starts_with("Error processing query:"));
    }
}
