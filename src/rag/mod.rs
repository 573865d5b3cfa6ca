//! RAG (Retrieval-Augmented Generation) module
//!
//! Answers free-text questions about the transaction table:
//! - block summaries and concept notes form the corpus
//! - dense (embedding) retrieval with a keyword fallback
//! - generated answers with a deterministic template fallback
//! - running performance statistics
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chainrag::config::AppConfig;
//! use chainrag::knowledge::KnowledgeBase;
//! use chainrag::rag::RagService;
//! use chainrag::store::TransactionStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let store = Arc::new(TransactionStore::load_or_empty(config.data_file()));
//!     let service = RagService::new(&config, store, &KnowledgeBase::builtin()).await?;
//!
//!     let envelope = service.query("What is the total amount in block 3?").await;
//!     println!("{}", envelope.response_text);
//!     Ok(())
//! }
//! ```

pub mod corpus;
pub mod generator;
pub mod pipeline;
pub mod retriever;
pub mod tracker;

pub use corpus::build_corpus;
pub use corpus::Document;
pub use corpus::DocumentKind;
pub use generator::AnswerGenerator;
pub use pipeline::RagService;
pub use retriever::Retriever;
pub use tracker::PerformanceStats;
pub use tracker::PerformanceTracker;

/// Scored corpus document
#[derive(Debug, Clone, Copy)]
pub struct RetrievalResult<'a> {
    pub document: &'a Document,
    pub score: f32,
    pub match_type: MatchType,
}

/// Type of match for the retrieval result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    /// Vector similarity match
    Semantic,
    /// Word occurrence match
    Keyword,
}
