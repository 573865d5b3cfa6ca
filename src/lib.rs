//! Question answering and analytics over a blockchain transaction dataset
//!
//! Two query paths share one immutable [`store::TransactionStore`]:
//! - [`query::QueryDispatcher`]: rule-based entity extraction and routing
//! - [`rag::RagService`]: retrieval over synthesised documents with optional
//!   embedding and generative backends, each with a deterministic fallback

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod knowledge;
pub mod llm;
pub mod logging;
pub mod models;
pub mod query;
pub mod rag;
pub mod store;

#[cfg(test)]
mod errors_tests;

pub use config::AppConfig;
pub use errors::*;
