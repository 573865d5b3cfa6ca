//! CLI command handlers
//!
//! - ask: one-shot questions (rule-based or RAG)
//! - serve: API server
//! - info: statistics and configuration

pub mod ask;
pub mod info;
pub mod serve;

pub use ask::*;
pub use info::*;
pub use serve::*;
