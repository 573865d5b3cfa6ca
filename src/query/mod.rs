//! Rule-based query understanding
//!
//! Turns a free-text question into structured entities and answers it
//! directly from the transaction table:
//! - block lookups ("What is the hash of block 3?")
//! - concept explanations ("Explain what a nonce is")
//! - greeting and help fallbacks

pub mod dispatcher;
pub mod entities;
pub mod envelope;

pub use dispatcher::QueryDispatcher;
pub use entities::EntityExtractor;
pub use entities::ExtractedEntities;
pub use entities::Intent;
pub use envelope::ResponseEnvelope;
pub use envelope::ResponseKind;
