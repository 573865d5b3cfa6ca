//! JSON API over the transaction table, rule-based queries and RAG

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use server::build_state;
pub use server::create_router;
pub use server::serve_api;
