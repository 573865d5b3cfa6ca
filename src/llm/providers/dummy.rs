//! Echo provider: returns the user prompt prefixed with `[echo]`.
//! Exercises the generative path end to end without an API key.

use crate::errors::Result;

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, _system: &str, user: &str) -> Result<String> {
        Ok(format!("[echo] {user}"))
    }
}
