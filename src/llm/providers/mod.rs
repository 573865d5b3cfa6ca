//! Generative provider implementations
//!
//! `build(config)` is the factory called at startup.

pub mod dummy;
pub mod openai;

use crate::config::LlmConfig;
use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::llm::LlmProvider;

pub fn build(config: &LlmConfig) -> Result<LlmProvider> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openai" | "openai-compatible" => {
            let api_key = Some(config.llm_key.clone()).filter(|k| !k.is_empty());
            let provider = openai::OpenAiCompatibleProvider::new(
                config.llm_endpoint.clone(),
                config.llm_model.clone(),
                config.temperature,
                config.max_tokens,
                config.timeout_secs,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(provider))
        }
        other => Err(ChainRagError::ConfigError(format!("unknown llm provider '{other}'"))),
    }
}
