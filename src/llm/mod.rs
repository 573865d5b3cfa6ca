//! Generative backend abstraction
//!
//! `LlmProvider` is an enum over the concrete providers in `providers/`.
//! Instances are built once at startup and cloned freely; `reqwest::Client`
//! is reference counted internally.

pub mod prompts;
pub mod providers;

use tracing::info;

use crate::config::AppConfig;
use crate::errors::Result;

#[derive(Debug, Clone)]
pub enum LlmProvider {
    OpenAiCompatible(providers::openai::OpenAiCompatibleProvider),
    Dummy(providers::dummy::DummyProvider),
}

impl LlmProvider {
    /// Build the configured provider, or `None` when generation is disabled
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>> {
        if !config.llm_enabled() {
            return Ok(None);
        }
        let provider = providers::build(&config.llm)?;
        info!("Generative backend: {}", provider.name());
        Ok(Some(provider))
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::OpenAiCompatible(_) => "openai",
            Self::Dummy(_) => "dummy",
        }
    }

    /// One round trip: `system` prompt plus a single user message
    pub async fn complete(&self, system: &str, user: &str) -> Result<String> {
        match self {
            Self::OpenAiCompatible(p) => p.complete(system, user).await,
            Self::Dummy(p) => p.complete(system, user).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_llm_is_none() {
        assert!(LlmProvider::from_app_config(&AppConfig::default()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_dummy_from_config() {
        let mut config = AppConfig::default();
        config.llm.enabled = true;
        config.llm.provider = "dummy".to_string();
        let provider = LlmProvider::from_app_config(&config).unwrap().unwrap();
        assert_eq!(provider.name(), "dummy");
        assert_eq!(provider.complete("sys", "hi").await.unwrap(), "[echo] hi");
    }
}
