//! Embeddings generation module
//!
//! Provides the encoder used for dense retrieval:
//! - `OpenAI` compatible `/embeddings` endpoints
//! - Ollama (local models)
//! - a hashed bag-of-words embedder that needs no network
//!
//! # Examples
//!
//! ```rust,no_run
//! use chainrag::config::AppConfig;
//! use chainrag::embeddings::EmbeddingBackend;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     if let Some(backend) = EmbeddingBackend::from_app_config(&config)? {
//!         let vectors = backend.encode(&["Hello, world!"]).await?;
//!         println!("Generated embedding with {} dimensions", vectors[0].len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod hashed;

use std::time::Duration;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;
pub use hashed::HashedEmbedder;
use tracing::info;

use crate::config::AppConfig;
use crate::errors::ChainRagError;
use crate::errors::Result;

/// Maximum texts sent in one remote embedding request
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for embedding generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingConfig {
    Remote {
        provider: EmbeddingProvider,
        model: String,
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    },
    Hashed {
        dimension: usize,
    },
}

impl EmbeddingConfig {
    /// Resolve the `[embeddings]` section; `None` when dense retrieval is off
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>> {
        if !config.embeddings_enabled() {
            return Ok(None);
        }
        let section = &config.embeddings;
        let remote = |provider| Self::Remote {
            provider,
            model: section.model.clone(),
            endpoint: section.endpoint.clone(),
            api_key: section.api_key.clone().filter(|k| !k.is_empty()),
            timeout: Duration::from_secs(section.timeout_secs),
        };

        let resolved = match section.provider.to_lowercase().as_str() {
            "hashed" | "local" => Self::Hashed {
                dimension: section.dimension,
            },
            "openai" => remote(EmbeddingProvider::OpenAI),
            "ollama" => remote(EmbeddingProvider::Ollama),
            other => {
                return Err(ChainRagError::ConfigError(format!(
                    "unknown embedding provider '{other}'"
                )))
            }
        };
        Ok(Some(resolved))
    }
}

/// Encoder shared by corpus indexing and query embedding
#[derive(Debug, Clone)]
pub enum EmbeddingBackend {
    Remote(EmbeddingClient),
    Hashed(HashedEmbedder),
}

impl EmbeddingBackend {
    pub fn from_config(config: EmbeddingConfig) -> Result<Self> {
        match config {
            EmbeddingConfig::Remote {
                provider,
                model,
                endpoint,
                api_key,
                timeout,
            } => {
                info!("Using {:?} embeddings ({}) at {}", provider, model, endpoint);
                Ok(Self::Remote(EmbeddingClient::new(
                    provider, model, endpoint, api_key, timeout,
                )?))
            }
            EmbeddingConfig::Hashed { dimension } => {
                info!("Using hashed local embeddings ({} dimensions)", dimension);
                Ok(Self::Hashed(HashedEmbedder::new(dimension)))
            }
        }
    }

    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>> {
        EmbeddingConfig::from_app_config(config)?
            .map(Self::from_config)
            .transpose()
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Remote(client) => match client.provider() {
                EmbeddingProvider::OpenAI => "openai",
                EmbeddingProvider::Ollama => "ollama",
            },
            Self::Hashed(_) => "hashed",
        }
    }

    /// Encode `texts` into one vector each, in input order
    pub async fn encode(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        match self {
            Self::Hashed(embedder) => Ok(texts.iter().map(|t| embedder.embed(t)).collect()),
            Self::Remote(client) => {
                let mut vectors = Vec::with_capacity(texts.len());
                for chunk in texts.chunks(MAX_BATCH_SIZE) {
                    vectors.extend(client.generate_batch(chunk.to_vec()).await?);
                }
                Ok(vectors)
            }
        }
    }
}

/// Cosine similarity; zero when either vector has no magnitude or lengths differ
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_embeddings_resolve_to_none() {
        let config = AppConfig::default();
        assert!(EmbeddingBackend::from_app_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_provider_resolution() {
        let mut config = AppConfig::default();
        config.embeddings.enabled = true;
        config.embeddings.provider = "hashed".to_string();
        config.embeddings.dimension = 32;
        assert_eq!(
            EmbeddingConfig::from_app_config(&config).unwrap(),
            Some(EmbeddingConfig::Hashed { dimension: 32 })
        );

        config.embeddings.provider = "Ollama".to_string();
        let resolved = EmbeddingConfig::from_app_config(&config).unwrap().unwrap();
        assert!(matches!(
            resolved,
            EmbeddingConfig::Remote {
                provider: EmbeddingProvider::Ollama,
                ..
            }
        ));

        config.embeddings.provider = "word2vec".to_string();
        assert!(EmbeddingConfig::from_app_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_hashed_backend_encodes_in_order() {
        let backend = EmbeddingBackend::from_config(EmbeddingConfig::Hashed { dimension: 16 }).unwrap();
        assert_eq!(backend.name(), "hashed");
        let vectors = backend.encode(&["alpha", "beta", "alpha"]).await.unwrap();
        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors[0], vectors[2]);
        assert_eq!(vectors[0].len(), 16);
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 1.0]), 0.0);
    }
}
