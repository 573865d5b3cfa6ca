use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file holding the transaction table
    #[serde(default = "default_data_file")]
    pub file: String,
}

fn default_data_file() -> String {
    "combined_block.csv".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            file: default_data_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub backtrace: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            backtrace: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingsConfig {
    /// Dense retrieval is only attempted when enabled
    #[serde(default)]
    pub enabled: bool,
    /// One of `openai`, `ollama`, `hashed`
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_embedding_provider() -> String {
    "hashed".to_string()
}

fn default_embedding_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_embedding_model() -> String {
    "all-minilm".to_string()
}

const fn default_embedding_dimension() -> usize {
    384
}

const fn default_backend_timeout() -> u64 {
    30
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_embedding_provider(),
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            timeout_secs: default_backend_timeout(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Template answers are used unless enabled
    #[serde(default)]
    pub enabled: bool,
    /// One of `openai`, `dummy`
    #[serde(default = "default_llm_provider")]
    pub provider: String,
    #[serde(default = "default_llm_endpoint")]
    pub llm_endpoint: String,
    #[serde(default)]
    pub llm_key: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-3.5-turbo".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

const fn default_max_tokens() -> u32 {
    300
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_llm_provider(),
            llm_endpoint: default_llm_endpoint(),
            llm_key: String::new(),
            llm_model: default_llm_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagConfig {
    /// Documents returned by the retriever per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Documents folded into the generation context
    #[serde(default = "default_top_k")]
    pub context_documents: usize,
    /// Reference latency for the time-reduction estimate
    #[serde(default = "default_baseline_query_secs")]
    pub baseline_query_secs: f64,
    /// Reported as-is by the performance endpoint
    #[serde(default = "default_user_count")]
    pub user_count: u64,
}

const fn default_top_k() -> usize {
    3
}

const fn default_baseline_query_secs() -> f64 {
    10.0
}

const fn default_user_count() -> u64 {
    150
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_documents: default_top_k(),
            baseline_query_secs: default_baseline_query_secs(),
            user_count: default_user_count(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub rag: RagConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default locations, then apply environment overrides
    pub fn load() -> crate::Result<Self> {
        let mut config = if Path::new("config.toml").exists() {
            Self::from_file("config.toml")?
        } else if Path::new("config.example.toml").exists() {
            tracing::warn!(
                "Using config.example.toml. Please create config.toml for production use."
            );
            Self::from_file("config.example.toml")?
        } else {
            tracing::info!("No config file found, using built-in defaults");
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Overlay `DATA_FILE`, `HOST`, `PORT`, `LOG_LEVEL` and `OPENAI_API_KEY`.
    ///
    /// The lookup is injected so tests do not touch the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(file) = lookup("DATA_FILE") {
            self.data.file = file;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| crate::ChainRagError::ConfigError(format!("invalid PORT '{port}': {e}")))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(key) = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            self.llm.llm_key = key;
            self.llm.enabled = true;
        }
        self.validate()
    }

    fn validate(&self) -> crate::Result<()> {
        if self.rag.top_k == 0 {
            return Err(crate::ChainRagError::ConfigError(
                "rag.top_k must be at least 1".to_string(),
            ));
        }
        if self.rag.baseline_query_secs <= 0.0 {
            return Err(crate::ChainRagError::ConfigError(
                "rag.baseline_query_secs must be positive".to_string(),
            ));
        }
        if self.embeddings.enabled && self.embeddings.dimension == 0 {
            return Err(crate::ChainRagError::ConfigError(
                "embeddings.dimension must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Get data file path
    pub fn data_file(&self) -> &str {
        &self.data.file
    }

    /// Get server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Check if dense retrieval is enabled
    pub fn embeddings_enabled(&self) -> bool {
        self.embeddings.enabled
    }

    /// Check if the generative backend is enabled
    pub fn llm_enabled(&self) -> bool {
        self.llm.enabled
    }
}
