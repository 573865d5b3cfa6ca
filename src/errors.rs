use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainRagError {
    #[error("No data available")]
    NoDataAvailable,

    #[error("No data found for block {0}")]
    BlockNotFound(i64),

    #[error("Attribute '{0}' not found in block data")]
    InvalidAttribute(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Data load error: {0}")]
    DataLoad(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

impl ChainRagError {
    /// Coarse error kind used in structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NoDataAvailable => "no_data_available",
            Self::BlockNotFound(_) => "block_not_found",
            Self::InvalidAttribute(_) => "invalid_attribute",
            Self::EmbeddingError(_) => "retrieval_failure",
            Self::LlmError(_) => "generation_failure",
            _ => "unhandled_query_error",
        }
    }
}

impl From<reqwest::Error> for ChainRagError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChainRagError>;
