//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::ChainRagError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = ChainRagError::Custom("Test error message".to_string());
        assert_eq!(format!("{error}"), "Test error message");
    }

    #[test]
    fn test_block_not_found_mentions_block() {
        let error = ChainRagError::BlockNotFound(42);
        assert_eq!(error.to_string(), "No data found for block 42");
        assert_eq!(error.kind(), "block_not_found");
    }

    #[test]
    fn test_invalid_attribute_message() {
        let error = ChainRagError::InvalidAttribute("timestamp".to_string());
        assert_eq!(
            error.to_string(),
            "Attribute 'timestamp' not found in block data"
        );
        assert_eq!(error.kind(), "invalid_attribute");
    }

    #[test]
    fn test_no_data_available() {
        let error = ChainRagError::NoDataAvailable;
        assert_eq!(error.to_string(), "No data available");
        assert_eq!(error.kind(), "no_data_available");
    }

    #[test]
    fn test_backend_failures_have_recoverable_kinds() {
        assert_eq!(
            ChainRagError::EmbeddingError("down".into()).kind(),
            "retrieval_failure"
        );
        assert_eq!(
            ChainRagError::LlmError("rate limited".into()).kind(),
            "generation_failure"
        );
        assert_eq!(
            ChainRagError::HttpError("refused".into()).kind(),
            "unhandled_query_error"
        );
    }

    #[test]
    fn test_config_error() {
        let error = ChainRagError::ConfigError("Invalid configuration".to_string());
        assert!(matches!(error, ChainRagError::ConfigError(_)));
        assert!(error.to_string().contains("configuration"));
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: ChainRagError = io_err.into();
        assert!(matches!(err, ChainRagError::Io(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid").unwrap_err();
        let err: ChainRagError = json_err.into();
        assert!(matches!(err, ChainRagError::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("= broken").unwrap_err();
        let err: ChainRagError = toml_err.into();
        assert!(matches!(err, ChainRagError::TomlParsing(_)));
    }

    #[test]
    fn test_question_mark_propagation() {
        fn inner() -> crate::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))?;
            Ok(())
        }

        let err = inner().unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
