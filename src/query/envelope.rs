//! Uniform response shape handed to the presentation layer

use serde::Serialize;

use crate::errors::ChainRagError;
use crate::knowledge::retrieval_suggestions;
use crate::knowledge::suggestions;
use crate::knowledge::Concept;
use crate::models::BlockSummary;
use crate::models::TransactionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Error,
    BlockData,
    ConceptExplanation,
    Greeting,
    General,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    #[serde(rename = "response")]
    pub response_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TransactionRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BlockSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    /// Column the response text reports on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
    /// Seconds spent answering (retrieval pipeline only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_time: Option<f64>,
    /// Heuristic estimate, not a measured correctness score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl ResponseEnvelope {
    pub fn new(kind: ResponseKind, response_text: impl Into<String>) -> Self {
        Self {
            kind,
            response_text: response_text.into(),
            data: None,
            summary: None,
            suggestions: Vec::new(),
            highlight: None,
            concept: None,
            description: None,
            attributes: Vec::new(),
            examples: Vec::new(),
            query_time: None,
            accuracy: None,
        }
    }

    /// Error envelope carrying the standard suggestion list
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ResponseKind::Error, message).with_suggestions()
    }

    /// Map a processing error onto the envelope the caller sees
    pub fn from_error(err: &ChainRagError) -> Self {
        match err {
            ChainRagError::NoDataAvailable | ChainRagError::BlockNotFound(_) => {
                Self::error(err.to_string())
            }
            ChainRagError::InvalidAttribute(_) => Self::new(ResponseKind::Error, err.to_string()),
            other => Self::error(format!("Error processing query: {other}")),
        }
    }

    pub fn block_data(
        response_text: impl Into<String>,
        records: Vec<TransactionRecord>,
        summary: BlockSummary,
    ) -> Self {
        let mut envelope = Self::new(ResponseKind::BlockData, response_text);
        envelope.data = Some(records);
        envelope.summary = Some(summary);
        envelope
    }

    pub fn concept_explanation(concept: &Concept) -> Self {
        let mut envelope = Self::new(ResponseKind::ConceptExplanation, concept.description);
        envelope.concept = Some(concept.name.to_string());
        envelope.description = Some(concept.description.to_string());
        envelope.attributes = concept.attributes.iter().map(ToString::to_string).collect();
        envelope.examples = concept.examples.iter().map(ToString::to_string).collect();
        envelope
    }

    #[must_use]
    pub fn with_suggestions(mut self) -> Self {
        self.suggestions = suggestions();
        self
    }

    /// Replace the suggestion list with the retrieval-pipeline one
    #[must_use]
    pub fn with_retrieval_suggestions(mut self) -> Self {
        self.suggestions = retrieval_suggestions();
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, attribute: impl Into<String>) -> Self {
        self.highlight = Some(attribute.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == ResponseKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;

    #[test]
    fn test_error_mapping() {
        let env = ResponseEnvelope::from_error(&ChainRagError::BlockNotFound(7));
        assert!(env.is_error());
        assert_eq!(env.response_text, "No data found for block 7");
        assert!(!env.suggestions.is_empty());

        let env = ResponseEnvelope::from_error(&ChainRagError::InvalidAttribute("timestamp".into()));
        assert!(env.suggestions.is_empty());

        let env = ResponseEnvelope::from_error(&ChainRagError::Custom("boom".into()));
        assert_eq!(env.response_text, "Error processing query: boom");
    }

    #[test]
    fn test_json_field_names() {
        let kb = KnowledgeBase::builtin();
        let env = ResponseEnvelope::concept_explanation(kb.get("hash").unwrap());
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["type"], "concept_explanation");
        assert_eq!(json["concept"], "hash");
        assert_eq!(json["attributes"][0], "hash");
        assert!(json.get("data").is_none());
        assert!(json.get("query_time").is_none());
    }
}
