//! Rule-based entity extraction from free-text questions

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::knowledge::KnowledgeBase;

/// First explain trigger set, checked before identify triggers
const EXPLAIN_TRIGGERS: &[&str] = &["what", "tell", "show", "explain", "describe"];
const IDENTIFY_TRIGGERS: &[&str] = &["who", "which", "where"];
/// Second explain trigger set, only consulted when no identify trigger matched
const REASONING_TRIGGERS: &[&str] = &["how", "why"];

/// Coarse intent class of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Explain,
    Identify,
    Query,
}

/// Structured reading of a question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    pub block_number: Option<i64>,
    pub concept: Option<&'static str>,
    pub attribute: Option<&'static str>,
    pub intent: Intent,
}

pub struct EntityExtractor {
    knowledge_base: KnowledgeBase,
    block_pattern: Regex,
}

impl EntityExtractor {
    pub fn new(knowledge_base: KnowledgeBase) -> Self {
        Self {
            knowledge_base,
            block_pattern: Regex::new(r"(?i)block\s+(\d+)").expect("static regex is valid"),
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    /// Parse `query` into block number, concept, attribute and intent.
    ///
    /// Matching is by substring on the lowercased query, so `"hi"` matches
    /// inside `"this"`.
    pub fn extract(&self, query: &str) -> Result<ExtractedEntities> {
        let lowered = query.to_lowercase();

        let block_number = self
            .block_pattern
            .captures(query)
            .and_then(|caps| caps.get(1))
            .map(|digits| {
                digits.as_str().parse::<i64>().map_err(|_| {
                    ChainRagError::InvalidQuery(format!(
                        "block number {} is out of range",
                        digits.as_str()
                    ))
                })
            })
            .transpose()?;

        let intent = classify_intent(&lowered);
        let concept = self.match_concept(query, &lowered);
        let attribute = concept.and_then(|name| self.match_attribute(name, &lowered));

        Ok(ExtractedEntities {
            block_number,
            concept,
            attribute,
            intent,
        })
    }

    /// Fold over (concept, keyword) pairs keeping the first strict maximum of
    /// `len(keyword) / len(query)`. Equal scores never displace an earlier match.
    fn match_concept(&self, query: &str, lowered: &str) -> Option<&'static str> {
        let query_len = query.chars().count() as f64;

        self.knowledge_base
            .concepts()
            .iter()
            .flat_map(|concept| concept.keywords.iter().map(move |kw| (concept.name, *kw)))
            .filter(|(_, keyword)| lowered.contains(keyword))
            .fold((None, 0.0_f64), |(best, best_score), (name, keyword)| {
                let score = keyword.chars().count() as f64 / query_len;
                if score > best_score {
                    (Some(name), score)
                } else {
                    (best, best_score)
                }
            })
            .0
    }

    fn match_attribute(&self, concept: &str, lowered: &str) -> Option<&'static str> {
        self.knowledge_base
            .get(concept)?
            .attributes
            .iter()
            .copied()
            .find(|attr| lowered.contains(attr))
    }
}

impl Default for EntityExtractor {
    fn default() -> Self {
        Self::new(KnowledgeBase::builtin())
    }
}

/// Two disjoint trigger sets both map to `Explain`, with identify triggers
/// checked between them.
fn classify_intent(lowered: &str) -> Intent {
    let any = |words: &[&str]| words.iter().any(|w| lowered.contains(w));

    if any(EXPLAIN_TRIGGERS) {
        Intent::Explain
    } else if any(IDENTIFY_TRIGGERS) {
        Intent::Identify
    } else if any(REASONING_TRIGGERS) {
        Intent::Explain
    } else {
        Intent::Query
    }
}
