//! Answer generation from retrieved documents

use std::collections::HashSet;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::debug;
use tracing::warn;

use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::llm::prompts::build_answer_prompt;
use crate::llm::prompts::SYSTEM_PROMPT;
use crate::llm::LlmProvider;
use crate::models::format_currency;
use crate::rag::RetrievalResult;

pub const NO_CONTEXT_ANSWER: &str = "I couldn't find relevant information to answer your question. Please try rephrasing or asking about specific blocks or transactions.";

const VOLUME_TRIGGERS: &[&str] = &["amount", "value", "total"];
const SENDER_TRIGGERS: &[&str] = &["sender", "who"];

/// Produces answer text, preferring the generative backend when one is set
#[derive(Debug, Clone)]
pub struct AnswerGenerator {
    llm: Option<LlmProvider>,
    timeout: Duration,
    context_documents: usize,
}

impl AnswerGenerator {
    pub fn new(llm: Option<LlmProvider>, timeout: Duration, context_documents: usize) -> Self {
        Self {
            llm,
            timeout,
            context_documents: context_documents.max(1),
        }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Never fails: backend errors and timeouts degrade to the template answer
    pub async fn generate(&self, query: &str, results: &[RetrievalResult<'_>]) -> String {
        let Some(llm) = &self.llm else {
            return fallback_answer(query, results);
        };
        if results.is_empty() {
            return NO_CONTEXT_ANSWER.to_string();
        }

        match self.generate_with_llm(llm, query, results).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(kind = e.kind(), "LLM generation failed, using template answer: {}", e);
                fallback_answer(query, results)
            }
        }
    }

    async fn generate_with_llm(
        &self,
        llm: &LlmProvider,
        query: &str,
        results: &[RetrievalResult<'_>],
    ) -> Result<String> {
        let prompt = build_answer_prompt(
            query,
            results
                .iter()
                .take(self.context_documents)
                .map(|r| r.document.text.as_str()),
        );
        debug!(provider = llm.name(), prompt_len = prompt.len(), "Generating answer");

        let call = llm.complete(SYSTEM_PROMPT, &prompt);
        if self.timeout.is_zero() {
            return call.await;
        }
        tokio::time::timeout(self.timeout, call).await.map_err(|_| {
            ChainRagError::LlmError(format!("generation timed out after {}s", self.timeout.as_secs()))
        })?
    }
}

/// Deterministic answer built from the top result.
///
/// Block-specific phrasing (volume, sender count, "Here's information
/// about") applies only when the top document is a block summary and the
/// lowercased query contains "block". Any other question gets the top
/// document's text unchanged, so "total volume" alone returns the summary
/// verbatim.
pub fn fallback_answer(query: &str, results: &[RetrievalResult<'_>]) -> String {
    let Some(top) = results.first().map(|r| r.document) else {
        return NO_CONTEXT_ANSWER.to_string();
    };

    let query = query.to_lowercase();
    let block = match top.block_index {
        Some(block) if top.is_block() && query.contains("block") => block,
        _ => return top.text.clone(),
    };
    let summary = &top.text;

    if !top.records.is_empty() {
        if VOLUME_TRIGGERS.iter().any(|w| query.contains(w)) {
            let total: Decimal = top.records.iter().map(|r| r.amount).sum();
            return format!(
                "Block {block} has a total transaction volume of {}. {summary}",
                format_currency(total)
            );
        }
        if SENDER_TRIGGERS.iter().any(|w| query.contains(w)) {
            let senders: HashSet<&str> = top.records.iter().map(|r| r.sender.as_str()).collect();
            return format!("Block {block} has {} unique sender(s). {summary}", senders.len());
        }
    }

    format!("Here's information about {summary}")
}
