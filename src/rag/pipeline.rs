//! End-to-end retrieval-augmented query pipeline

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use serde::Serialize;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::embeddings::EmbeddingBackend;
use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::knowledge::KnowledgeBase;
use crate::llm::LlmProvider;
use crate::models::BlockSummary;
use crate::query::ResponseEnvelope;
use crate::query::ResponseKind;
use crate::rag::corpus::build_corpus;
use crate::rag::corpus::DocumentKind;
use crate::rag::generator::AnswerGenerator;
use crate::rag::retriever::Retriever;
use crate::rag::tracker::estimate_accuracy;
use crate::rag::tracker::PerformanceStats;
use crate::rag::tracker::PerformanceTracker;

pub const NO_RESULTS_MESSAGE: &str = "I couldn't find relevant information. Please try asking about specific blocks or blockchain concepts.";

/// Performance statistics as served by the API
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ServiceStats {
    #[serde(flatten)]
    pub performance: PerformanceStats,
    pub user_count: u64,
}

/// RAG service: retrieve, generate, track
pub struct RagService {
    store_rows: usize,
    retriever: Retriever,
    generator: AnswerGenerator,
    tracker: PerformanceTracker,
    top_k: usize,
    user_count: u64,
}

impl RagService {
    /// Build the corpus and backends described by `config`
    pub async fn new(
        config: &AppConfig,
        store: Arc<crate::store::TransactionStore>,
        knowledge_base: &KnowledgeBase,
    ) -> Result<Self> {
        let embeddings = EmbeddingBackend::from_app_config(config)?;
        let llm = LlmProvider::from_app_config(config)?;

        let retriever = Retriever::build(
            build_corpus(&store, knowledge_base),
            embeddings,
            Duration::from_secs(config.embeddings.timeout_secs),
        )
        .await;
        let generator = AnswerGenerator::new(
            llm,
            Duration::from_secs(config.llm.timeout_secs),
            config.rag.context_documents,
        );

        Ok(Self::from_parts(store.len(), retriever, generator, config))
    }

    /// Assemble a service from prebuilt components
    pub fn from_parts(
        store_rows: usize,
        retriever: Retriever,
        generator: AnswerGenerator,
        config: &AppConfig,
    ) -> Self {
        info!(
            documents = retriever.documents().len(),
            retrieval = retriever.strategy_name(),
            llm = generator.has_llm(),
            "RAG service ready"
        );
        Self {
            store_rows,
            retriever,
            generator,
            tracker: PerformanceTracker::new(config.rag.baseline_query_secs),
            top_k: config.rag.top_k,
            user_count: config.rag.user_count,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `question`; failures are returned as `error` envelopes
    pub async fn query(&self, question: &str) -> ResponseEnvelope {
        let start = Instant::now();

        match self.try_query(question, start).await {
            Ok(envelope) => envelope,
            Err(e) => {
                let elapsed = start.elapsed();
                warn!(kind = e.kind(), "RAG query failed: {}", e);
                self.tracker.record(elapsed, false, None);

                let mut envelope = match e {
                    ChainRagError::NoDataAvailable => ResponseEnvelope::from_error(&e),
                    other => ResponseEnvelope::error(format!("Error processing query: {other}")),
                }
                .with_retrieval_suggestions();
                envelope.query_time = Some(elapsed.as_secs_f64());
                envelope
            }
        }
    }

    async fn try_query(&self, question: &str, start: Instant) -> Result<ResponseEnvelope> {
        if self.store_rows == 0 {
            return Err(ChainRagError::NoDataAvailable);
        }

        let results = self.retriever.search(question, self.top_k).await;
        let Some(top) = results.first().copied() else {
            let mut envelope = ResponseEnvelope::error(NO_RESULTS_MESSAGE).with_retrieval_suggestions();
            envelope.query_time = Some(start.elapsed().as_secs_f64());
            return Ok(envelope);
        };
        debug!(
            top = %top.document.id,
            score = top.score,
            match_type = ?top.match_type,
            results = results.len(),
            "Retrieved documents"
        );

        let answer = self.generator.generate(question, &results).await;
        let elapsed = start.elapsed();
        let accuracy = estimate_accuracy(top.score);

        let mut envelope = match top.document.kind {
            DocumentKind::BlockSummary => {
                let summary = BlockSummary::from_records(&top.document.records);
                ResponseEnvelope::block_data(answer, top.document.records.clone(), summary)
            }
            DocumentKind::Concept => ResponseEnvelope::new(ResponseKind::ConceptExplanation, answer),
        }
        .with_retrieval_suggestions();

        envelope.query_time = Some(elapsed.as_secs_f64());
        envelope.accuracy = Some(accuracy);
        self.tracker.record(elapsed, true, Some(accuracy));
        Ok(envelope)
    }

    pub fn performance_stats(&self) -> ServiceStats {
        ServiceStats {
            performance: self.tracker.stats(),
            user_count: self.user_count,
        }
    }
}
