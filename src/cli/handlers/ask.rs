//! One-shot question handler

use std::sync::Arc;

use crate::cli::output::print_envelope;
use crate::knowledge::KnowledgeBase;
use crate::query::EntityExtractor;
use crate::query::QueryDispatcher;
use crate::query::ResponseEnvelope;
use crate::rag::RagService;
use crate::store::TransactionStore;
use crate::AppConfig;
use crate::Result;

/// Answer `question` with the dispatcher, or the RAG pipeline when `rag` is set
pub async fn answer_question(
    config: &AppConfig,
    store: Arc<TransactionStore>,
    question: &str,
    rag: bool,
) -> Result<ResponseEnvelope> {
    let knowledge_base = KnowledgeBase::builtin();
    if rag {
        let service = RagService::new(config, store, &knowledge_base).await?;
        Ok(service.query(question).await)
    } else {
        let dispatcher = QueryDispatcher::new(store, EntityExtractor::new(knowledge_base));
        Ok(dispatcher.process(question))
    }
}

pub async fn handle_ask_command(
    config: &AppConfig,
    store: Arc<TransactionStore>,
    question: &str,
    rag: bool,
    json: bool,
) -> Result<()> {
    let envelope = answer_question(config, store, question, rag).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_envelope(&envelope);
    }
    Ok(())
}
