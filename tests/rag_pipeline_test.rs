mod common;

use chainrag::config::AppConfig;
use chainrag::knowledge::KnowledgeBase;
use chainrag::query::ResponseKind;
use chainrag::rag::RagService;

const UNREACHABLE: &str = "http://127.0.0.1:9";

async fn service(config: &AppConfig) -> RagService {
    RagService::new(config, common::sample_store(), &KnowledgeBase::builtin())
        .await
        .unwrap()
}

fn hashed_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.embeddings.enabled = true;
    config.embeddings.provider = "hashed".to_string();
    config.embeddings.dimension = 512;
    config
}

#[tokio::test]
async fn test_keyword_pipeline_answers_block_questions() {
    let svc = service(&AppConfig::default()).await;
    assert!(!svc.retriever().is_dense());

    let envelope = svc.query("total amount block abc12345").await;
    assert_eq!(envelope.kind, ResponseKind::BlockData);
    assert!(envelope
        .response_text
        .starts_with("Block 1 has a total transaction volume of $30.00. Block 1 contains 2 transaction(s)"));
    assert_eq!(envelope.summary.unwrap().transaction_count, 2);
    assert_eq!(envelope.data.unwrap().len(), 2);
    assert_eq!(envelope.accuracy, Some(0.95));

    let envelope = svc.query("transfers from abc12345 block").await;
    assert!(envelope.response_text.starts_with("Here's information about Block 1"));
    assert!(envelope
        .suggestions
        .contains(&"What is the nonce of block 5?".to_string()));
}

#[tokio::test]
async fn test_dense_pipeline_with_local_embeddings() {
    let svc = service(&hashed_config()).await;
    assert!(svc.retriever().is_dense());

    let envelope = svc.query("nonce mining valid block hashes").await;
    assert_eq!(envelope.kind, ResponseKind::ConceptExplanation);
    assert!(envelope.response_text.starts_with("A nonce is"));
}

#[tokio::test]
async fn test_unreachable_embedding_backend_degrades_to_keywords() {
    let mut config = AppConfig::default();
    config.embeddings.enabled = true;
    config.embeddings.provider = "openai".to_string();
    config.embeddings.endpoint = UNREACHABLE.to_string();
    config.embeddings.timeout_secs = 2;

    let svc = service(&config).await;
    assert_eq!(svc.retriever().strategy_name(), "keyword");

    let envelope = svc.query("mining nonce").await;
    assert_eq!(envelope.kind, ResponseKind::ConceptExplanation);
}

#[tokio::test]
async fn test_generative_backend_output_is_returned() {
    let mut config = AppConfig::default();
    config.llm.enabled = true;
    config.llm.provider = "dummy".to_string();

    let svc = service(&config).await;
    let envelope = svc.query("mining nonce").await;
    assert!(envelope.response_text.starts_with("[echo] "));
    assert!(envelope.response_text.contains("User Question: mining nonce"));
}

#[tokio::test]
async fn test_failing_generative_backend_uses_template() {
    let mut config = AppConfig::default();
    config.llm.enabled = true;
    config.llm.llm_endpoint = UNREACHABLE.to_string();
    config.llm.llm_key = "sk-test".to_string();
    config.llm.timeout_secs = 2;

    let svc = service(&config).await;
    let envelope = svc.query("mining nonce").await;
    assert_eq!(envelope.kind, ResponseKind::ConceptExplanation);
    assert_eq!(
        envelope.response_text,
        KnowledgeBase::builtin().get("nonce").unwrap().document
    );
}

#[tokio::test]
async fn test_search_returns_at_most_k_sorted_results() {
    for config in [AppConfig::default(), hashed_config()] {
        let svc = service(&config).await;
        for query in ["block", "hash of block 2", "sender receiver amount", "zzzz"] {
            for k in [1, 3, 20] {
                let results = svc.retriever().search(query, k).await;
                assert!(results.len() <= k);
                assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
            }
        }
    }
}

#[tokio::test]
async fn test_performance_stats_accumulate() {
    let svc = service(&AppConfig::default()).await;
    let initial = svc.performance_stats();
    assert_eq!(initial.performance.total_queries, 0);
    assert_eq!(initial.performance.accuracy, 92.0);

    svc.query("mining nonce").await;
    svc.query("total amount block abc12345").await;

    let stats = svc.performance_stats();
    assert_eq!(stats.performance.total_queries, 2);
    assert_eq!(stats.performance.successful_queries, 2);
    assert!((stats.performance.success_rate - 100.0).abs() < 1e-9);
    assert!(stats.performance.time_reduction > 0.0);
    assert_eq!(stats.user_count, 150);

    let json = serde_json::to_value(stats).unwrap();
    assert_eq!(json["total_queries"], 2);
    assert_eq!(json["user_count"], 150);
}
