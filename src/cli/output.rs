//! CLI output formatting utilities

use crate::analytics::DatasetStats;
use crate::models::format_currency;
use crate::query::ResponseEnvelope;
use crate::AppConfig;

/// Truncate at a character boundary, appending "..." when shortened
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}...")
    } else {
        s.to_string()
    }
}

/// Hide all but the last four characters of a secret
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count == 0 {
        return "(not set)".to_string();
    }
    if count <= 4 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

pub fn print_envelope(envelope: &ResponseEnvelope) {
    let kind = serde_json::to_value(envelope.kind)
        .ok()
        .and_then(|v| v.as_str().map(ToString::to_string))
        .unwrap_or_default();
    println!("[{kind}] {}", envelope.response_text);

    if let Some(summary) = &envelope.summary {
        println!();
        println!("  Transactions:     {}", summary.transaction_count);
        println!("  Total amount:     {}", format_currency(summary.total_amount));
        println!("  Unique senders:   {}", summary.unique_senders);
        println!("  Unique receivers: {}", summary.unique_receivers);
    }

    if let Some(rows) = &envelope.data {
        println!();
        for row in rows {
            println!(
                "  {} | {} -> {} | {}",
                truncate_str(&row.transaction_id, 12),
                truncate_str(&row.sender, 10),
                truncate_str(&row.receiver, 10),
                format_currency(row.amount)
            );
        }
    }

    if !envelope.attributes.is_empty() {
        println!();
        println!("  Attributes: {}", envelope.attributes.join(", "));
    }
    for example in &envelope.examples {
        println!("  e.g. {example}");
    }

    if let (Some(time), Some(accuracy)) = (envelope.query_time, envelope.accuracy) {
        println!();
        println!("  Answered in {time:.3}s (estimated accuracy {:.0}%)", accuracy * 100.0);
    }

    if !envelope.suggestions.is_empty() {
        println!();
        println!("Try asking:");
        for suggestion in &envelope.suggestions {
            println!("  - {suggestion}");
        }
    }
}

pub fn print_statistics(stats: &DatasetStats) {
    println!("Dataset statistics");
    println!("==================");
    println!("  Blocks:               {}", stats.total_blocks);
    println!("  Transactions:         {}", stats.total_transactions);
    println!("  Unique senders:       {}", stats.unique_senders);
    println!("  Unique receivers:     {}", stats.unique_receivers);
    println!("  Total volume:         {}", format_currency(stats.total_volume));
    println!("  Average transaction:  {}", format_currency(stats.average_transaction));
    println!("  Largest transaction:  {}", format_currency(stats.max_transaction));
    println!("  Smallest transaction: {}", format_currency(stats.min_transaction));
}

pub fn print_config(config: &AppConfig) {
    println!("chainrag configuration:");
    println!();

    println!("Data:");
    println!("  File: {}", config.data_file());
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!("  Backtrace: {}", config.logging.backtrace);
    println!();

    println!("Server:");
    println!("  Bind: {}", config.bind_address());
    println!("  CORS: {}", config.server.cors);
    println!();

    println!("Embeddings:");
    println!("  Enabled: {}", config.embeddings_enabled());
    println!("  Provider: {}", config.embeddings.provider);
    println!("  Endpoint: {}", config.embeddings.endpoint);
    println!("  Model: {}", config.embeddings.model);
    println!("  Dimension: {}", config.embeddings.dimension);
    println!();

    println!("LLM:");
    println!("  Enabled: {}", config.llm_enabled());
    println!("  Provider: {}", config.llm.provider);
    println!("  Endpoint: {}", config.llm.llm_endpoint);
    println!("  Model: {}", config.llm.llm_model);
    println!("  Key: {}", mask_secret(&config.llm.llm_key));
    println!();

    println!("RAG:");
    println!("  Top k: {}", config.rag.top_k);
    println!("  Context documents: {}", config.rag.context_documents);
    println!("  Baseline query time: {}s", config.rag.baseline_query_secs);
}

pub fn print_info(msg: &str) {
    println!("ℹ️  {msg}");
}

pub fn print_success(msg: &str) {
    println!("✅ {msg}");
}

pub fn print_warning(msg: &str) {
    println!("⚠️  {msg}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("abcdef", 3), "abc...");
        assert_eq!(truncate_str("héllo", 10), "héllo");
        assert_eq!(truncate_str("🔗🔗🔗", 2), "🔗🔗...");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "(not set)");
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret("sk-123456"), "****3456");
    }
}
