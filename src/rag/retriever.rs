//! Dense and keyword retrieval over the document corpus

use std::time::Duration;

use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::embeddings::cosine_similarity;
use crate::embeddings::EmbeddingBackend;
use crate::errors::ChainRagError;
use crate::errors::Result;
use crate::rag::corpus::Document;
use crate::rag::MatchType;
use crate::rag::RetrievalResult;

/// How documents are scored; fixed when the retriever is built
#[derive(Debug)]
enum Strategy {
    Dense {
        backend: EmbeddingBackend,
        vectors: Vec<Vec<f32>>,
    },
    Keyword,
}

/// Ranks corpus documents against a query
#[derive(Debug)]
pub struct Retriever {
    documents: Vec<Document>,
    strategy: Strategy,
    timeout: Duration,
}

impl Retriever {
    /// Keyword-only retriever
    pub fn keyword(documents: Vec<Document>) -> Self {
        Self {
            documents,
            strategy: Strategy::Keyword,
            timeout: Duration::ZERO,
        }
    }

    /// Encode every document with `backend`; without a backend, or when
    /// indexing fails, the retriever uses keyword scoring for its lifetime.
    pub async fn build(
        documents: Vec<Document>,
        backend: Option<EmbeddingBackend>,
        timeout: Duration,
    ) -> Self {
        let Some(backend) = backend else {
            info!("No embedding backend configured, using keyword retrieval");
            return Self::keyword(documents);
        };

        match index_documents(&backend, &documents, timeout).await {
            Ok(vectors) => {
                info!(
                    "Generated {} embeddings with the {} backend",
                    vectors.len(),
                    backend.name()
                );
                Self {
                    documents,
                    strategy: Strategy::Dense { backend, vectors },
                    timeout,
                }
            }
            Err(e) => {
                warn!(kind = e.kind(), "Could not generate embeddings: {}", e);
                Self::keyword(documents)
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub const fn is_dense(&self) -> bool {
        matches!(self.strategy, Strategy::Dense { .. })
    }

    pub const fn strategy_name(&self) -> &'static str {
        match self.strategy {
            Strategy::Dense { .. } => "dense",
            Strategy::Keyword => "keyword",
        }
    }

    /// At most `k` results, best first; ties keep corpus order.
    /// Dense failures fall back to keyword scoring for this call.
    pub async fn search(&self, query: &str, k: usize) -> Vec<RetrievalResult<'_>> {
        match &self.strategy {
            Strategy::Keyword => self.keyword_search(query, k),
            Strategy::Dense { backend, vectors } => {
                match self.dense_search(backend, vectors, query, k).await {
                    Ok(results) => results,
                    Err(e) => {
                        warn!(kind = e.kind(), "Error in semantic search: {}", e);
                        self.keyword_search(query, k)
                    }
                }
            }
        }
    }

    async fn dense_search(
        &self,
        backend: &EmbeddingBackend,
        vectors: &[Vec<f32>],
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievalResult<'_>>> {
        debug!("Performing semantic search: {}", query);
        let query_vector = with_timeout(self.timeout, backend.encode(&[query]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChainRagError::EmbeddingError("empty query embedding".to_string()))?;

        let scored = self
            .documents
            .iter()
            .zip(vectors)
            .map(|(document, vector)| RetrievalResult {
                document,
                score: cosine_similarity(&query_vector, vector),
                match_type: MatchType::Semantic,
            })
            .collect();

        Ok(top_k(scored, k))
    }

    /// Score by occurrences of each whitespace-separated query word
    pub fn keyword_search(&self, query: &str, k: usize) -> Vec<RetrievalResult<'_>> {
        let query = query.to_lowercase();
        let words: Vec<&str> = query.split_whitespace().collect();

        let scored = self
            .documents
            .iter()
            .filter_map(|document| {
                let text = document.text.to_lowercase();
                let hits: usize = words.iter().map(|w| text.matches(w).count()).sum();
                (hits > 0).then(|| RetrievalResult {
                    document,
                    score: hits as f32,
                    match_type: MatchType::Keyword,
                })
            })
            .collect();

        top_k(scored, k)
    }
}

async fn index_documents(
    backend: &EmbeddingBackend,
    documents: &[Document],
    timeout: Duration,
) -> Result<Vec<Vec<f32>>> {
    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    let vectors = with_timeout(timeout, backend.encode(&texts)).await?;
    if vectors.len() != documents.len() {
        return Err(ChainRagError::EmbeddingError(format!(
            "expected {} embeddings, got {}",
            documents.len(),
            vectors.len()
        )));
    }
    Ok(vectors)
}

/// Zero means no limit
async fn with_timeout<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    if timeout.is_zero() {
        return fut.await;
    }
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        ChainRagError::EmbeddingError(format!("embedding timed out after {}s", timeout.as_secs()))
    })?
}

fn top_k(mut results: Vec<RetrievalResult<'_>>, k: usize) -> Vec<RetrievalResult<'_>> {
    // Stable: equal scores keep corpus order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(k);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::EmbeddingClient;
    use crate::embeddings::EmbeddingProvider;
    use crate::embeddings::HashedEmbedder;
    use crate::rag::corpus::DocumentKind;

    fn doc(id: &str, text: &str) -> Document {
        Document {
            id: id.to_string(),
            kind: DocumentKind::Concept,
            text: text.to_string(),
            block_index: None,
            records: Vec::new(),
        }
    }

    fn corpus() -> Vec<Document> {
        vec![
            doc("a", "The nonce is used in mining"),
            doc("b", "A hash is a fingerprint; hash functions are one way"),
            doc("c", "Senders and receivers exchange value"),
            doc("d", "Another hash note"),
        ]
    }

    #[test]
    fn test_keyword_scores_and_order() {
        let retriever = Retriever::keyword(corpus());
        let results = retriever.keyword_search("HASH", 3);
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, ["b", "d"]);
        assert_eq!(results[0].score, 2.0);
        assert_eq!(results[0].match_type, MatchType::Keyword);
    }

    #[test]
    fn test_keyword_no_match_is_empty() {
        let retriever = Retriever::keyword(corpus());
        assert!(retriever.keyword_search("zzz qqq", 3).is_empty());
    }

    #[test]
    fn test_keyword_ties_keep_corpus_order() {
        let retriever = Retriever::keyword(vec![doc("x", "block"), doc("y", "block"), doc("z", "block")]);
        let ids: Vec<&str> = retriever
            .keyword_search("block", 2)
            .iter()
            .map(|r| r.document.id.as_str())
            .collect();
        assert_eq!(ids, ["x", "y"]);
    }

    #[tokio::test]
    async fn test_dense_ranking_with_hashed_backend() {
        let backend = EmbeddingBackend::Hashed(HashedEmbedder::new(512));
        let retriever = Retriever::build(corpus(), Some(backend), Duration::from_secs(5)).await;
        assert!(retriever.is_dense());

        let results = retriever.search("nonce mining", 4).await;
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].document.id, "a");
        assert_eq!(results[0].match_type, MatchType::Semantic);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_unreachable_backend_falls_back_to_keyword() {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "m".to_string(),
            "http://127.0.0.1:9".to_string(),
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        let retriever = Retriever::build(
            corpus(),
            Some(EmbeddingBackend::Remote(client)),
            Duration::from_secs(5),
        )
        .await;
        assert!(!retriever.is_dense());
        assert_eq!(retriever.strategy_name(), "keyword");

        let results = retriever.search("nonce", 3).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "a");
    }

    /// Dense retriever indexed offline, then serving queries through `backend`
    fn indexed_then_served_by(backend: EmbeddingBackend, timeout: Duration) -> Retriever {
        let embedder = HashedEmbedder::new(64);
        let documents = corpus();
        let vectors = documents.iter().map(|d| embedder.embed(&d.text)).collect();
        Retriever {
            documents,
            strategy: Strategy::Dense { backend, vectors },
            timeout,
        }
    }

    fn remote(endpoint: String, client_timeout: Duration) -> EmbeddingBackend {
        let client = EmbeddingClient::new(
            EmbeddingProvider::Ollama,
            "m".to_string(),
            endpoint,
            None,
            client_timeout,
        )
        .unwrap();
        EmbeddingBackend::Remote(client)
    }

    #[tokio::test]
    async fn test_query_time_backend_error_uses_keyword_scores() {
        let backend = remote("http://127.0.0.1:9".to_string(), Duration::from_secs(2));
        let retriever = indexed_then_served_by(backend, Duration::from_secs(5));
        assert!(retriever.is_dense());

        let results = retriever.search("hash", 3).await;
        let ids: Vec<&str> = results.iter().map(|r| r.document.id.as_str()).collect();
        assert_eq!(ids, ["b", "d"]);
        assert_eq!(results[0].score, 2.0);
        assert!(results.iter().all(|r| r.match_type == MatchType::Keyword));
        assert!(retriever.is_dense());
    }

    #[tokio::test]
    async fn test_query_time_backend_timeout_uses_keyword_scores() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let backend = remote(format!("http://{addr}"), Duration::from_secs(30));
        let retriever = indexed_then_served_by(backend, Duration::from_millis(200));

        let results = retriever.search("nonce", 3).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document.id, "a");
        assert_eq!(results[0].match_type, MatchType::Keyword);

        server.abort();
    }
}
