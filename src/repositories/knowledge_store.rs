use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::errors::QuizResult;

/// One retrievable span of indexed document text. `id` is what ends up
/// in a question's `source_refs`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub text: String,
}

/// Read-side of whatever indexes the host's documents. Vector-store
/// backed in production; the in-memory implementation below covers
/// hosts and tests without one.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Chunks most relevant to `topic`, best first, restricted to
    /// `documents` (empty slice means no restriction matches nothing
    /// useful, callers handle that). Returns at most `k` chunks.
    async fn query(&self, documents: &[String], topic: &str, k: usize) -> QuizResult<Vec<Chunk>>;

    /// Every indexed chunk for the given documents, in insertion order.
    async fn list_chunks(&self, documents: &[String]) -> QuizResult<Vec<Chunk>>;
}

/// Naive term-overlap store. Relevance is the count of topic terms a
/// chunk contains, which is enough for tests and small corpora.
#[derive(Default)]
pub struct InMemoryKnowledgeStore {
    chunks: RwLock<Vec<Chunk>>,
}

impl InMemoryKnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Splits `text` on blank lines and indexes each paragraph as a
    /// chunk of `document_id`. Returns the new chunk ids.
    pub async fn add_document(&self, document_id: &str, text: &str) -> Vec<String> {
        let mut chunks = self.chunks.write().await;
        let mut sequence = chunks
            .iter()
            .filter(|chunk| chunk.document_id == document_id)
            .count();

        let mut added = Vec::new();
        for paragraph in text.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() {
                continue;
            }

            let id = format!("{}#{}", document_id, sequence);
            sequence += 1;
            added.push(id.clone());
            chunks.push(Chunk {
                id,
                document_id: document_id.to_string(),
                text: paragraph.to_string(),
            });
        }

        log::info!(
            "Indexed {} chunks for document '{}'",
            added.len(),
            document_id
        );
        added
    }

    pub async fn chunk_count(&self) -> usize {
        self.chunks.read().await.len()
    }
}

fn matches_selection(chunk: &Chunk, documents: &[String]) -> bool {
    documents.iter().any(|doc| doc == &chunk.document_id)
}

#[async_trait]
impl KnowledgeStore for InMemoryKnowledgeStore {
    async fn query(&self, documents: &[String], topic: &str, k: usize) -> QuizResult<Vec<Chunk>> {
        let chunks = self.chunks.read().await;
        let terms: Vec<String> = topic
            .to_lowercase()
            .split_whitespace()
            .map(|term| term.to_string())
            .collect();

        let mut scored: Vec<(usize, &Chunk)> = chunks
            .iter()
            .filter(|chunk| matches_selection(chunk, documents))
            .filter_map(|chunk| {
                let haystack = chunk.text.to_lowercase();
                let score = terms.iter().filter(|term| haystack.contains(*term)).count();
                (score > 0).then_some((score, chunk))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(_, chunk)| chunk.clone())
            .collect())
    }

    async fn list_chunks(&self, documents: &[String]) -> QuizResult<Vec<Chunk>> {
        let chunks = self.chunks.read().await;
        Ok(chunks
            .iter()
            .filter(|chunk| matches_selection(chunk, documents))
            .cloned()
            .collect())
    }
}
