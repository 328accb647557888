use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::thread_rng;

use crate::errors::{QuizError, QuizResult};
use crate::models::domain::QuizSession;
use crate::repositories::{Chunk, KnowledgeStore};

/// Context handed to the question generator, plus the chunk ids it was
/// assembled from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampledContext {
    pub text: String,
    pub source_refs: Vec<String>,
}

/// Picks the slice of the knowledge base each quiz turn is grounded in.
/// Read-only over the store; per-session de-duplication state lives on
/// the session itself.
pub struct ContextSampler {
    store: Arc<dyn KnowledgeStore>,
}

impl ContextSampler {
    pub fn new(store: Arc<dyn KnowledgeStore>) -> Self {
        Self { store }
    }

    /// With a topic: the most relevant chunks for it. Without: a random
    /// chunk meeting the configured minimum length, concatenating
    /// further chunks when no single one is long enough. Repeating
    /// recently served chunks is avoided on a best-effort basis, never
    /// at the cost of returning nothing.
    pub async fn sample(
        &self,
        session: &mut QuizSession,
        topic: Option<&str>,
    ) -> QuizResult<SampledContext> {
        let pool = self
            .store
            .list_chunks(&session.config.selected_documents)
            .await?;
        if pool.is_empty() {
            return Err(QuizError::EmptyKnowledgeBase(
                "no indexed content for the selected documents; upload or select documents before starting a quiz"
                    .to_string(),
            ));
        }

        let picked = match topic {
            Some(topic) => {
                let hits = self.by_topic(session, topic).await?;
                if hits.is_empty() {
                    log::warn!(
                        "No chunks matched topic '{}', falling back to random sampling",
                        topic
                    );
                    random_chunks(session, &pool)
                } else {
                    hits
                }
            }
            None => random_chunks(session, &pool),
        };

        let source_refs: Vec<String> = picked.iter().map(|chunk| chunk.id.clone()).collect();
        session.mark_served(&source_refs);

        let text = picked
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        log::info!(
            "Sampled {} chunk(s), {} characters of context",
            source_refs.len(),
            text.len()
        );

        Ok(SampledContext { text, source_refs })
    }

    async fn by_topic(&self, session: &QuizSession, topic: &str) -> QuizResult<Vec<Chunk>> {
        let k = session.config.topic_chunks;
        // over-fetch so served chunks can be skipped without losing coverage
        let hits = self
            .store
            .query(&session.config.selected_documents, topic, k * 2)
            .await?;

        let fresh: Vec<Chunk> = hits
            .iter()
            .filter(|chunk| !session.was_served(&chunk.id))
            .take(k)
            .cloned()
            .collect();

        if !fresh.is_empty() {
            return Ok(fresh);
        }

        // every hit has been served at some point; still avoid handing
        // back the exact set the previous call returned when the hit
        // list offers anything else
        let unrepeated: Vec<Chunk> = hits
            .iter()
            .filter(|chunk| !session.last_served().contains(&chunk.id))
            .take(k)
            .cloned()
            .collect();
        if !unrepeated.is_empty() {
            return Ok(unrepeated);
        }

        Ok(hits.into_iter().take(k).collect())
    }
}

/// The minimum-length rule applies here only; topic retrieval returns
/// whatever the store ranks highest.
fn random_chunks(session: &QuizSession, pool: &[Chunk]) -> Vec<Chunk> {
    let min_length = session.config.min_context_length;
    let mut rng = thread_rng();

    let fresh: Vec<Chunk> = pool
        .iter()
        .filter(|chunk| !session.was_served(&chunk.id))
        .cloned()
        .collect();
    let unrepeated: Vec<Chunk> = pool
        .iter()
        .filter(|chunk| !session.last_served().contains(&chunk.id))
        .cloned()
        .collect();

    let mut candidates = if !fresh.is_empty() {
        fresh
    } else if !unrepeated.is_empty() {
        unrepeated
    } else {
        pool.to_vec()
    };

    let long_enough: Vec<Chunk> = candidates
        .iter()
        .filter(|chunk| chunk.text.len() >= min_length)
        .cloned()
        .collect();
    if let Some(chunk) = long_enough.choose(&mut rng) {
        return vec![chunk.clone()];
    }

    // no single chunk is long enough: concatenate until the minimum is
    // met or the candidates run out
    candidates.shuffle(&mut rng);
    let mut picked = Vec::new();
    let mut total = 0;
    for chunk in candidates {
        total += chunk.text.len();
        picked.push(chunk);
        if total >= min_length {
            break;
        }
    }
    picked
}
