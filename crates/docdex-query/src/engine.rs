//! Retrieval engine: single-query and multi-topic search.

use docdex_core::{similarity_from_distance, Error, Result, RetrievedDocument};
use docdex_embed::EmbedderPool;
use docdex_index::IndexState;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

use crate::fuzzy::closest_matches;

/// Similarity assigned to fuzzy file-name matches.
const NAME_MATCH_SIMILARITY: f32 = 0.9;
/// Similarity assigned to fuzzy content-prefix matches.
const CONTENT_MATCH_SIMILARITY: f32 = 0.85;
/// How much of each unit's text the content shortcut compares against.
const CONTENT_PREFIX_CHARS: usize = 200;
/// At most this many fuzzy candidates per topic.
const MAX_FUZZY_MATCHES: usize = 3;

/// Leading phrases carrying no retrieval signal, stripped before topic
/// decomposition. Matched against the lowercased query.
const FILLER_PREFIXES: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "please",
    "can you",
    "could you",
    "tell me about",
    "what about",
    "i want to know about",
];

/// Tunables for the retrieval engine.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Neighbors fetched per vector search
    pub k: usize,
    /// Minimum similarity for vector hits
    pub threshold: f32,
    /// Minimum normalized edit similarity for fuzzy shortcuts
    pub cutoff: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            k: 3,
            threshold: 0.5,
            cutoff: 0.6,
        }
    }
}

/// Executes queries against the shared index state.
pub struct RetrievalEngine {
    state: Arc<IndexState>,
    embedder: Arc<EmbedderPool>,
    config: RetrievalConfig,
}

impl RetrievalEngine {
    pub fn new(
        state: Arc<IndexState>,
        embedder: Arc<EmbedderPool>,
        config: RetrievalConfig,
    ) -> Self {
        Self {
            state,
            embedder,
            config,
        }
    }

    /// Vector retrieval: the `k` nearest units scoring at least
    /// `threshold`, best first.
    ///
    /// An empty index yields an empty result; an embedding failure
    /// propagates.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<RetrievedDocument>> {
        if self.state.is_empty().await {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedder
            .embed_query(query)
            .await
            .map_err(Error::Embedding)?;

        let hits = self.state.search(&query_vector, k).await?;
        debug!(query, hits = hits.len(), "vector search complete");

        let mut results: Vec<RetrievedDocument> = hits
            .into_iter()
            .map(|(distance, document_name, text)| RetrievedDocument {
                document_name,
                text,
                similarity: similarity_from_distance(distance),
            })
            .filter(|r| r.similarity >= threshold)
            .collect();

        results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(results)
    }

    /// Multi-topic retrieval with name and content shortcuts.
    ///
    /// The query is lowercased, stripped of filler prefixes, and split
    /// into sub-topics on commas and `" and "`. Each topic tries, in
    /// order: exact name substring (similarity 1.0), fuzzy name match
    /// (0.9), fuzzy match over the first 200 content characters (0.85),
    /// and finally vector retrieval. Results accumulate across topics
    /// with first-wins dedup by document name.
    pub async fn multi_topic_search(&self, query: &str) -> Result<Vec<RetrievedDocument>> {
        let lowered = query.to_lowercase();
        let cleaned = strip_filler(&lowered);
        let topics = split_topics(cleaned);
        debug!(?topics, "decomposed query");

        let units = self.state.all_units().await;
        let lower_names: Vec<String> = units.iter().map(|(n, _)| n.to_lowercase()).collect();
        let content_prefixes: Vec<String> = units
            .iter()
            .map(|(_, t)| t.to_lowercase().chars().take(CONTENT_PREFIX_CHARS).collect())
            .collect();

        let mut results = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for topic in &topics {
            let mut matched: Vec<RetrievedDocument> = units
                .iter()
                .zip(lower_names.iter())
                .filter(|(_, lower)| lower.contains(topic.as_str()))
                .map(|((name, text), _)| RetrievedDocument {
                    document_name: name.clone(),
                    text: text.clone(),
                    similarity: 1.0,
                })
                .collect();

            if matched.is_empty() {
                let close: HashSet<&str> = closest_matches(
                    topic,
                    lower_names.iter().map(String::as_str),
                    MAX_FUZZY_MATCHES,
                    self.config.cutoff,
                )
                .into_iter()
                .collect();

                matched = units
                    .iter()
                    .zip(lower_names.iter())
                    .filter(|(_, lower)| close.contains(lower.as_str()))
                    .map(|((name, text), _)| RetrievedDocument {
                        document_name: name.clone(),
                        text: text.clone(),
                        similarity: NAME_MATCH_SIMILARITY,
                    })
                    .collect();
            }

            if matched.is_empty() {
                let close: HashSet<&str> = closest_matches(
                    topic,
                    content_prefixes.iter().map(String::as_str),
                    MAX_FUZZY_MATCHES,
                    self.config.cutoff,
                )
                .into_iter()
                .collect();

                matched = units
                    .iter()
                    .zip(content_prefixes.iter())
                    .filter(|(_, prefix)| close.contains(prefix.as_str()))
                    .map(|((name, text), _)| RetrievedDocument {
                        document_name: name.clone(),
                        text: text.clone(),
                        similarity: CONTENT_MATCH_SIMILARITY,
                    })
                    .collect();
            }

            if matched.is_empty() {
                matched = self
                    .retrieve(topic, self.config.k, self.config.threshold)
                    .await?;
            }

            for r in matched {
                if seen.insert(r.document_name.clone()) {
                    results.push(r);
                }
            }
        }

        Ok(results)
    }
}

/// Strip leading filler phrases from an already-lowercased query.
fn strip_filler(query: &str) -> &str {
    let mut s = query.trim();
    loop {
        let mut stripped = false;
        for prefix in FILLER_PREFIXES {
            if let Some(rest) = s.strip_prefix(prefix) {
                if rest.is_empty() || rest.starts_with([' ', ',']) {
                    s = rest.trim_start_matches([' ', ',']).trim_start();
                    stripped = true;
                }
            }
        }
        if !stripped {
            return s;
        }
    }
}

/// Split a cleaned query into sub-topics on commas and `" and "`.
fn split_topics(cleaned: &str) -> Vec<String> {
    cleaned
        .replace(',', " and ")
        .split(" and ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}
