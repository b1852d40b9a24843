use std::sync::Arc;

use crate::types::{Chunk, LexicalHits, ScoredChunk};

/// Ranked semantic (embedding-similarity) search supplied by the host.
///
/// Returns chunks best-first. The retriever truncates the list itself, so an
/// implementation may return more than asked for. An `Err` means the search
/// did not happen; it must never be reported as an empty list.
pub trait SemanticRetriever: Send + Sync {
    fn invoke(&self, query: &str) -> anyhow::Result<Vec<Chunk>>;
}

impl<T: SemanticRetriever + ?Sized> SemanticRetriever for &T {
    fn invoke(&self, query: &str) -> anyhow::Result<Vec<Chunk>> { (**self).invoke(query) }
}

impl<T: SemanticRetriever + ?Sized> SemanticRetriever for Arc<T> {
    fn invoke(&self, query: &str) -> anyhow::Result<Vec<Chunk>> { (**self).invoke(query) }
}

impl<T: SemanticRetriever + ?Sized> SemanticRetriever for Box<T> {
    fn invoke(&self, query: &str) -> anyhow::Result<Vec<Chunk>> { (**self).invoke(query) }
}

/// Keyword index over chunks. Neither operation fails: an index that cannot
/// score degrades to a no-op writer and an empty reader.
pub trait TextIndexer: Send + Sync {
    fn add_documents(&self, chunks: &[Chunk]);

    /// Hits together with the corpus size of the snapshot they were scored
    /// against, so callers can tell an empty index from a miss.
    fn search_hits(&self, query: &str, k: usize) -> LexicalHits;

    fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> { self.search_hits(query, k).hits }

    /// `false` when scoring is compiled out or disabled.
    fn is_available(&self) -> bool { true }
}
