use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use knowdb_core::config::LexicalSettings;
use knowdb_core::traits::TextIndexer;
use knowdb_core::types::{Chunk, LexicalHits, ScoredChunk, TenantId};

use crate::bm25::{Bm25Params, Bm25Stats, TokenizedDocument};
use crate::tokenize::tokenize;

/// Result count used by [`LexicalIndex::search_default`].
pub const DEFAULT_SEARCH_K: usize = 10;

/// Whether lexical scoring can run in this process. Resolved once when an
/// index (or the registry that creates indexes) is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexicalCapability {
    Available,
    Unavailable,
}

impl LexicalCapability {
    /// Available iff the `bm25` feature is compiled in and the settings
    /// enable it.
    pub fn resolve(settings: &LexicalSettings) -> Self {
        if cfg!(feature = "bm25") && settings.enabled { Self::Available } else { Self::Unavailable }
    }

    pub fn is_available(self) -> bool { self == Self::Available }
}

/// One immutable corpus snapshot. `chunks[i]` and `docs[i]` always describe
/// the same chunk.
#[derive(Default)]
struct IndexState {
    chunks: Vec<Chunk>,
    docs: Vec<Arc<TokenizedDocument>>,
    stats: Bm25Stats,
}

/// In-memory BM25 index over one tenant's chunks.
///
/// Writers are serialized by `write_gate` and publish a freshly built
/// snapshot; readers clone the current snapshot and never block on a rebuild
/// in progress.
pub struct LexicalIndex {
    tenant: TenantId,
    capability: LexicalCapability,
    params: Bm25Params,
    write_gate: Mutex<()>,
    state: RwLock<Arc<IndexState>>,
}

impl LexicalIndex {
    pub fn new(capability: LexicalCapability, params: Bm25Params) -> Self {
        Self::for_tenant(TenantId::Anonymous, capability, params)
    }

    pub fn with_settings(settings: &LexicalSettings) -> Self {
        Self::new(LexicalCapability::resolve(settings), Bm25Params::from(settings))
    }

    pub fn with_documents(chunks: &[Chunk], capability: LexicalCapability, params: Bm25Params) -> Self {
        let index = Self::new(capability, params);
        index.add_documents(chunks);
        index
    }

    pub(crate) fn for_tenant(tenant: TenantId, capability: LexicalCapability, params: Bm25Params) -> Self {
        Self {
            tenant,
            capability,
            params,
            write_gate: Mutex::new(()),
            state: RwLock::new(Arc::new(IndexState::default())),
        }
    }

    pub fn tenant(&self) -> &TenantId { &self.tenant }

    pub fn capability(&self) -> LexicalCapability { self.capability }

    pub fn params(&self) -> Bm25Params { self.params }

    pub fn len(&self) -> usize { self.snapshot().chunks.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Append `chunks` and rebuild statistics over the whole corpus.
    ///
    /// Identical content added twice is indexed twice.
    #[instrument(skip_all, fields(tenant = %self.tenant, added = chunks.len()))]
    pub fn add_documents(&self, chunks: &[Chunk]) {
        if !self.capability.is_available() {
            warn!(dropped = chunks.len(), "lexical scoring unavailable, skipping index update");
            return;
        }
        if chunks.is_empty() { return; }

        let _writer = self.write_gate.lock();
        let current = self.snapshot();
        let mut next_chunks = Vec::with_capacity(current.chunks.len() + chunks.len());
        next_chunks.extend(current.chunks.iter().cloned());
        let mut next_docs = Vec::with_capacity(next_chunks.capacity());
        next_docs.extend(current.docs.iter().cloned());
        for chunk in chunks {
            next_chunks.push(chunk.clone());
            next_docs.push(Arc::new(TokenizedDocument::new(chunk.content())));
        }

        let stats = Bm25Stats::build(&next_docs, self.params);
        let total = next_chunks.len();
        *self.state.write() = Arc::new(IndexState { chunks: next_chunks, docs: next_docs, stats });
        info!("lexical index updated: {} documents", total);
    }

    /// Up to `k` chunks containing at least one query term, best first.
    /// Equal scores keep insertion order.
    pub fn search(&self, query: &str, k: usize) -> Vec<ScoredChunk> { self.search_hits(query, k).hits }

    pub fn search_default(&self, query: &str) -> Vec<ScoredChunk> { self.search(query, DEFAULT_SEARCH_K) }

    /// Like [`search`](Self::search), also reporting the size of the snapshot
    /// that was scored. Both come from the same snapshot.
    #[instrument(skip_all, fields(tenant = %self.tenant, k = k))]
    pub fn search_hits(&self, query: &str, k: usize) -> LexicalHits {
        if !self.capability.is_available() { return LexicalHits::default(); }
        let snapshot = self.snapshot();
        let corpus_len = snapshot.chunks.len();
        let terms = tokenize(query);
        if corpus_len == 0 || k == 0 || terms.is_empty() {
            return LexicalHits { hits: Vec::new(), corpus_len };
        }

        let mut ranked: Vec<(usize, f64)> = snapshot
            .stats
            .score(&terms)
            .into_iter()
            .enumerate()
            .filter_map(|(doc, score)| score.map(|s| (doc, s)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        debug!("lexical search: {} hits over {} documents", ranked.len(), corpus_len);
        let hits = ranked
            .into_iter()
            .map(|(doc, score)| ScoredChunk { chunk: snapshot.chunks[doc].clone(), score: score as f32 })
            .collect();
        LexicalHits { hits, corpus_len }
    }

    pub fn clear(&self) {
        let _writer = self.write_gate.lock();
        *self.state.write() = Arc::new(IndexState::default());
        debug!(tenant = %self.tenant, "lexical index cleared");
    }

    /// Tokenized form of the chunk at `position`, in insertion order.
    pub fn tokenized(&self, position: usize) -> Option<Arc<TokenizedDocument>> {
        self.snapshot().docs.get(position).cloned()
    }

    fn snapshot(&self) -> Arc<IndexState> { Arc::clone(&self.state.read()) }
}

impl Default for LexicalIndex {
    fn default() -> Self { Self::with_settings(&LexicalSettings::default()) }
}

impl TextIndexer for LexicalIndex {
    fn add_documents(&self, chunks: &[Chunk]) { LexicalIndex::add_documents(self, chunks) }
    fn search_hits(&self, query: &str, k: usize) -> LexicalHits { LexicalIndex::search_hits(self, query, k) }
    fn is_available(&self) -> bool { self.capability.is_available() }
}
