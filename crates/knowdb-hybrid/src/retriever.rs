use std::sync::Arc;

use tracing::{debug, instrument};

use knowdb_core::config::RetrievalSettings;
use knowdb_core::error::{Error, Result};
use knowdb_core::traits::{SemanticRetriever, TextIndexer};
use knowdb_core::types::{Chunk, LexicalHits};
use knowdb_text::LexicalIndex;

use crate::fusion::RrfFuser;

/// Result count used by [`HybridRetriever::relevant_documents`].
pub const DEFAULT_RETRIEVE_K: usize = 5;

/// Why a retrieval skipped fusion and returned the semantic ranking as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    LexicalUnavailable,
    EmptyIndex,
    NoLexicalMatches,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    Fused,
    SemanticOnly(FallbackReason),
}

/// Chunks returned by a retrieval together with how they were produced.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub chunks: Vec<Chunk>,
    pub mode: RetrievalMode,
}

/// Runs one query against a semantic collaborator and a tenant's lexical
/// index, oversampling both and fusing the two rankings with RRF.
pub struct HybridRetriever<S, T = LexicalIndex> {
    semantic: S,
    lexical: Arc<T>,
    fuser: RrfFuser,
    fetch_multiplier: usize,
}

impl<S, T> HybridRetriever<S, T>
where
    S: SemanticRetriever,
    T: TextIndexer,
{
    pub fn new(semantic: S, lexical: Arc<T>, settings: &RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self::from_parts(semantic, lexical, RrfFuser::from_settings(settings)?, settings.fetch_multiplier))
    }

    pub fn with_fuser(semantic: S, lexical: Arc<T>, fuser: RrfFuser) -> Self {
        Self::from_parts(semantic, lexical, fuser, RetrievalSettings::default().fetch_multiplier)
    }

    pub(crate) fn from_parts(semantic: S, lexical: Arc<T>, fuser: RrfFuser, fetch_multiplier: usize) -> Self {
        Self { semantic, lexical, fuser, fetch_multiplier }
    }

    pub fn fuser(&self) -> &RrfFuser { &self.fuser }

    pub fn retrieve(&self, query: &str, k: usize) -> Result<Vec<Chunk>> {
        self.retrieve_detailed(query, k).map(|r| r.chunks)
    }

    pub fn relevant_documents(&self, query: &str) -> Result<Vec<Chunk>> {
        self.retrieve(query, DEFAULT_RETRIEVE_K)
    }

    /// Fetch `fetch_multiplier * k` candidates from each source and fuse them.
    ///
    /// A semantic failure is returned as [`Error::SemanticRetrieval`] without
    /// touching the lexical index. When the lexical side yields nothing the
    /// first `k` semantic results are returned unchanged.
    #[instrument(skip_all, fields(k = k))]
    pub fn retrieve_detailed(&self, query: &str, k: usize) -> Result<Retrieval> {
        if k == 0 {
            return Err(Error::InvalidArgument("k must be greater than 0".to_string()));
        }
        let fetch_k = k.saturating_mul(self.fetch_multiplier);

        let mut semantic = self.semantic.invoke(query).map_err(Error::SemanticRetrieval)?;
        semantic.truncate(fetch_k);

        let LexicalHits { hits: lexical, corpus_len } = self.lexical.search_hits(query, fetch_k);
        if lexical.is_empty() {
            let reason = if !self.lexical.is_available() {
                FallbackReason::LexicalUnavailable
            } else if corpus_len == 0 {
                FallbackReason::EmptyIndex
            } else {
                FallbackReason::NoLexicalMatches
            };
            debug!(?reason, semantic = semantic.len(), "no lexical candidates, returning semantic ranking");
            semantic.truncate(k);
            return Ok(Retrieval { chunks: semantic, mode: RetrievalMode::SemanticOnly(reason) });
        }

        debug!(semantic = semantic.len(), lexical = lexical.len(), "fusing rankings");
        let chunks = self.fuser.fuse(&semantic, &lexical, k);
        Ok(Retrieval { chunks, mode: RetrievalMode::Fused })
    }
}
