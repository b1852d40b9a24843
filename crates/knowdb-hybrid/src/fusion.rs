//! Reciprocal Rank Fusion of a semantic ranking with a lexical ranking.
//!
//! RRF score = Σ weight_list / (rrf_constant + rank_list(d)), ranks from 1.
//! Only positions matter, so BM25 scores and embedding similarities never
//! need calibrating against each other.

use std::collections::HashMap;

use tracing::instrument;

use knowdb_core::config::RetrievalSettings;
use knowdb_core::error::{Error, Result};
use knowdb_core::types::{Chunk, ChunkKey, ScoredChunk, SourceKind};

pub const DEFAULT_RRF_CONSTANT: i64 = 60;

/// A fused document with its accumulated RRF score and the sources that
/// ranked it.
#[derive(Debug, Clone)]
pub struct FusedCandidate {
    pub chunk: Chunk,
    pub score: f64,
    pub sources: Vec<SourceKind>,
}

/// Validated fusion parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrfFuser {
    semantic_weight: f64,
    lexical_weight: f64,
    rrf_constant: f64,
}

impl RrfFuser {
    pub fn new(semantic_weight: f64, lexical_weight: f64, rrf_constant: i64) -> Result<Self> {
        if rrf_constant < 0 {
            return Err(Error::InvalidArgument(format!("rrf_constant must be >= 0, got {rrf_constant}")));
        }
        for (name, weight) in [("semantic_weight", semantic_weight), ("lexical_weight", lexical_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidArgument(format!("{name} must be a finite non-negative number, got {weight}")));
            }
        }
        Ok(Self { semantic_weight, lexical_weight, rrf_constant: rrf_constant as f64 })
    }

    pub fn from_settings(settings: &RetrievalSettings) -> Result<Self> {
        Self::new(settings.semantic_weight, settings.lexical_weight, settings.rrf_constant)
    }

    pub fn semantic_weight(&self) -> f64 { self.semantic_weight }

    pub fn lexical_weight(&self) -> f64 { self.lexical_weight }

    /// Top `k` chunks by fused score.
    pub fn fuse(&self, semantic_ranked: &[Chunk], lexical_ranked: &[ScoredChunk], k: usize) -> Vec<Chunk> {
        self.fuse_scored(semantic_ranked, lexical_ranked, k).into_iter().map(|c| c.chunk).collect()
    }

    /// Like [`fuse`](Self::fuse) but keeps scores and provenance.
    ///
    /// Documents are merged by [`ChunkKey`]; exact score ties keep the order
    /// in which documents were first seen (semantic list first).
    #[instrument(skip_all, fields(semantic = semantic_ranked.len(), lexical = lexical_ranked.len(), k = k))]
    pub fn fuse_scored(&self, semantic_ranked: &[Chunk], lexical_ranked: &[ScoredChunk], k: usize) -> Vec<FusedCandidate> {
        let mut fused: Vec<FusedCandidate> = Vec::with_capacity(semantic_ranked.len() + lexical_ranked.len());
        let mut slots: HashMap<ChunkKey, usize> = HashMap::with_capacity(fused.capacity());

        let semantic = semantic_ranked.iter().map(|c| (c, SourceKind::Vector, self.semantic_weight));
        let lexical = lexical_ranked.iter().map(|h| (&h.chunk, SourceKind::Text, self.lexical_weight));
        let mut accumulate = |rank: usize, (chunk, source, weight): (&Chunk, SourceKind, f64)| {
            let contribution = weight / (self.rrf_constant + rank as f64);
            let slot = *slots.entry(chunk.key()).or_insert_with(|| {
                fused.push(FusedCandidate { chunk: chunk.clone(), score: 0.0, sources: Vec::new() });
                fused.len() - 1
            });
            let candidate = &mut fused[slot];
            candidate.score += contribution;
            if !candidate.sources.contains(&source) { candidate.sources.push(source); }
        };
        for (i, item) in semantic.enumerate() { accumulate(i + 1, item); }
        for (i, item) in lexical.enumerate() { accumulate(i + 1, item); }

        fused.sort_by(|a, b| b.score.total_cmp(&a.score));
        fused.truncate(k);
        fused
    }
}

impl Default for RrfFuser {
    fn default() -> Self {
        let settings = RetrievalSettings::default();
        Self {
            semantic_weight: settings.semantic_weight,
            lexical_weight: settings.lexical_weight,
            rrf_constant: DEFAULT_RRF_CONSTANT as f64,
        }
    }
}

/// One-shot fusion with explicit parameters.
pub fn fuse(
    semantic_ranked: &[Chunk],
    lexical_ranked: &[ScoredChunk],
    k: usize,
    semantic_weight: f64,
    lexical_weight: f64,
    rrf_constant: i64,
) -> Result<Vec<Chunk>> {
    Ok(RrfFuser::new(semantic_weight, lexical_weight, rrf_constant)?.fuse(semantic_ranked, lexical_ranked, k))
}
