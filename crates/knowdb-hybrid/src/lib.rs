//! knowdb-hybrid
//!
//! Fuses a host-supplied semantic ranking with the tenant's BM25 ranking
//! using Reciprocal Rank Fusion. See [`HybridSearchEngine`] for the
//! tenant-aware entry point.

pub mod engine;
pub mod fusion;
pub mod retriever;

pub use engine::HybridSearchEngine;
pub use fusion::{fuse, FusedCandidate, RrfFuser, DEFAULT_RRF_CONSTANT};
pub use retriever::{FallbackReason, HybridRetriever, Retrieval, RetrievalMode, DEFAULT_RETRIEVE_K};
