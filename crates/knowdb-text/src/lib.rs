//! knowdb-text
//!
//! In-memory BM25 keyword search: the tokenizer, corpus statistics, the
//! per-tenant [`LexicalIndex`] and the [`IndexRegistry`] that owns them.

pub mod bm25;
pub mod index;
pub mod registry;
pub mod tokenize;

pub use bm25::{Bm25Params, TokenizedDocument};
pub use index::{LexicalCapability, LexicalIndex, DEFAULT_SEARCH_K};
pub use registry::IndexRegistry;
pub use tokenize::tokenize;
