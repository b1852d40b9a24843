//! Domain types shared by the lexical index, the fuser and the retriever.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Opaque per-chunk attributes supplied by the ingestion pipeline.
pub type Meta = HashMap<String, serde_json::Value>;

/// Version of the scheme used to derive [`ChunkKey`]s. Bump when the digest
/// input changes so keys from different schemes never compare equal.
pub const FINGERPRINT_VERSION: u8 = 1;

/// Stable content fingerprint: blake3 over `[FINGERPRINT_VERSION] ++ content`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey([u8; 32]);

impl ChunkKey {
    pub fn for_content(content: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[FINGERPRINT_VERSION]);
        hasher.update(content.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] { &self.0 }
}

impl fmt::Display for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 { write!(f, "{byte:02x}")?; }
        Ok(())
    }
}

impl fmt::Debug for ChunkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkKey({self})")
    }
}

impl Serialize for ChunkKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// An immutable unit of retrievable text.
///
/// - `content`: the text payload, shared so clones stay cheap
/// - `metadata`: opaque attributes carried through search untouched
/// - `key`: content fingerprint, computed once in [`Chunk::new`]
///
/// Two chunks with identical content share a key; fusion treats them as one
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ChunkRecord", into = "ChunkRecord")]
pub struct Chunk {
    key: ChunkKey,
    content: Arc<str>,
    metadata: Arc<Meta>,
}

impl Chunk {
    pub fn new(content: impl Into<String>, metadata: Meta) -> Self {
        let content: String = content.into();
        let key = ChunkKey::for_content(&content);
        Self { key, content: content.into(), metadata: Arc::new(metadata) }
    }

    pub fn from_text(content: impl Into<String>) -> Self { Self::new(content, Meta::new()) }

    pub fn key(&self) -> ChunkKey { self.key }

    pub fn content(&self) -> &str { &self.content }

    pub fn metadata(&self) -> &Meta { &self.metadata }
}

/// Wire shape of a [`Chunk`]; the key is re-derived on the way in.
#[derive(Serialize, Deserialize)]
struct ChunkRecord {
    content: String,
    #[serde(default)]
    metadata: Meta,
}

impl From<ChunkRecord> for Chunk {
    fn from(record: ChunkRecord) -> Self { Chunk::new(record.content, record.metadata) }
}

impl From<Chunk> for ChunkRecord {
    fn from(chunk: Chunk) -> Self {
        Self { content: chunk.content.to_string(), metadata: (*chunk.metadata).clone() }
    }
}

/// Isolation boundary for lexical indexes. `Anonymous` is the key used when
/// the caller supplies no tenant; a named tenant never aliases it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TenantId {
    #[default]
    Anonymous,
    Named(String),
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self { TenantId::Named(id.to_string()) }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self { TenantId::Named(id) }
}

impl<T: Into<TenantId>> From<Option<T>> for TenantId {
    fn from(id: Option<T>) -> Self { id.map_or(TenantId::Anonymous, Into::into) }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantId::Anonymous => f.write_str("<anonymous>"),
            TenantId::Named(id) => f.write_str(id),
        }
    }
}

/// Indicates which engine produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Vector,
    Text,
}

/// A chunk paired with an engine-specific score (higher is better).
///
/// Lexical and semantic scores live in different spaces and are only ever
/// combined through rank fusion.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Result of one lexical search.
#[derive(Debug, Clone, Default)]
pub struct LexicalHits {
    pub hits: Vec<ScoredChunk>,
    /// Chunks in the snapshot the hits came from.
    pub corpus_len: usize,
}
