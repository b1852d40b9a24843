use std::sync::Arc;

use tracing::instrument;

use knowdb_core::config::{Config, RetrievalSettings};
use knowdb_core::error::Result;
use knowdb_core::traits::SemanticRetriever;
use knowdb_core::types::{Chunk, TenantId};
use knowdb_text::{IndexRegistry, LexicalCapability};

use crate::fusion::RrfFuser;
use crate::retriever::HybridRetriever;

/// Tenant-aware entry point: routes ingested chunks to the tenant's lexical
/// index and answers queries through a [`HybridRetriever`] bound to it.
///
/// Construct once at service start and share by reference or `Arc`.
pub struct HybridSearchEngine {
    registry: Arc<IndexRegistry>,
    settings: RetrievalSettings,
    fuser: RrfFuser,
}

impl HybridSearchEngine {
    pub fn new(settings: RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        let registry = Arc::new(IndexRegistry::new(&settings.lexical));
        Self::with_registry(registry, settings)
    }

    pub fn from_config(config: &Config) -> Result<Self> { Self::new(config.retrieval()?) }

    /// Share an existing registry, e.g. one also fed by an ingestion worker.
    pub fn with_registry(registry: Arc<IndexRegistry>, settings: RetrievalSettings) -> Result<Self> {
        settings.validate()?;
        let fuser = RrfFuser::from_settings(&settings)?;
        Ok(Self { registry, settings, fuser })
    }

    pub fn registry(&self) -> &Arc<IndexRegistry> { &self.registry }

    pub fn settings(&self) -> &RetrievalSettings { &self.settings }

    pub fn capability(&self) -> LexicalCapability { self.registry.capability() }

    /// Append `chunks` to the tenant's lexical index, creating it if needed.
    #[instrument(skip_all, fields(chunks = chunks.len()))]
    pub fn update_index(&self, tenant: impl Into<TenantId>, chunks: &[Chunk]) {
        self.registry.update_index(tenant, chunks);
    }

    /// A retriever over `tenant`'s index using the engine's fusion settings.
    pub fn retriever<S: SemanticRetriever>(&self, tenant: impl Into<TenantId>, semantic: S) -> HybridRetriever<S> {
        HybridRetriever::from_parts(semantic, self.registry.get_index(tenant), self.fuser, self.settings.fetch_multiplier)
    }

    pub fn retrieve<S: SemanticRetriever + ?Sized>(
        &self,
        tenant: impl Into<TenantId>,
        semantic: &S,
        query: &str,
        k: usize,
    ) -> Result<Vec<Chunk>> {
        self.retriever(tenant, semantic).retrieve(query, k)
    }
}

impl Default for HybridSearchEngine {
    fn default() -> Self {
        let settings = RetrievalSettings::default();
        Self {
            registry: Arc::new(IndexRegistry::new(&settings.lexical)),
            settings,
            fuser: RrfFuser::default(),
        }
    }
}
