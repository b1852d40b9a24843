//! Tenant-scoped cache of lexical indexes.
//!
//! The registry is an owned value constructed once by the host and shared by
//! handle. Its map lock only covers lookup and insertion; index updates run
//! after it is released, so one tenant's rebuild never stalls another's.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use knowdb_core::config::LexicalSettings;
use knowdb_core::types::{Chunk, TenantId};

use crate::bm25::Bm25Params;
use crate::index::{LexicalCapability, LexicalIndex};

pub struct IndexRegistry {
    capability: LexicalCapability,
    params: Bm25Params,
    indexes: RwLock<HashMap<TenantId, Arc<LexicalIndex>>>,
}

impl IndexRegistry {
    pub fn new(settings: &LexicalSettings) -> Self {
        Self::with_capability(LexicalCapability::resolve(settings), Bm25Params::from(settings))
    }

    pub fn with_capability(capability: LexicalCapability, params: Bm25Params) -> Self {
        debug!(?capability, "index registry created");
        Self { capability, params, indexes: RwLock::new(HashMap::new()) }
    }

    pub fn capability(&self) -> LexicalCapability { self.capability }

    /// The tenant's index, created empty on first access. Repeated calls for
    /// the same tenant return the same instance.
    pub fn get_index(&self, tenant: impl Into<TenantId>) -> Arc<LexicalIndex> {
        let tenant = tenant.into();
        if let Some(index) = self.indexes.read().get(&tenant) {
            return Arc::clone(index);
        }
        let mut indexes = self.indexes.write();
        let index = indexes.entry(tenant).or_insert_with_key(|tenant| {
            debug!(%tenant, "creating lexical index");
            Arc::new(LexicalIndex::for_tenant(tenant.clone(), self.capability, self.params))
        });
        Arc::clone(index)
    }

    pub fn update_index(&self, tenant: impl Into<TenantId>, chunks: &[Chunk]) {
        self.get_index(tenant).add_documents(chunks);
    }

    /// Drop a tenant's index. Handles already given out keep working on the
    /// detached instance.
    pub fn remove(&self, tenant: &TenantId) -> Option<Arc<LexicalIndex>> {
        self.indexes.write().remove(tenant)
    }

    pub fn reset(&self) {
        self.indexes.write().clear();
    }

    pub fn tenants(&self) -> Vec<TenantId> {
        let mut tenants: Vec<TenantId> = self.indexes.read().keys().cloned().collect();
        tenants.sort();
        tenants
    }

    pub fn len(&self) -> usize { self.indexes.read().len() }

    pub fn is_empty(&self) -> bool { self.indexes.read().is_empty() }
}

impl Default for IndexRegistry {
    fn default() -> Self { Self::new(&LexicalSettings::default()) }
}
