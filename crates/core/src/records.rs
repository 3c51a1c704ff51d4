//! Generic per-service record operations.
//!
//! These are the direct by-id CRUD operations that sit beside the guided
//! flow: listing a collection, reading, replacing, and deleting a single
//! document. They enforce only one invariant — the service must be a catalog
//! key — and otherwise operate straight on the store.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::ServiceCatalog;
use crate::config::CoreConfig;
use crate::error::{RecordError, RecordResult};
use crate::id::DocumentId;
use crate::store::{FsDocumentStore, StoredRecord};

#[derive(Clone, Debug)]
pub struct RecordService {
    catalog: Arc<ServiceCatalog>,
    store: FsDocumentStore,
}

impl RecordService {
    pub fn new(cfg: Arc<CoreConfig>, catalog: Arc<ServiceCatalog>) -> Self {
        Self {
            catalog,
            store: FsDocumentStore::new(cfg),
        }
    }

    /// Lists every record in the service's collection, oldest first.
    pub fn list(&self, service: &str) -> RecordResult<Vec<StoredRecord>> {
        self.require_known(service)?;
        self.store.list(service)
    }

    /// Reads one record by id.
    pub fn get(&self, service: &str, id: &DocumentId) -> RecordResult<StoredRecord> {
        self.require_known(service)?;
        self.store.get(service, id)
    }

    /// Replaces one record's fields.
    pub fn update(
        &self,
        service: &str,
        id: &DocumentId,
        fields: BTreeMap<String, String>,
    ) -> RecordResult<StoredRecord> {
        self.require_known(service)?;
        self.store.update(service, id, fields)
    }

    /// Deletes one record by id.
    pub fn delete(&self, service: &str, id: &DocumentId) -> RecordResult<()> {
        self.require_known(service)?;
        self.store.delete(service, id)
    }

    fn require_known(&self, service: &str) -> RecordResult<()> {
        if self.catalog.contains(service) {
            Ok(())
        } else {
            Err(RecordError::UnknownService(service.to_string()))
        }
    }
}
