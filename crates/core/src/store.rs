//! The document store.
//!
//! Each service has its own collection, and each submission is one JSON
//! document inside it. Documents are stored in a sharded structure:
//!
//! ```text
//! <data_dir>/
//!   MidwifeNotes/
//!     <s1>/
//!       <s2>/
//!         <32hex-id>.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the document id.
//!
//! The store gives per-document atomicity only: `insert` is append-only (a
//! fresh id per call, so repeated identical submissions produce distinct
//! documents), and no operation spans more than one file. Collection walks
//! skip documents that fail to parse, logging a warning, so one corrupt file
//! never hides the rest of a collection.

use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::error::{RecordError, RecordResult};
use crate::id::DocumentId;

/// One stored submission: the submitted fields plus write metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Canonical document identifier, unique within the collection.
    pub id: DocumentId,
    /// When the document was written.
    pub created_at: DateTime<Utc>,
    /// The service identity that wrote the document.
    pub created_by: String,
    /// The submitted field values, keyed by field name.
    pub fields: BTreeMap<String, String>,
}

/// Filesystem-backed document store rooted at the configured data directory.
#[derive(Clone, Debug)]
pub struct FsDocumentStore {
    cfg: Arc<CoreConfig>,
}

impl FsDocumentStore {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Appends one document to `collection` and returns it.
    ///
    /// Every call allocates a fresh id — there is no upsert. The write
    /// identity and timestamp are stamped here, not by the caller.
    ///
    /// # Errors
    ///
    /// Returns `RecordError` if the shard directory cannot be created or the
    /// document cannot be serialised or written.
    pub fn insert(
        &self,
        collection: &str,
        fields: BTreeMap<String, String>,
    ) -> RecordResult<StoredRecord> {
        let record = StoredRecord {
            id: DocumentId::new(),
            created_at: Utc::now(),
            created_by: self.cfg.service_account().client_email.clone(),
            fields,
        };
        self.write(collection, &record)?;
        Ok(record)
    }

    /// Reads one document by id.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DocumentNotFound`] if no such document exists —
    /// distinct from read or parse failures.
    pub fn get(&self, collection: &str, id: &DocumentId) -> RecordResult<StoredRecord> {
        let path = id.sharded_path(&self.cfg.collection_dir(collection));
        if !path.is_file() {
            return Err(RecordError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(RecordError::FileRead)?;
        serde_json::from_str(&contents).map_err(RecordError::Deserialization)
    }

    /// Returns every readable document in `collection`, oldest first.
    ///
    /// A missing collection directory is an empty collection, not an error.
    /// Documents that cannot be read or parsed are skipped with a warning.
    pub fn list(&self, collection: &str) -> RecordResult<Vec<StoredRecord>> {
        let collection_dir = self.cfg.collection_dir(collection);

        let mut records = Vec::new();

        let s1_iter = match fs::read_dir(&collection_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(RecordError::FileRead(e)),
        };
        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let file_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for file_ent in file_iter.flatten() {
                    let file_path = file_ent.path();
                    if file_path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                        continue;
                    }

                    if let Ok(contents) = fs::read_to_string(&file_path) {
                        match serde_json::from_str::<StoredRecord>(&contents) {
                            Ok(record) => records.push(record),
                            Err(e) => {
                                tracing::warn!(
                                    "failed to parse record: {} - {}",
                                    file_path.display(),
                                    e
                                );
                            }
                        }
                    }
                }
            }
        }

        // Oldest first, so "the first matching document" is well defined.
        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });

        Ok(records)
    }

    /// Returns the oldest document in `collection` whose `field` equals
    /// `value`, or `None` if nothing matches.
    pub fn find_first_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> RecordResult<Option<StoredRecord>> {
        Ok(self.list(collection)?.into_iter().find(|record| {
            record.fields.get(field).map(String::as_str) == Some(value)
        }))
    }

    /// Replaces an existing document's fields, keeping its id and write
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DocumentNotFound`] if the document does not
    /// exist; update never creates.
    pub fn update(
        &self,
        collection: &str,
        id: &DocumentId,
        fields: BTreeMap<String, String>,
    ) -> RecordResult<StoredRecord> {
        let mut record = self.get(collection, id)?;
        record.fields = fields;
        self.write(collection, &record)?;
        Ok(record)
    }

    /// Deletes one document by id.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::DocumentNotFound`] if the document does not
    /// exist.
    pub fn delete(&self, collection: &str, id: &DocumentId) -> RecordResult<()> {
        let path = id.sharded_path(&self.cfg.collection_dir(collection));
        if !path.is_file() {
            return Err(RecordError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        fs::remove_file(&path).map_err(RecordError::FileDelete)
    }

    /// Returns true if the collection has a directory on disk.
    ///
    /// Used by tests to assert that rejected submissions wrote nothing.
    pub fn collection_exists(&self, collection: &str) -> bool {
        self.cfg.collection_dir(collection).is_dir()
    }

    fn write(&self, collection: &str, record: &StoredRecord) -> RecordResult<()> {
        let path = record.id.sharded_path(&self.cfg.collection_dir(collection));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(RecordError::CollectionDirCreation)?;
        }

        let json = serde_json::to_string_pretty(record).map_err(RecordError::Serialization)?;
        fs::write(&path, json).map_err(RecordError::FileWrite)
    }
}
