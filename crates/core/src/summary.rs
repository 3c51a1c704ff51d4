//! Patient summary lookup.

use std::collections::BTreeMap;
use std::sync::Arc;

use materna_types::PersonalNumber;

use crate::config::CoreConfig;
use crate::constants::{PERSONAL_NUMBER_FIELD, REGISTRATION_SERVICE};
use crate::error::{RecordError, RecordResult};
use crate::store::FsDocumentStore;

/// The derived, read-only summary view: the registration record that first
/// introduced a personal number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientSummary {
    pub personal_number: String,
    pub fields: BTreeMap<String, String>,
}

/// Looks up the summary for a registered patient.
#[derive(Clone, Debug)]
pub struct SummaryService {
    store: FsDocumentStore,
}

impl SummaryService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            store: FsDocumentStore::new(cfg),
        }
    }

    /// Returns the summary for `personal_number`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::PatientNotFound`] when no registration matches
    /// — a distinct outcome from store failures, which surface as their own
    /// error variants.
    pub fn patient_summary(
        &self,
        personal_number: &PersonalNumber,
    ) -> RecordResult<PatientSummary> {
        let record = self.store.find_first_by_field(
            REGISTRATION_SERVICE,
            PERSONAL_NUMBER_FIELD,
            personal_number.as_str(),
        )?;

        match record {
            Some(record) => Ok(PatientSummary {
                personal_number: personal_number.as_str().to_string(),
                fields: record.fields,
            }),
            None => Err(RecordError::PatientNotFound(
                personal_number.as_str().to_string(),
            )),
        }
    }
}
