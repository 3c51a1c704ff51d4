//! Submission orchestration.
//!
//! A submission is accepted in three steps: require a personal number before
//! anything touches the store, stamp the accepted number into the record,
//! write exactly one document, and then ask the flow controller where the
//! patient goes next. There are no retries and no rollback — a document that
//! was written stays written even if a later step fails.

use std::collections::BTreeMap;
use std::sync::Arc;

use materna_types::PersonalNumber;

use crate::catalog::ServiceCatalog;
use crate::config::CoreConfig;
use crate::constants::{PERSONAL_NUMBER_FIELD, REGISTRATION_SERVICE};
use crate::error::{RecordError, RecordResult};
use crate::flow::{FlowController, FlowStep};
use crate::store::FsDocumentStore;

/// Accepts registration and service submissions and decides the next step.
#[derive(Clone, Debug)]
pub struct SubmissionService {
    catalog: Arc<ServiceCatalog>,
    flow: FlowController,
    store: FsDocumentStore,
}

impl SubmissionService {
    pub fn new(cfg: Arc<CoreConfig>, catalog: Arc<ServiceCatalog>) -> Self {
        Self {
            flow: FlowController::new(catalog.clone()),
            store: FsDocumentStore::new(cfg),
            catalog,
        }
    }

    /// Accepts a patient registration.
    ///
    /// The submitted fields must carry a non-empty personal number; nothing
    /// is written otherwise. On success the patient is routed to the first
    /// service form of the traversal.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::MissingPersonalNumber`] before any write if the
    /// identifier is absent or blank, or a store error if the write fails.
    pub fn register(&self, fields: BTreeMap<String, String>) -> RecordResult<FlowStep> {
        let personal_number = resolve_personal_number(&fields, None)?;
        self.persist_and_advance(REGISTRATION_SERVICE, personal_number, fields)
    }

    /// Accepts a submission for one service of the traversal.
    ///
    /// The personal number is taken from the submitted fields, falling back
    /// to `personal_number_hint` (the query-string value that threads the
    /// identifier between forms).
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::UnknownService`] if `service` is not a member
    /// of the traversal order, or [`RecordError::MissingPersonalNumber`] if
    /// no usable identifier is supplied — both before any write.
    pub fn submit(
        &self,
        service: &str,
        personal_number_hint: Option<&str>,
        fields: BTreeMap<String, String>,
    ) -> RecordResult<FlowStep> {
        if !self.catalog.traversal_order().contains(&service) {
            return Err(RecordError::UnknownService(service.to_string()));
        }

        let personal_number = resolve_personal_number(&fields, personal_number_hint)?;
        self.persist_and_advance(service, personal_number, fields)
    }

    fn persist_and_advance(
        &self,
        service: &str,
        personal_number: PersonalNumber,
        mut fields: BTreeMap<String, String>,
    ) -> RecordResult<FlowStep> {
        // Every stored record carries the identifier, normalised.
        fields.insert(
            PERSONAL_NUMBER_FIELD.to_string(),
            personal_number.as_str().to_string(),
        );

        self.store.insert(service, fields)?;
        self.flow.advance(service, personal_number)
    }
}

/// Picks the first usable personal number from the submitted fields, then
/// the hint. A blank field value falls through to the hint.
fn resolve_personal_number(
    fields: &BTreeMap<String, String>,
    hint: Option<&str>,
) -> RecordResult<PersonalNumber> {
    fields
        .get(PERSONAL_NUMBER_FIELD)
        .map(String::as_str)
        .into_iter()
        .chain(hint)
        .find_map(|value| PersonalNumber::new(value).ok())
        .ok_or(RecordError::MissingPersonalNumber)
}
