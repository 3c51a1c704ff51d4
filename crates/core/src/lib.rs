//! # Materna Core
//!
//! Core business logic for the Materna maternity care workflow.
//!
//! This crate contains pure data operations and the form-flow decision logic:
//! - The static service catalog and the fixed traversal order
//! - The flow controller that routes a patient from form to form
//! - Sharded JSON document storage under the configured data directory
//! - Submission, summary, and generic record services
//! - Startup configuration and credential resolution
//!
//! **No API concerns**: HTTP servers, OpenAPI documentation, or CLI surfaces
//! belong in `api-rest`, `api-shared`, or `materna-cli`.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod flow;
pub mod id;
pub mod records;
pub mod store;
pub mod submission;
pub mod summary;

pub use catalog::{ServiceCatalog, ServiceDefinition};
pub use config::CoreConfig;
pub use constants::{
    DEFAULT_CREDENTIALS_FILE, DEFAULT_DATA_DIR, PERSONAL_NUMBER_FIELD, REGISTRATION_SERVICE,
};
pub use credentials::{encode_credentials_file, resolve_service_account, ServiceAccount};
pub use error::{RecordError, RecordResult};
pub use flow::{FlowController, FlowStep};
pub use id::DocumentId;
pub use records::RecordService;
pub use store::{FsDocumentStore, StoredRecord};
pub use submission::SubmissionService;
pub use summary::{PatientSummary, SummaryService};

// Re-export the validated text types so downstream crates use one import.
pub use materna_types::{NonEmptyText, PersonalNumber, TextError};
