//! Constants used throughout the Materna core crate.
//!
//! This module contains the well-known service and field names to ensure
//! consistency across the codebase and make maintenance easier.

/// Collection and catalog name of the patient registration entry point.
pub const REGISTRATION_SERVICE: &str = "PatientRegistration";

/// Field name carrying the patient identifier on every stored record.
pub const PERSONAL_NUMBER_FIELD: &str = "PersonalNumber";

/// Default directory for record storage when no explicit directory is configured.
pub const DEFAULT_DATA_DIR: &str = "materna_data";

/// Default service-account credentials file used for local development.
pub const DEFAULT_CREDENTIALS_FILE: &str = "serviceAccountKey.json";
