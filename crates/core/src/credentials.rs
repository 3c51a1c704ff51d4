//! Store credential resolution.
//!
//! The document store is written under a service identity described by a
//! service-account JSON blob. Deployments supply it one of two ways: a
//! base64-encoded blob in an environment variable (hosted environments), or
//! a local credentials file (development). Resolution happens exactly once at
//! process startup — never during request handling — and the resolved
//! identity travels with [`CoreConfig`](crate::config::CoreConfig) from
//! there on.

use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

use crate::error::{RecordError, RecordResult};

/// The identity under which the process writes to the document store.
///
/// Only the fields this system consumes are declared; anything else in the
/// credential blob is ignored during parsing.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServiceAccount {
    /// The project the store belongs to.
    pub project_id: String,
    /// The account identity; stamped as `created_by` on every stored record.
    pub client_email: String,
}

impl ServiceAccount {
    fn validate(self) -> RecordResult<Self> {
        if self.client_email.trim().is_empty() {
            return Err(RecordError::InvalidInput(
                "service account client_email cannot be empty".into(),
            ));
        }
        Ok(self)
    }
}

/// Resolves the service account from the available credential sources.
///
/// A present (non-blank) `base64_blob` takes precedence; otherwise the
/// credentials file at `credentials_file` is read. The precedence matches the
/// deployment story: hosted environments inject the blob, local development
/// keeps a key file next to the binary.
///
/// # Errors
///
/// - [`RecordError::CredentialDecode`] / [`RecordError::CredentialParse`] if
///   the blob is present but not valid base64-encoded JSON.
/// - [`RecordError::CredentialRead`] / [`RecordError::CredentialParse`] if
///   the file exists but cannot be read or parsed.
/// - [`RecordError::CredentialsUnavailable`] if neither source is present.
pub fn resolve_service_account(
    base64_blob: Option<&str>,
    credentials_file: &Path,
) -> RecordResult<ServiceAccount> {
    if let Some(blob) = base64_blob.map(str::trim).filter(|blob| !blob.is_empty()) {
        let bytes = general_purpose::STANDARD
            .decode(blob)
            .map_err(RecordError::CredentialDecode)?;
        let account: ServiceAccount =
            serde_json::from_slice(&bytes).map_err(RecordError::CredentialParse)?;
        return account.validate();
    }

    if credentials_file.is_file() {
        let contents =
            std::fs::read_to_string(credentials_file).map_err(RecordError::CredentialRead)?;
        let account: ServiceAccount =
            serde_json::from_str(&contents).map_err(RecordError::CredentialParse)?;
        return account.validate();
    }

    Err(RecordError::CredentialsUnavailable)
}

/// Reads a credentials file and returns it as a base64 blob suitable for the
/// environment variable. Used by the CLI when preparing a deployment.
///
/// # Errors
///
/// Returns [`RecordError::CredentialRead`] if the file cannot be read.
pub fn encode_credentials_file(credentials_file: &Path) -> RecordResult<String> {
    let contents = std::fs::read(credentials_file).map_err(RecordError::CredentialRead)?;
    Ok(general_purpose::STANDARD.encode(contents))
}
