//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use std::path::{Path, PathBuf};

use crate::credentials::ServiceAccount;
use crate::error::{RecordError, RecordResult};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_dir: PathBuf,
    service_account: ServiceAccount,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(data_dir: PathBuf, service_account: ServiceAccount) -> RecordResult<Self> {
        if data_dir.as_os_str().is_empty() {
            return Err(RecordError::InvalidInput("data_dir cannot be empty".into()));
        }

        Ok(Self {
            data_dir,
            service_account,
        })
    }

    /// The root directory all collections live under.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The directory holding one collection's records.
    pub fn collection_dir(&self, collection: &str) -> PathBuf {
        self.data_dir.join(collection)
    }

    /// The identity the process writes records under.
    pub fn service_account(&self) -> &ServiceAccount {
        &self.service_account
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> ServiceAccount {
        ServiceAccount {
            project_id: "materna-dev".into(),
            client_email: "writer@materna-dev.iam.example".into(),
        }
    }

    #[test]
    fn collection_dir_joins_below_data_dir() {
        let cfg = CoreConfig::new(PathBuf::from("materna_data"), account())
            .expect("CoreConfig::new should succeed");
        assert_eq!(
            cfg.collection_dir("MidwifeNotes"),
            Path::new("materna_data/MidwifeNotes")
        );
    }

    #[test]
    fn empty_data_dir_is_rejected() {
        let err = CoreConfig::new(PathBuf::new(), account())
            .expect_err("empty data_dir should be rejected");
        assert!(matches!(err, RecordError::InvalidInput(_)));
    }
}
