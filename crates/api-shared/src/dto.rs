//! Request/response types shared across API surfaces.
//!
//! All bodies are JSON; form submissions arrive as urlencoded maps and are
//! handled by the REST crate directly, so only responses live here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// The catalog's service names, in definition order.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct ServicesRes {
    pub services: Vec<String>,
}

/// Everything a client needs to render one form: the service name, its
/// ordered fields, and the personal number to carry forward, if known.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct FormRes {
    pub service: String,
    pub fields: Vec<String>,
    pub personal_number: Option<String>,
}

/// The patient summary: the registration record for a personal number.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct SummaryRes {
    pub personal_number: String,
    pub fields: BTreeMap<String, String>,
}

/// One stored record with its write metadata.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct RecordRes {
    pub id: String,
    pub created_at: String,
    pub created_by: String,
    pub fields: BTreeMap<String, String>,
}

/// Every record in one service's collection, oldest first.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct RecordsRes {
    pub service: String,
    pub records: Vec<RecordRes>,
}

/// One record together with its service's field list, for edit forms.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct EditFormRes {
    pub service: String,
    pub fields: Vec<String>,
    pub record: RecordRes,
}

/// Result of an update operation.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateRes {
    pub success: bool,
}

/// Result of a delete operation.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteRes {
    pub success: bool,
}
