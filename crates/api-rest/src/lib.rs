//! # API REST
//!
//! REST API implementation for Materna.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, redirects, CORS)
//!
//! Uses `api-shared` for common types and utilities. All domain decisions —
//! what the next form is, whether a submission is acceptable — live in
//! `materna-core`; the handlers here translate between HTTP and those
//! services.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Form, Path as AxumPath, Query, State},
    http::StatusCode,
    response::{Json, Redirect},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    DeleteRes, EditFormRes, FormRes, HealthRes, HealthService, RecordRes, RecordsRes, ServicesRes,
    SummaryRes, UpdateRes,
};
use materna_core::{
    CoreConfig, DocumentId, FlowStep, PersonalNumber, RecordError, RecordService, ServiceCatalog,
    StoredRecord, SubmissionService, SummaryService, REGISTRATION_SERVICE,
};

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers:
/// the startup configuration and the service catalog.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    catalog: Arc<ServiceCatalog>,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, catalog: Arc<ServiceCatalog>) -> Self {
        Self { cfg, catalog }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        list_services,
        registration_form,
        submit_registration,
        service_form,
        submit_service,
        patient_summary,
        view_records,
        edit_form,
        update_record,
        delete_record,
    ),
    components(schemas(
        HealthRes,
        ServicesRes,
        FormRes,
        SummaryRes,
        RecordRes,
        RecordsRes,
        EditFormRes,
        UpdateRes,
        DeleteRes,
    ))
)]
struct ApiDoc;

/// Builds the full application router over the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", get(list_services))
        .route("/PatientRegistration", get(registration_form))
        .route("/PatientRegistration", post(submit_registration))
        .route("/addData/:service", get(service_form))
        .route("/addData/:service", post(submit_service))
        .route("/patientSummary/:personal_number", get(patient_summary))
        .route("/view/:service", get(view_records))
        .route("/edit/:service/:id", get(edit_form))
        .route("/edit/:service/:id", post(update_record))
        .route("/delete/:service/:id", get(delete_record).post(delete_record))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Query parameters threading the patient identifier between forms.
#[derive(Debug, Deserialize)]
struct FormQuery {
    #[serde(rename = "personalNumber")]
    personal_number: Option<String>,
}

fn record_error_response(err: &RecordError) -> (StatusCode, &'static str) {
    match err {
        RecordError::MissingPersonalNumber => {
            (StatusCode::BAD_REQUEST, "Missing personal number.")
        }
        RecordError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid request."),
        RecordError::UnknownService(_) => (StatusCode::NOT_FOUND, "Service not found."),
        RecordError::DocumentNotFound { .. } => (StatusCode::NOT_FOUND, "Record not found."),
        RecordError::PatientNotFound(_) => (StatusCode::NOT_FOUND, "Patient not found."),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

/// Turns a flow decision into the redirect the browser follows next.
fn flow_redirect(step: FlowStep) -> Redirect {
    match step {
        FlowStep::NextForm {
            service,
            personal_number,
        } => Redirect::to(&format!(
            "/addData/{}?personalNumber={}",
            service, personal_number
        )),
        FlowStep::Summary { personal_number } => {
            Redirect::to(&format!("/patientSummary/{}", personal_number))
        }
    }
}

fn record_res(record: StoredRecord) -> RecordRes {
    RecordRes {
        id: record.id.to_string(),
        created_at: record.created_at.to_rfc3339(),
        created_by: record.created_by,
        fields: record.fields,
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the Materna REST API service.
/// This endpoint is used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service names in catalog order", body = ServicesRes)
    )
)]
/// List every service in the catalog
///
/// The entry page of the workflow: the catalog's service names in definition
/// order, registration first.
#[axum::debug_handler]
async fn list_services(State(state): State<AppState>) -> Json<ServicesRes> {
    let services = state
        .catalog
        .service_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    Json(ServicesRes { services })
}

#[utoipa::path(
    get,
    path = "/PatientRegistration",
    responses(
        (status = 200, description = "Registration form description", body = FormRes)
    )
)]
/// Describe the patient registration form
///
/// Registration is the entry point of the workflow, so no personal number is
/// carried in yet.
#[axum::debug_handler]
async fn registration_form(State(state): State<AppState>) -> Json<FormRes> {
    Json(FormRes {
        service: REGISTRATION_SERVICE.to_string(),
        fields: state
            .catalog
            .registration_fields()
            .iter()
            .map(|f| f.to_string())
            .collect(),
        personal_number: None,
    })
}

#[utoipa::path(
    post,
    path = "/PatientRegistration",
    responses(
        (status = 303, description = "Registration stored; redirect to the first service form"),
        (status = 400, description = "Missing personal number"),
        (status = 500, description = "Internal server error")
    )
)]
/// Accept a patient registration
///
/// Requires a non-empty `PersonalNumber` in the form body; nothing is stored
/// otherwise. On success the patient is redirected into the first service
/// form of the traversal, carrying the personal number in the query string.
#[axum::debug_handler]
async fn submit_registration(
    State(state): State<AppState>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Result<Redirect, (StatusCode, &'static str)> {
    let submissions = SubmissionService::new(state.cfg.clone(), state.catalog.clone());
    match submissions.register(fields) {
        Ok(step) => Ok(flow_redirect(step)),
        Err(e) => {
            tracing::error!("Registration error: {:?}", e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/addData/{service}",
    responses(
        (status = 200, description = "Form description for the service", body = FormRes),
        (status = 404, description = "Service not found")
    )
)]
/// Describe one service's form
///
/// Returns the service's ordered field list, prefilled with the personal
/// number passed via the `personalNumber` query parameter.
#[axum::debug_handler]
async fn service_form(
    State(state): State<AppState>,
    AxumPath(service): AxumPath<String>,
    Query(query): Query<FormQuery>,
) -> Result<Json<FormRes>, (StatusCode, &'static str)> {
    match state.catalog.fields_for(&service) {
        Some(fields) => Ok(Json(FormRes {
            service,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            personal_number: query.personal_number,
        })),
        None => Err((StatusCode::NOT_FOUND, "Service not found.")),
    }
}

#[utoipa::path(
    post,
    path = "/addData/{service}",
    responses(
        (status = 303, description = "Submission stored; redirect to the next form or the summary"),
        (status = 400, description = "Missing personal number"),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Accept a submission for one service of the traversal
///
/// The personal number is taken from the form body, falling back to the
/// `personalNumber` query parameter. The record is written and the response
/// redirects to whatever the flow controller decides comes next.
#[axum::debug_handler]
async fn submit_service(
    State(state): State<AppState>,
    AxumPath(service): AxumPath<String>,
    Query(query): Query<FormQuery>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Result<Redirect, (StatusCode, &'static str)> {
    let submissions = SubmissionService::new(state.cfg.clone(), state.catalog.clone());
    match submissions.submit(&service, query.personal_number.as_deref(), fields) {
        Ok(step) => Ok(flow_redirect(step)),
        Err(e) => {
            tracing::error!("Submit error for {}: {:?}", service, e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/patientSummary/{personal_number}",
    responses(
        (status = 200, description = "Patient summary", body = SummaryRes),
        (status = 400, description = "Invalid personal number"),
        (status = 404, description = "Patient not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Show the summary for a registered patient
///
/// The identifier must be non-blank and not the literal `null` — client-side
/// templating has been seen producing `/patientSummary/null` URLs, which are
/// missing identifiers, not patients.
#[axum::debug_handler]
async fn patient_summary(
    State(state): State<AppState>,
    AxumPath(personal_number): AxumPath<String>,
) -> Result<Json<SummaryRes>, (StatusCode, &'static str)> {
    if personal_number.trim().is_empty() || personal_number == "null" {
        return Err((StatusCode::BAD_REQUEST, "Invalid personal number."));
    }

    let personal_number = match PersonalNumber::new(&personal_number) {
        Ok(pn) => pn,
        Err(_) => return Err((StatusCode::BAD_REQUEST, "Invalid personal number.")),
    };

    let summaries = SummaryService::new(state.cfg.clone());
    match summaries.patient_summary(&personal_number) {
        Ok(summary) => Ok(Json(SummaryRes {
            personal_number: summary.personal_number,
            fields: summary.fields,
        })),
        Err(e) => {
            tracing::error!("Summary error: {:?}", e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/view/{service}",
    responses(
        (status = 200, description = "Every record in the service's collection", body = RecordsRes),
        (status = 404, description = "Service not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// List one service's stored records, oldest first
#[axum::debug_handler]
async fn view_records(
    State(state): State<AppState>,
    AxumPath(service): AxumPath<String>,
) -> Result<Json<RecordsRes>, (StatusCode, &'static str)> {
    let records = RecordService::new(state.cfg.clone(), state.catalog.clone());
    match records.list(&service) {
        Ok(listed) => Ok(Json(RecordsRes {
            service,
            records: listed.into_iter().map(record_res).collect(),
        })),
        Err(e) => {
            tracing::error!("View error for {}: {:?}", service, e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/edit/{service}/{id}",
    responses(
        (status = 200, description = "Record and field list for an edit form", body = EditFormRes),
        (status = 400, description = "Malformed record id"),
        (status = 404, description = "Service or record not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Fetch one record together with its service's field list
#[axum::debug_handler]
async fn edit_form(
    State(state): State<AppState>,
    AxumPath((service, id)): AxumPath<(String, String)>,
) -> Result<Json<EditFormRes>, (StatusCode, &'static str)> {
    let fields = match state.catalog.fields_for(&service) {
        Some(fields) => fields,
        None => return Err((StatusCode::NOT_FOUND, "Service not found.")),
    };

    let id = match DocumentId::parse(&id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Invalid record id: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid record id."));
        }
    };

    let records = RecordService::new(state.cfg.clone(), state.catalog.clone());
    match records.get(&service, &id) {
        Ok(record) => Ok(Json(EditFormRes {
            service,
            fields: fields.iter().map(|f| f.to_string()).collect(),
            record: record_res(record),
        })),
        Err(e) => {
            tracing::error!("Edit form error: {:?}", e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    post,
    path = "/edit/{service}/{id}",
    responses(
        (status = 200, description = "Record updated", body = UpdateRes),
        (status = 400, description = "Malformed record id"),
        (status = 404, description = "Service or record not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Replace one record's fields
#[axum::debug_handler]
async fn update_record(
    State(state): State<AppState>,
    AxumPath((service, id)): AxumPath<(String, String)>,
    Form(fields): Form<BTreeMap<String, String>>,
) -> Result<Json<UpdateRes>, (StatusCode, &'static str)> {
    let id = match DocumentId::parse(&id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Invalid record id: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid record id."));
        }
    };

    let records = RecordService::new(state.cfg.clone(), state.catalog.clone());
    match records.update(&service, &id, fields) {
        Ok(_) => Ok(Json(UpdateRes { success: true })),
        Err(e) => {
            tracing::error!("Update error: {:?}", e);
            Err(record_error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/delete/{service}/{id}",
    responses(
        (status = 200, description = "Record deleted", body = DeleteRes),
        (status = 400, description = "Malformed record id"),
        (status = 404, description = "Service or record not found"),
        (status = 500, description = "Internal server error")
    )
)]
/// Delete one record by id
///
/// Registered for both GET and POST so deletion works from a plain link as
/// well as a form post.
#[axum::debug_handler]
async fn delete_record(
    State(state): State<AppState>,
    AxumPath((service, id)): AxumPath<(String, String)>,
) -> Result<Json<DeleteRes>, (StatusCode, &'static str)> {
    let id = match DocumentId::parse(&id) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Invalid record id: {:?}", e);
            return Err((StatusCode::BAD_REQUEST, "Invalid record id."));
        }
    };

    let records = RecordService::new(state.cfg.clone(), state.catalog.clone());
    match records.delete(&service, &id) {
        Ok(()) => Ok(Json(DeleteRes { success: true })),
        Err(e) => {
            tracing::error!("Delete error: {:?}", e);
            Err(record_error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use materna_core::ServiceAccount;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_app(data_dir: &std::path::Path) -> Router {
        let cfg = Arc::new(
            CoreConfig::new(
                data_dir.to_path_buf(),
                ServiceAccount {
                    project_id: "materna-test".into(),
                    client_email: "writer@materna-test.iam.example".into(),
                },
            )
            .expect("CoreConfig::new should succeed"),
        );
        app(AppState::new(cfg, Arc::new(ServiceCatalog::standard())))
    }

    async fn get_req(app: &Router, uri: &str) -> Response<Body> {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request should build"),
            )
            .await
            .expect("request should not fail")
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> Response<Body> {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(
                        header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(Body::from(body.to_string()))
                    .expect("request should build"),
            )
            .await
            .expect("request should not fail")
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body should collect")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn location(response: &Response<Body>) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .expect("redirect should carry a Location header")
            .to_str()
            .expect("Location should be valid UTF-8")
    }

    #[tokio::test]
    async fn the_root_lists_every_service() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = get_req(&app, "/").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        let services = body["services"].as_array().expect("services array");
        assert_eq!(services.len(), 19);
        assert_eq!(services[0], "PatientRegistration");
    }

    #[tokio::test]
    async fn the_registration_form_has_no_personal_number() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let body = json_body(get_req(&app, "/PatientRegistration").await).await;
        assert_eq!(body["service"], "PatientRegistration");
        assert_eq!(body["fields"][0], "PersonalNumber");
        assert!(body["personal_number"].is_null());
    }

    #[tokio::test]
    async fn a_service_form_carries_the_query_identifier() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let body =
            json_body(get_req(&app, "/addData/MidwifeNotes?personalNumber=P123").await).await;
        assert_eq!(body["service"], "MidwifeNotes");
        assert_eq!(body["personal_number"], "P123");
    }

    #[tokio::test]
    async fn an_unknown_service_form_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = get_req(&app, "/addData/Cardiology").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registration_redirects_into_the_first_service_form() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = post_form(
            &app,
            "/PatientRegistration",
            "PersonalNumber=P123&FirstName=Anna&LastName=Berg",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/addData/MidwifeNotes?personalNumber=P123"
        );
    }

    #[tokio::test]
    async fn registration_without_a_personal_number_is_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = post_form(&app, "/PatientRegistration", "FirstName=Anna").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn a_submission_redirects_to_the_next_form() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = post_form(
            &app,
            "/addData/MidwifeNotes?personalNumber=P123",
            "MidwifeNote=Stable+overnight",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            "/addData/LaborProgressChart?personalNumber=P123"
        );
    }

    #[tokio::test]
    async fn the_last_submission_redirects_to_the_summary() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = post_form(
            &app,
            "/addData/InfantHealthStatus?personalNumber=P123",
            "BirthStatus=Healthy",
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/patientSummary/P123");
    }

    #[tokio::test]
    async fn the_summary_rejects_the_null_literal() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = get_req(&app, "/patientSummary/null").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn the_summary_returns_the_registration_fields() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        post_form(
            &app,
            "/PatientRegistration",
            "PersonalNumber=P123&FirstName=Anna",
        )
        .await;

        let response = get_req(&app, "/patientSummary/P123").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["personal_number"], "P123");
        assert_eq!(body["fields"]["FirstName"], "Anna");
    }

    #[tokio::test]
    async fn the_summary_for_an_unregistered_patient_is_not_found() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = get_req(&app, "/patientSummary/P999").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn view_returns_what_was_submitted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        post_form(
            &app,
            "/addData/MidwifeNotes?personalNumber=P123",
            "MidwifeNote=Stable+overnight&Discharge=No",
        )
        .await;

        let body = json_body(get_req(&app, "/view/MidwifeNotes").await).await;
        let records = body["records"].as_array().expect("records array");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["fields"]["MidwifeNote"], "Stable overnight");
        assert_eq!(records[0]["fields"]["Discharge"], "No");
        assert_eq!(records[0]["fields"]["PersonalNumber"], "P123");
        assert_eq!(
            records[0]["created_by"],
            "writer@materna-test.iam.example"
        );
    }

    #[tokio::test]
    async fn edit_and_delete_operate_by_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        post_form(
            &app,
            "/addData/MidwifeNotes?personalNumber=P123",
            "MidwifeNote=Initial",
        )
        .await;

        let body = json_body(get_req(&app, "/view/MidwifeNotes").await).await;
        let id = body["records"][0]["id"].as_str().expect("record id");

        let edit = json_body(get_req(&app, &format!("/edit/MidwifeNotes/{}", id)).await).await;
        assert_eq!(edit["record"]["fields"]["MidwifeNote"], "Initial");
        assert_eq!(edit["fields"][0], "Time");

        let response = post_form(
            &app,
            &format!("/edit/MidwifeNotes/{}", id),
            "PersonalNumber=P123&MidwifeNote=Amended",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(get_req(&app, "/view/MidwifeNotes").await).await;
        assert_eq!(body["records"][0]["fields"]["MidwifeNote"], "Amended");

        let response = get_req(&app, &format!("/delete/MidwifeNotes/{}", id)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(get_req(&app, "/view/MidwifeNotes").await).await;
        assert_eq!(body["records"].as_array().expect("records array").len(), 0);
    }

    #[tokio::test]
    async fn a_malformed_record_id_is_a_bad_request() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let app = test_app(temp_dir.path());

        let response = get_req(&app, "/edit/MidwifeNotes/not-a-real-id").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
