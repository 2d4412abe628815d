//! # API REST
//!
//! REST API over a session-scoped chartdesk record store.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI documentation with utoipa
//! - REST-specific concerns (JSON bodies, status codes, CORS)
//!
//! The store lives for as long as the server process. Insertions are held in memory
//! only and are gone after a restart.

#![warn(rust_2018_idioms)]

pub mod dto;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use chartdesk_core::config::resolve_records_path;
use chartdesk_core::{normalise_query, CoreConfig, FormFields, PatientError, RecordStore};
use dto::{CreatePatientReq, DoctorNoteRes, ErrorRes, HealthRes, NextIdRes, PatientRes};

/// Application state shared across REST API handlers.
#[derive(Clone, Default)]
pub struct AppState {
    store: Arc<RwLock<RecordStore>>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }
}

/// Resolve the record source and load it into a fresh state.
///
/// Resolution or load failures are logged and produce an empty store; the server
/// still starts and every lookup answers 404.
pub fn load_state(records_override: Option<PathBuf>) -> AppState {
    let cfg = match resolve_records_path(records_override).and_then(CoreConfig::new) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("failed to resolve patient records: {}", e);
            return AppState::default();
        }
    };

    tracing::info!("loading patient records from {}", cfg.records_path().display());
    let (store, err) = chartdesk_core::open_store(&cfg);
    if let Some(e) = err {
        tracing::error!("failed to load patient database: {}", e);
    }
    AppState::new(store)
}

#[derive(OpenApi)]
#[openapi(
    paths(health, get_patient, next_patient_id, create_patient),
    components(schemas(
        HealthRes,
        PatientRes,
        DoctorNoteRes,
        NextIdRes,
        ErrorRes,
        CreatePatientReq,
    ))
)]
pub struct ApiDoc;

/// Build the REST router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients", post(create_patient))
        .route("/patients/:id", get(get_patient))
        .route("/next-patient-id", get(next_patient_id))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

type ApiError = (StatusCode, Json<ErrorRes>);

fn error_response(err: PatientError) -> ApiError {
    let (status, missing_fields) = match &err {
        PatientError::MissingRequiredFields(missing) => (StatusCode::BAD_REQUEST, missing.clone()),
        PatientError::InvalidInput(_) | PatientError::Text(_) => (StatusCode::BAD_REQUEST, vec![]),
        PatientError::DuplicateIdentifier(_) => (StatusCode::CONFLICT, vec![]),
        PatientError::NotFound(_) => (StatusCode::NOT_FOUND, vec![]),
        PatientError::LoadRead(_) | PatientError::LoadSchema(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, vec![])
        }
    };

    (
        status,
        Json(ErrorRes {
            message: err.to_string(),
            missing_fields,
        }),
    )
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
/// Reports liveness and how many records the session store holds. An empty store
/// usually means the record source failed to load.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let patients = state.store.read().await.len();
    Json(HealthRes {
        ok: true,
        message: "Chartdesk REST API is alive".into(),
        patients,
    })
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient ID, matched ignoring case")),
    responses(
        (status = 200, description = "Patient record", body = PatientRes),
        (status = 404, description = "No patient with this ID", body = ErrorRes)
    )
)]
/// Look up a patient by identifier
///
/// # Errors
/// Returns `404 Not Found` if no record matches.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PatientRes>, ApiError> {
    let key = normalise_query(&id)
        .ok_or_else(|| error_response(PatientError::NotFound(id.clone())))?;

    let store = state.store.read().await;
    match store.get(&key) {
        Ok(record) => Ok(Json(PatientRes::from(record))),
        Err(e) => {
            tracing::info!("patient lookup missed: {}", key);
            Err(error_response(e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/next-patient-id",
    responses(
        (status = 200, description = "Suggested identifier for a new patient", body = NextIdRes)
    )
)]
/// Suggest the next sequential patient identifier
#[axum::debug_handler]
async fn next_patient_id(State(state): State<AppState>) -> Json<NextIdRes> {
    let patient_id = state.store.read().await.next_identifier().to_string();
    Json(NextIdRes { patient_id })
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = CreatePatientReq,
    responses(
        (status = 201, description = "Patient added to the session", body = PatientRes),
        (status = 400, description = "Required fields missing or invalid", body = ErrorRes),
        (status = 409, description = "Patient ID already exists", body = ErrorRes)
    )
)]
/// Add a new patient to the session store
///
/// The record is held in memory only.
///
/// # Errors
/// Returns `400 Bad Request` listing missing required fields, or `409 Conflict` if the
/// identifier is already in use.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<CreatePatientReq>,
) -> Result<(StatusCode, Json<PatientRes>), ApiError> {
    let fields = FormFields::from(req);

    let mut store = state.store.write().await;
    match store.admit(&fields) {
        Ok(record) => Ok((StatusCode::CREATED, Json(PatientRes::from(record)))),
        Err(e) => {
            tracing::warn!("add patient rejected: {}", e);
            Err(error_response(e))
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const SAMPLE: &str = r#"[
        {
            "patient_id": "P001", "name": "Asha Verma", "age": 54, "blood_group": "B+",
            "department": "Cardiology", "address": "12 Lake Road",
            "doctor_notes": [
                {"doctor_name": "Dr. Mehta", "date": "2024-01-01", "time": "09:00", "note": "Admitted"},
                {"doctor_name": "Dr. Mehta", "date": "2024-01-05", "time": "10:00", "note": "Stable"}
            ]
        },
        {
            "patient_id": "P002", "name": "Ravi Kumar", "age": 31, "blood_group": "O-",
            "department": "Orthopaedics", "address": "4 Hill Street"
        }
    ]"#;

    fn test_app() -> Router {
        let mut store = RecordStore::new();
        store.load_json(SAMPLE).expect("sample should load");
        router(AppState::new(store))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("should read body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("body should be JSON")
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("valid request")
    }

    #[tokio::test]
    async fn health_reports_store_size() {
        let response = test_app().oneshot(get("/health")).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["patients"], 2);
    }

    #[tokio::test]
    async fn get_patient_ignores_case_and_orders_notes() {
        let response = test_app()
            .oneshot(get("/patients/p001"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["patient_id"], "P001");
        assert_eq!(body["bp"], "Not recorded");
        assert_eq!(body["notes_summary"], "2 notes available");
        assert_eq!(body["doctor_notes"][0]["date"], "2024-01-05");
        assert_eq!(body["doctor_notes"][0]["latest"], true);
        assert_eq!(body["doctor_notes"][0]["long_date"], "Friday, January 5, 2024");
        assert_eq!(body["doctor_notes"][1]["latest"], false);
    }

    #[tokio::test]
    async fn unknown_patient_is_404() {
        let response = test_app()
            .oneshot(get("/patients/P999"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn next_patient_id_follows_highest() {
        let response = test_app()
            .oneshot(get("/next-patient-id"))
            .await
            .expect("response");
        let body = body_json(response).await;
        assert_eq!(body["patient_id"], "P003");
    }

    #[tokio::test]
    async fn create_patient_then_look_it_up() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json(
                "/patients",
                serde_json::json!({
                    "patient_id": "p003",
                    "name": "Nila Das",
                    "age": 29,
                    "blood_group": "A-",
                    "department": "Dermatology",
                    "address": "3 Park Avenue",
                    "spo2": 98
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["patient_id"], "P003");
        assert_eq!(body["spo2"], "98");
        assert_eq!(
            body["notes_summary"],
            "No doctor notes available for this patient."
        );

        let response = app
            .oneshot(get("/patients/P003"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_patient_keeps_text_age() {
        let response = test_app()
            .oneshot(post_json(
                "/patients",
                serde_json::json!({
                    "patient_id": "P012",
                    "name": "Kiran Rao",
                    "age": "unknown",
                    "blood_group": "O+",
                    "department": "General",
                    "address": "2 Station Road"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["age"], "unknown");
    }

    #[tokio::test]
    async fn create_patient_lists_missing_fields() {
        let response = test_app()
            .oneshot(post_json(
                "/patients",
                serde_json::json!({
                    "patient_id": "P010",
                    "name": "Nila Das",
                    "age": "29",
                    "blood_group": "A-",
                    "department": "Dermatology"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["missing_fields"], serde_json::json!(["address"]));
    }

    #[tokio::test]
    async fn duplicate_patient_is_409() {
        let response = test_app()
            .oneshot(post_json(
                "/patients",
                serde_json::json!({
                    "patient_id": "p002",
                    "name": "Someone Else",
                    "age": "40",
                    "blood_group": "B+",
                    "department": "General",
                    "address": "Elsewhere"
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let response = test_app()
            .oneshot(get("/api-docs/openapi.json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert!(body["paths"]["/patients/{id}"].is_object());
    }

    #[test]
    fn load_state_survives_missing_source() {
        let state = load_state(Some(PathBuf::from("/definitely/not/here.json")));
        let store = state.store.try_read().expect("store should be unlocked");
        assert!(store.is_empty());
    }
}
