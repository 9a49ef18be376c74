//! # API REST
//!
//! REST API implementation for Patientor.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Request bodies are taken as untyped JSON and handed to `patientor-core` for validation, so
//! every field-level rejection carries the core's error message.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use patientor_core::{Diagnosis, Patient, PatientError, PatientService, PublicPatient};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
#[derive(Clone)]
pub struct AppState {
    pub patient_service: PatientService,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        ping,
        list_diagnoses,
        list_patients,
        get_patient,
        create_patient,
        add_entry,
    ),
    components(schemas(HealthRes, ErrorRes))
)]
pub struct ApiDoc;

/// Error returned by handlers, mapped onto an HTTP status.
///
/// - validation failures → `400 Bad Request` with the validation message
/// - unknown patient → `404 Not Found`
/// - anything else → `500 Internal Server Error` with a generic message
#[derive(Debug)]
pub struct ApiError(PatientError);

impl From<PatientError> for ApiError {
    fn from(err: PatientError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PatientError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            PatientError::NotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            other => {
                tracing::error!("Request failed: {:?}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
        };
        (status, Json(ErrorRes { error: message })).into_response()
    }
}

/// Builds the application router with all routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/ping", get(ping))
        .route("/api/diagnoses", get(list_diagnoses))
        .route("/api/patients", get(list_patients).post(create_patient))
        .route("/api/patients/:id", get(get_patient))
        .route("/api/patients/:id/entries", post(add_entry))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
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
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Patientor REST API is alive".into(),
    })
}

#[utoipa::path(
    get,
    path = "/api/ping",
    responses((status = 200, description = "Liveness probe", body = String))
)]
async fn ping() -> &'static str {
    tracing::debug!("someone pinged here");
    "pong"
}

#[utoipa::path(
    get,
    path = "/api/diagnoses",
    responses((status = 200, description = "All known diagnosis codes"))
)]
/// List the diagnosis reference set.
#[axum::debug_handler]
async fn list_diagnoses(State(state): State<AppState>) -> Json<Vec<Diagnosis>> {
    tracing::debug!("fetching all diagnoses");
    Json(state.patient_service.list_diagnoses())
}

#[utoipa::path(
    get,
    path = "/api/patients",
    responses((status = 200, description = "All patients, without ssn and entries"))
)]
/// List all patients in the public projection.
#[axum::debug_handler]
async fn list_patients(State(state): State<AppState>) -> Json<Vec<PublicPatient>> {
    tracing::debug!("fetching all patients");
    Json(state.patient_service.list_public_patients())
}

#[utoipa::path(
    get,
    path = "/api/patients/{id}",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Full patient record"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Fetch one full patient record, including ssn and entries.
///
/// # Errors
/// Returns `404 Not Found` if no patient has the identifier.
#[axum::debug_handler]
async fn get_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Patient>, ApiError> {
    tracing::debug!("fetching patient id: {id}");
    Ok(Json(state.patient_service.get_patient(&id)?))
}

#[utoipa::path(
    post,
    path = "/api/patients",
    responses(
        (status = 201, description = "Patient created"),
        (status = 400, description = "Invalid payload", body = ErrorRes)
    )
)]
/// Register a new patient.
///
/// The body must carry `name`, `dateOfBirth`, `ssn`, `gender` and `occupation`.
///
/// # Errors
/// Returns `400 Bad Request` naming the first invalid field.
#[axum::debug_handler]
async fn create_patient(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Patient>), ApiError> {
    let patient = state.patient_service.register_patient(&body)?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    post,
    path = "/api/patients/{id}/entries",
    params(("id" = String, Path, description = "Patient identifier")),
    responses(
        (status = 200, description = "Entry added; returns the updated patient"),
        (status = 400, description = "Invalid payload", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Append a clinical entry to a patient.
///
/// The body's `type` selects the entry kind (`HealthCheck`, `Hospital`,
/// `OccupationalHealthcare`) and with it the required fields.
///
/// # Errors
/// Returns `400 Bad Request` for an invalid payload and `404 Not Found` for an unknown patient.
#[axum::debug_handler]
async fn add_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Patient>, ApiError> {
    Ok(Json(state.patient_service.add_entry(&id, &body)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use patientor_core::{DiagnosisReference, PatientRepository};
    use serde_json::json;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SCULLY: &str = "d2773822-f723-11e9-8f0b-362b9e155667";

    fn app() -> Router {
        let service = PatientService::new(
            Arc::new(PatientRepository::bundled().unwrap()),
            Arc::new(DiagnosisReference::bundled().unwrap()),
        );
        router(AppState {
            patient_service: service,
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_ping() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);

        let (status, body) = send(app(), get("/api/ping")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "pong");
    }

    #[tokio::test]
    async fn test_list_patients_hides_ssn() {
        let (status, body) = send(app(), get("/api/patients")).await;

        assert_eq!(status, StatusCode::OK);
        let patients = body.as_array().unwrap();
        assert!(!patients.is_empty());
        for patient in patients {
            assert!(patient.get("ssn").is_none());
            assert!(patient.get("entries").is_none());
        }
    }

    #[tokio::test]
    async fn test_get_patient_returns_full_record() {
        let (status, body) = send(app(), get(&format!("/api/patients/{SCULLY}"))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Dana Scully");
        assert!(body["ssn"].is_string());
        assert_eq!(body["entries"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_unknown_patient_is_404() {
        let (status, body) = send(app(), get("/api/patients/no-such-patient")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("no-such-patient"));
    }

    #[tokio::test]
    async fn test_create_patient() {
        let app = app();
        let (status, body) = send(
            app.clone(),
            post(
                "/api/patients",
                json!({
                    "name": "John Doe",
                    "dateOfBirth": "1990-02-03",
                    "ssn": "123-45-6789",
                    "gender": "male",
                    "occupation": "Tester"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "John Doe");
        assert_eq!(body["entries"], json!([]));

        let id = body["id"].as_str().unwrap();
        let (status, fetched) = send(app, get(&format!("/api/patients/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, body);
    }

    #[tokio::test]
    async fn test_create_patient_rejects_invalid_payload() {
        let (status, body) = send(
            app(),
            post(
                "/api/patients",
                json!({ "name": "John Doe", "dateOfBirth": "1990-02-03", "ssn": "12-345-6789" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("ssn"));
    }

    #[tokio::test]
    async fn test_add_entry() {
        let (status, body) = send(
            app(),
            post(
                &format!("/api/patients/{SCULLY}/entries"),
                json!({
                    "type": "HealthCheck",
                    "date": "2020-01-01",
                    "description": "Checked.",
                    "specialist": "MD House",
                    "diagnosisCodes": ["Z57.1"],
                    "healthCheckRating": 3
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let entries = body["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3]["healthCheckRating"], 3);
        assert_eq!(entries[3]["type"], "HealthCheck");
        assert!(entries[3]["id"].is_string());
    }

    #[tokio::test]
    async fn test_add_entry_errors() {
        let (status, body) = send(
            app(),
            post(
                &format!("/api/patients/{SCULLY}/entries"),
                json!({ "type": "Hospital", "date": "2020-01-01", "description": "x", "specialist": "y" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("discharge"));

        let (status, _) = send(
            app(),
            post(
                "/api/patients/d2773822-0000-11e9-8f0b-362b9e155667/entries",
                json!({
                    "type": "HealthCheck",
                    "date": "2020-01-01",
                    "description": "Checked.",
                    "specialist": "MD House",
                    "healthCheckRating": 0
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_diagnoses() {
        let (status, body) = send(app(), get("/api/diagnoses")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body
            .as_array()
            .unwrap()
            .iter()
            .any(|d| d["code"] == "S62.5"));
    }
}
