use std::{
    net::{AddrParseError, SocketAddr},
    sync::Arc,
};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    ConversionResult, DiagramIds, ValidationOptions, convert_with, parse_schedule_json,
    validate_with,
};

pub const ADDR_ENV: &str = "GANTT_TOOL_HTTP_ADDR";
pub const DETECT_CYCLES_ENV: &str = "GANTT_TOOL_DETECT_CYCLES";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Runtime settings for the HTTP server, read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiSettings {
    pub addr: SocketAddr,
    pub validation: ValidationOptions,
}

impl ApiSettings {
    pub fn from_env() -> Result<Self, AddrParseError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AddrParseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup(ADDR_ENV)
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse()?;
        let detect_cycles = lookup(DETECT_CYCLES_ENV)
            .map(|value| {
                matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            })
            .unwrap_or(false);
        Ok(Self {
            addr,
            validation: ValidationOptions { detect_cycles },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDiagram {
    pub diagram_id: String,
    pub text: String,
}

#[derive(Debug, Default)]
struct DiagramStore {
    ids: DiagramIds,
    last: Option<StoredDiagram>,
}

#[derive(Clone)]
pub struct AppState {
    diagrams: Arc<RwLock<DiagramStore>>,
    options: ValidationOptions,
}

impl AppState {
    pub fn new(options: ValidationOptions) -> Self {
        Self {
            diagrams: Arc::new(RwLock::new(DiagramStore::default())),
            options,
        }
    }

    fn record(&self, text: &str) -> StoredDiagram {
        let mut store = self.diagrams.write();
        let stored = StoredDiagram {
            diagram_id: store.ids.id_for(text),
            text: text.to_string(),
        };
        store.last = Some(stored.clone());
        stored
    }

    fn last(&self) -> Option<StoredDiagram> {
        self.diagrams.read().last.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConvertResponse {
    #[serde(flatten)]
    pub result: ConversionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagram_id: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/validate", post(validate_schedule))
        .route("/convert", post(convert_schedule))
        .route("/diagram", get(last_diagram))
        .with_state(state)
}

pub async fn serve(settings: ApiSettings) -> std::io::Result<()> {
    let state = AppState::new(settings.validation);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(settings.addr).await?;
    info!(addr = %settings.addr, "gantt-tool HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn validate_schedule(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<ValidationReport>), ApiError> {
    let schedule = parse_schedule_json(&body).map_err(|err| ApiError::Invalid(err.to_string()))?;
    let report = match validate_with(schedule.as_ref(), state.options) {
        Ok(()) => (
            StatusCode::OK,
            Json(ValidationReport {
                valid: true,
                error: None,
            }),
        ),
        Err(err) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ValidationReport {
                valid: false,
                error: Some(err.to_string()),
            }),
        ),
    };
    Ok(report)
}

async fn convert_schedule(
    State(state): State<AppState>,
    body: String,
) -> (StatusCode, Json<ConvertResponse>) {
    let schedule = match parse_schedule_json(&body) {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!(error = %err, "rejected malformed schedule");
            let response = ConvertResponse {
                result: ConversionResult::failure(err.to_string()),
                diagram_id: None,
            };
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    match convert_with(schedule.as_ref(), state.options) {
        Ok(text) => {
            let stored = state.record(&text);
            let response = ConvertResponse {
                result: ConversionResult::success(text),
                diagram_id: Some(stored.diagram_id),
            };
            (StatusCode::OK, Json(response))
        }
        Err(err) => {
            warn!(error = %err, "schedule failed validation");
            let response = ConvertResponse {
                result: ConversionResult::failure(err.to_string()),
                diagram_id: None,
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(response))
        }
    }
}

async fn last_diagram(State(state): State<AppState>) -> Result<Json<StoredDiagram>, ApiError> {
    state
        .last()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no diagram has been converted yet".to_string()))
}
