use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::set_header::response::SetResponseHeaderLayer;

use crate::service::ServiceError;
use crate::validation::FieldError;

pub mod dto;
pub mod teacher_handlers;

// ---------- shared state ----------

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub upload_dir: PathBuf,
}

// ---------- error type ----------

/// A structured JSON error response with an HTTP status. The body always
/// carries `"error"`; conflicts add `"field"`/`"value"`, validation failures
/// add a `"fields"` array.
pub struct ApiErr(StatusCode, serde_json::Value);

impl ApiErr {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self(status, serde_json::json!({ "error": msg.into() }))
    }

    pub fn internal(e: impl std::fmt::Display) -> Self {
        tracing::error!(error = %e, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, msg.into())
    }

    pub fn conflict(field: &str, value: &str) -> Self {
        Self(
            StatusCode::CONFLICT,
            serde_json::json!({
                "error": format!("{field} '{value}' already exists"),
                "field": field,
                "value": value,
            }),
        )
    }

    pub fn validation(errors: &[FieldError]) -> Self {
        Self(
            StatusCode::UNPROCESSABLE_ENTITY,
            serde_json::json!({ "error": "validation failed", "fields": errors }),
        )
    }
}

impl IntoResponse for ApiErr {
    fn into_response(self) -> Response {
        (self.0, Json(self.1)).into_response()
    }
}

impl From<ServiceError> for ApiErr {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::AlreadyExists { field, value } => ApiErr::conflict(field, &value),
            ServiceError::InvalidArgument(errors) => ApiErr::validation(&errors),
            ServiceError::NotFound(what) => ApiErr::not_found(format!("{what} not found")),
            ServiceError::Storage(e) => {
                tracing::error!(error = %e, "attachment storage failed");
                ApiErr::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "attachment could not be stored",
                )
            }
            ServiceError::Hash(_) | ServiceError::Db(_) => ApiErr::internal(e),
        }
    }
}

// ---------- router ----------

pub fn app_router(state: AppState) -> Router {
    let allowed_origins: Vec<HeaderValue> = std::env::var("SCHOOL_CORS_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let cors = if allowed_origins.is_empty() {
        CorsLayer::new() // no origins allowed = same-origin only
    } else {
        CorsLayer::new()
            .allow_origin(allowed_origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    };

    Router::new()
        .route("/health", get(|| async { StatusCode::OK }))
        .nest("/api", api())
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .with_state(state)
}

fn api() -> Router<AppState> {
    Router::new()
        .route("/teachers", get(teacher_handlers::list_teachers))
        .route("/teachers/save", post(teacher_handlers::save_teacher))
        .route("/teachers/all", post(teacher_handlers::filter_teachers))
        .route(
            "/teachers/all/paginated",
            post(teacher_handlers::filter_teachers_paginated),
        )
        .route("/teachers/{uuid}", get(teacher_handlers::get_teacher))
}
