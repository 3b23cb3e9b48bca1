use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use eventgen_lookup::{LookupError, LookupErrorKind};
use eventgen_protocol::GenerateError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Lookup(#[from] LookupError),
    #[error("No protocol service has been found registered")]
    UnknownProtocol(String),
    #[error("Requested template is not available")]
    TemplateNotFound,
    // The service's own report is the response body
    #[error("Message rejected by protocol service")]
    Rejected(Value),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    status_code: u16,
    result: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Lookup(e) => match e.kind() {
                LookupErrorKind::RepositoryUnavailable => {
                    tracing::warn!("Event repository lookup failed: {}", e);
                    (StatusCode::SERVICE_UNAVAILABLE, e.to_string())
                }
                LookupErrorKind::FailNone => (StatusCode::NOT_ACCEPTABLE, e.to_string()),
                LookupErrorKind::FailMultiple => (StatusCode::EXPECTATION_FAILED, e.to_string()),
                LookupErrorKind::Internal => {
                    tracing::error!("Unexpected lookup failure: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_ERROR_MESSAGE.to_string(),
                    )
                }
            },
            ApiError::UnknownProtocol(protocol) => {
                tracing::debug!("No message service named '{}'", protocol);
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ApiError::TemplateNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Rejected(report) => {
                return (StatusCode::BAD_REQUEST, Json(report.clone())).into_response();
            }
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Internal(detail) => {
                tracing::error!("Unexpected exception caught: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };
        let body = Json(ErrorBody {
            status_code: status.as_u16(),
            result: "FAIL",
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::Rejected(report) => ApiError::Rejected(report),
            GenerateError::Internal(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
