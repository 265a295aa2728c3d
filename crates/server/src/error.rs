use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ndawonga_core::errors::{ApplicationError, DomainError, InterfaceError};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Handler failure already mapped to its interface class. Only the generic
/// user message reaches the client.
#[derive(Debug)]
pub struct ApiError(pub InterfaceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { error: self.0.user_message().to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

pub fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Logs the detailed failure under `event_name` and maps it for the client.
pub fn reject(
    event_name: &'static str,
    correlation_id: &str,
    failure: impl Into<ApplicationError>,
) -> ApiError {
    let failure = failure.into();
    match &failure {
        ApplicationError::Domain(_) | ApplicationError::NotFound { .. } => warn!(
            event_name,
            correlation_id = %correlation_id,
            error = %failure,
            "request rejected"
        ),
        ApplicationError::Collaborator(_) | ApplicationError::Configuration(_) => error!(
            event_name,
            correlation_id = %correlation_id,
            error = %failure,
            "request failed"
        ),
    }
    ApiError(failure.into_interface(correlation_id))
}

/// Unwraps a JSON body, treating a malformed or mistyped body as a validation gap.
pub fn json_body<T>(
    event_name: &'static str,
    correlation_id: &str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        reject(
            event_name,
            correlation_id,
            DomainError::ValidationGap { field: "body", reason: rejection.body_text() },
        )
    })
}
