use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound(String),

    #[error("Malformed JSON body: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("JSON body must be an object or an array")]
    StrictJson,

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedJson(_) | AppError::StrictJson | AppError::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// JSON error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::NotFound(path) => ErrorBody {
                error: self.to_string(),
                status: status.as_u16(),
                path: Some(path.clone()),
            },
            _ => {
                tracing::debug!(error = %self, "Rejected request");
                ErrorBody {
                    error: self.to_string(),
                    status: status.as_u16(),
                    path: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}
