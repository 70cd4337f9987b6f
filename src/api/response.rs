use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::resolver::ResolveError;

// ============================================================================
// oEmbed envelope
// ============================================================================

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct OEmbed {
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub author_name: String,
}

impl OEmbed {
    /// A version 1.0 oEmbed document of type `link`.
    pub fn link(title: String, author_name: String) -> Json<OEmbed> {
        Json(OEmbed {
            version: "1.0".to_string(),
            kind: "link".to_string(),
            title,
            author_name,
        })
    }
}

// ============================================================================
// Error envelope
// ============================================================================

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    /// Failures share the success status and are told apart only by `success: false`.
    pub fn response(message: impl Into<String>) -> (StatusCode, Json<ErrorEnvelope>) {
        (
            StatusCode::OK,
            Json(ErrorEnvelope {
                success: false,
                error: message.into(),
            }),
        )
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        ErrorEnvelope::response(self.to_string()).into_response()
    }
}
