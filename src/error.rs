use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Failure talking to the Spotify accounts service or Web API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed upstream payload: {0}")]
    Malformed(String),

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Invalid OAuth state")]
    InvalidState,

    #[error("Token exchange failed: {0}")]
    TokenExchange(UpstreamError),

    #[error("Playlist fetch failed: {0}")]
    PlaylistFetch(UpstreamError),

    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::InvalidState => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::TokenExchange(e) => {
                error!("Token exchange failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Authentication failed".to_string(),
                )
            }
            AppError::PlaylistFetch(e) => {
                error!("Playlist fetch failed: {}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "Failed to fetch playlist".to_string(),
                )
            }
            AppError::Session(e) => {
                error!("Session store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
