use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::mail::MailError;

/// Everything a handler can fail with. Client-facing variants map to their
/// status code; the rest are logged and become a bare 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("mail relay error: {0}")]
    Mail(#[from] MailError),

    #[error("session token error: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Database(_)
            | ApiError::Mail(_)
            | ApiError::Session(_)
            | ApiError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        status.into_response()
    }
}
