use axum::{extract::Request, middleware::Next, response::Response};

use crate::error::ApiError;
use crate::session::CurrentSession;

fn current(req: &Request) -> Option<&CurrentSession> {
    req.extensions().get::<CurrentSession>()
}

/// Only the administrator (user id 1) gets through; everyone else gets 403.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    if !current(&req).is_some_and(CurrentSession::is_admin) {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}

/// Any logged-in user gets through; anonymous visitors get 403.
pub async fn require_user(req: Request, next: Next) -> Result<Response, ApiError> {
    if !current(&req).is_some_and(CurrentSession::is_authenticated) {
        return Err(ApiError::Forbidden);
    }
    Ok(next.run(req).await)
}
