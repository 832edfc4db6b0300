use axum::{
    Extension,
    extract::{Path, State},
    response::{IntoResponse, Redirect},
};
use tracing::info;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::session::CurrentSession;

/// Any logged-in user may delete any comment; authorship is not checked.
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path((comment_id, post_id)): Path<(i64, i64)>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.db.get_comment(comment_id)?.ok_or(ApiError::NotFound)?;

    state.db.delete_comment(comment.id)?;
    info!(
        "User {:?} deleted comment {} by user {}",
        session.user.as_ref().map(|u| u.id),
        comment.id,
        comment.author_id
    );

    Ok(Redirect::to(&format!("/post/{}", post_id)))
}
