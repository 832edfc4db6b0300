use axum::{Extension, Form, Json, extract::State, response::IntoResponse};

use scribe_types::api::{ContactForm, ContactView};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::mail::ContactMessage;
use crate::session::CurrentSession;
use crate::views::page_context;

pub async fn contact_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(ContactView {
        page: page_context(&state, &session)?,
        msg_sent: false,
    }))
}

/// Relay failures surface as a 500; there is no retry.
pub async fn send_contact(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<ContactForm>,
) -> Result<impl IntoResponse, ApiError> {
    state.mailer.send(&ContactMessage::from(form)).await?;

    Ok(Json(ContactView {
        page: page_context(&state, &session)?,
        msg_sent: true,
    }))
}
