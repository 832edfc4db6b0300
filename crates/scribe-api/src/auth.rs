use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{
    Extension, Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use scribe_db::Database;
use scribe_types::api::{AuthFormView, FormState, LoginForm, RegisterForm};

use crate::error::ApiError;
use crate::forms::Validate;
use crate::mail::Mailer;
use crate::session::{self, CurrentSession};
use crate::views::page_context;

pub const ALREADY_REGISTERED: &str = "You've already registered with that email, please log in instead!";
pub const UNKNOWN_EMAIL: &str = "A user with that email does not exist, please try again.";
pub const WRONG_PASSWORD: &str = "Password incorrect, please try again.";

pub type AppState = Arc<AppStateInner>;

/// Everything handlers share, built once at startup.
pub struct AppStateInner {
    pub db: Database,
    pub session_secret: String,
    pub mailer: Box<dyn Mailer>,
}

pub async fn register_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(AuthFormView {
        page: page_context(&state, &session)?,
        form: FormState::new(RegisterForm::default()),
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, ApiError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Json(AuthFormView {
            page: page_context(&state, &session)?,
            form: FormState::with_errors(form, errors),
        })
        .into_response());
    }

    if state.db.get_user_by_email(&form.email)?.is_some() {
        let jar = session::flash(&state, jar, &session, ALREADY_REGISTERED)?;
        return Ok((jar, Redirect::to("/login")).into_response());
    }

    let password_hash = hash_password(&form.password)?;
    let user_id = state.db.create_user(&form.name, &form.email, &password_hash)?;
    info!("Registered user {} ({})", user_id, form.name);

    let jar = session::establish(&state, jar, &session, user_id)?;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn login_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(AuthFormView {
        page: page_context(&state, &session)?,
        form: FormState::new(LoginForm::default()),
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(Json(AuthFormView {
            page: page_context(&state, &session)?,
            form: FormState::with_errors(form, errors),
        })
        .into_response());
    }

    let Some(user) = state.db.get_user_by_email(&form.email)? else {
        let jar = session::flash(&state, jar, &session, UNKNOWN_EMAIL)?;
        return Ok((jar, Redirect::to("/login")).into_response());
    };

    if !verify_password(&form.password, &user.password)? {
        let jar = session::flash(&state, jar, &session, WRONG_PASSWORD)?;
        return Ok((jar, Redirect::to("/login")).into_response());
    }

    info!("User {} logged in", user.id);
    let jar = session::establish(&state, jar, &session, user.id)?;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let jar = session::clear(&state, jar, &session)?;
    Ok((jar, Redirect::to("/")))
}

/// Hash with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; an unparseable stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, ApiError> {
    let parsed_hash = PasswordHash::new(stored).map_err(|e| ApiError::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_are_salted_and_verifiable() {
        let first = hash_password("correct horse").unwrap();
        let second = hash_password("correct horse").unwrap();
        assert_ne!(first, second);
        assert!(!first.contains("correct horse"));

        assert!(verify_password("correct horse", &first).unwrap());
        assert!(!verify_password("battery staple", &first).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("pw", "plaintext").is_err());
    }
}
