//! Server-side sessions carried by a signed cookie.
//!
//! The cookie holds a short JWT naming a row in the `sessions` table. The row
//! says which user, if any, is logged in and owns the queued flash messages.
//! Anonymous visitors only get a session once something is flashed to them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::{debug, warn};
use uuid::Uuid;

use scribe_types::api::SessionClaims;
use scribe_types::models::User;

use crate::auth::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "scribe_session";

/// Lifetime of a session token, and the age after which rows are purged.
pub const SESSION_DAYS: u32 = 30;

/// Who is making the request. Inserted into request extensions for every
/// request by [`load_session`].
#[derive(Debug, Clone, Default)]
pub struct CurrentSession {
    pub session_id: Option<Uuid>,
    pub user: Option<User>,
}

impl CurrentSession {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(User::is_admin)
    }
}

/// Resolve the session cookie into a [`CurrentSession`]. A missing, forged or
/// expired token, or one naming an unknown session, means anonymous.
pub async fn load_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let current = match jar.get(SESSION_COOKIE) {
        Some(cookie) => resolve(&state, cookie.value())?,
        None => CurrentSession::default(),
    };

    req.extensions_mut().insert(current);
    Ok(next.run(req).await)
}

fn resolve(state: &AppState, token: &str) -> Result<CurrentSession, ApiError> {
    let claims = match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(state.session_secret.as_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            debug!("Ignoring invalid session token: {}", e);
            return Ok(CurrentSession::default());
        }
    };

    let Some(row) = state.db.get_session(&claims.sid.to_string())? else {
        return Ok(CurrentSession::default());
    };

    let user = match row.user_id {
        Some(user_id) => match state.db.get_user_by_id(user_id)? {
            Some(user) => Some(User { id: user.id, name: user.name, email: user.email }),
            None => {
                warn!("Session {} references missing user {}", row.id, user_id);
                None
            }
        },
        None => None,
    };

    Ok(CurrentSession { session_id: Some(claims.sid), user })
}

/// Sign a token for session `sid`.
pub fn issue_token(secret: &str, sid: Uuid) -> Result<String, ApiError> {
    let claims = SessionClaims {
        sid,
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_DAYS.into())).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn open_session(state: &AppState, jar: CookieJar, user_id: Option<i64>) -> Result<(CookieJar, Uuid), ApiError> {
    let sid = Uuid::new_v4();
    state.db.create_session(&sid.to_string(), user_id)?;
    let token = issue_token(&state.session_secret, sid)?;
    Ok((jar.add(session_cookie(token)), sid))
}

/// Drop rows whose tokens can no longer be presented.
fn purge_stale(state: &AppState) -> Result<(), ApiError> {
    let purged = state.db.purge_stale_sessions(SESSION_DAYS)?;
    if purged > 0 {
        debug!("Purged {} stale sessions", purged);
    }
    Ok(())
}

/// Log `user_id` in. Any previous session is discarded so the id is rotated;
/// messages still queued on it move to the new one.
pub fn establish(
    state: &AppState,
    jar: CookieJar,
    current: &CurrentSession,
    user_id: i64,
) -> Result<CookieJar, ApiError> {
    purge_stale(state)?;
    let (jar, sid) = open_session(state, jar, Some(user_id))?;
    if let Some(old) = current.session_id {
        let old = old.to_string();
        state.db.move_flashes(&old, &sid.to_string())?;
        state.db.delete_session(&old)?;
    }
    Ok(jar)
}

/// Log out: drop the server-side record and the cookie.
pub fn clear(state: &AppState, jar: CookieJar, current: &CurrentSession) -> Result<CookieJar, ApiError> {
    if let Some(sid) = current.session_id {
        state.db.delete_session(&sid.to_string())?;
    }
    purge_stale(state)?;
    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

/// Queue a message for the next rendered page, opening an anonymous session
/// if the visitor has none yet.
pub fn flash(
    state: &AppState,
    jar: CookieJar,
    current: &CurrentSession,
    message: &str,
) -> Result<CookieJar, ApiError> {
    let (jar, sid) = match current.session_id {
        Some(sid) => (jar, sid),
        None => open_session(state, jar, None)?,
    };
    state.db.push_flash(&sid.to_string(), message)?;
    Ok(jar)
}

pub fn take_flashes(state: &AppState, current: &CurrentSession) -> Result<Vec<String>, ApiError> {
    match current.session_id {
        Some(sid) => Ok(state.db.take_flashes(&sid.to_string())?),
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64) -> User {
        User { id, name: format!("user{id}"), email: format!("user{id}@example.com") }
    }

    #[test]
    fn anonymous_is_neither_user_nor_admin() {
        let session = CurrentSession::default();
        assert!(!session.is_authenticated());
        assert!(!session.is_admin());
    }

    #[test]
    fn admin_is_user_one_only() {
        let admin = CurrentSession { session_id: Some(Uuid::new_v4()), user: Some(user(1)) };
        let reader = CurrentSession { session_id: Some(Uuid::new_v4()), user: Some(user(7)) };
        assert!(admin.is_admin());
        assert!(reader.is_authenticated());
        assert!(!reader.is_admin());
    }

    #[test]
    fn issued_tokens_decode_with_the_same_secret_only() {
        let sid = Uuid::new_v4();
        let token = issue_token("secret-a", sid).unwrap();

        let ok = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"secret-a"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(ok.claims.sid, sid);

        let forged = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(forged.is_err());
    }
}
