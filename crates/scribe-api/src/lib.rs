pub mod auth;
pub mod comments;
pub mod contact;
pub mod error;
pub mod forms;
pub mod gravatar;
pub mod mail;
pub mod middleware;
pub mod pages;
pub mod posts;
pub mod session;
pub mod views;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use tower_http::trace::TraceLayer;

use crate::auth::AppState;
use crate::middleware::{require_admin, require_user};

/// All routes. Every request first passes through the session layer; admin
/// and member routes are additionally guarded.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(posts::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/post/{post_id}", get(posts::show_post).post(posts::add_comment))
        .route("/about", get(pages::about))
        .route("/contact", get(contact::contact_page).post(contact::send_contact))
        .route("/health", get(pages::health));

    let admin_routes = Router::new()
        .route("/new-post", get(posts::new_post_page).post(posts::create_post))
        .route("/edit-post/{post_id}", get(posts::edit_post_page).post(posts::edit_post))
        .route("/delete/{post_id}", get(posts::delete_post))
        .route_layer(from_fn(require_admin));

    let member_routes = Router::new()
        .route("/delete-comment/{comment_id}/{post_id}", get(comments::delete_comment))
        .route_layer(from_fn(require_user));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .merge(member_routes)
        .layer(from_fn_with_state(state.clone(), session::load_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
