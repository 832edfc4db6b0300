use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use scribe_types::api::{CommentForm, FormErrors, FormState, IndexView, PostForm, PostFormView, PostView};
use scribe_types::models::{BlogPost, User};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::forms::Validate;
use crate::session::{self, CurrentSession};
use crate::views::{comment_from_row, page_context, post_from_row, today};

pub const LOGIN_TO_COMMENT: &str = "Please login or register  to comment on the blog posts!";

pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<impl IntoResponse, ApiError> {
    let posts = state.db.list_posts()?.into_iter().map(post_from_row).collect();

    Ok(Json(IndexView {
        page: page_context(&state, &session)?,
        posts,
    }))
}

fn fetch_post(state: &AppState, post_id: i64) -> Result<BlogPost, ApiError> {
    state
        .db
        .get_post(post_id)?
        .map(post_from_row)
        .ok_or(ApiError::NotFound)
}

/// The post page, with the comments re-read from the store.
fn render_post(
    state: &AppState,
    session: &CurrentSession,
    post: BlogPost,
    comment_form: FormState<CommentForm>,
) -> Result<Response, ApiError> {
    let comments = state
        .db
        .get_comments_for_post(post.id)?
        .into_iter()
        .map(comment_from_row)
        .collect();

    Ok(Json(PostView {
        page: page_context(state, session)?,
        post,
        comments,
        comment_form,
    })
    .into_response())
}

pub async fn show_post(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(post_id): Path<i64>,
) -> Result<Response, ApiError> {
    let post = fetch_post(&state, post_id)?;
    render_post(&state, &session, post, FormState::new(CommentForm::default()))
}

/// Anonymous visitors are sent to log in; nothing is stored for them.
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    jar: CookieJar,
    Path(post_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, ApiError> {
    let post = fetch_post(&state, post_id)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return render_post(&state, &session, post, FormState::with_errors(form, errors));
    }

    let Some(user) = &session.user else {
        let jar = session::flash(&state, jar, &session, LOGIN_TO_COMMENT)?;
        return Ok((jar, Redirect::to("/login")).into_response());
    };

    let comment_id = state.db.create_comment(&form.comment, user.id, post.id)?;
    info!("User {} commented on post {} (comment {})", user.id, post.id, comment_id);

    render_post(&state, &session, post, FormState::new(CommentForm::default()))
}

/// The guard has already checked the session; this only unwraps it.
fn session_user(session: &CurrentSession) -> Result<&User, ApiError> {
    session.user.as_ref().ok_or(ApiError::Forbidden)
}

fn render_post_form(
    state: &AppState,
    session: &CurrentSession,
    form: PostForm,
    errors: FormErrors,
    is_edit: bool,
) -> Result<Response, ApiError> {
    Ok(Json(PostFormView {
        page: page_context(state, session)?,
        form: FormState::with_errors(form, errors),
        is_edit,
    })
    .into_response())
}

pub async fn new_post_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
) -> Result<Response, ApiError> {
    render_post_form(&state, &session, PostForm::default(), FormErrors::default(), false)
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let user = session_user(&session)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return render_post_form(&state, &session, form, errors, false);
    }

    let post_id = state.db.create_post(
        &form.title,
        &form.subtitle,
        &today(),
        &form.body,
        &form.img_url,
        user.id,
    )?;
    info!("User {} created post {} ({})", user.id, post_id, form.title);

    Ok(Redirect::to("/").into_response())
}

/// Pre-filled with the post, and with the editor's name as author.
pub async fn edit_post_page(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(post_id): Path<i64>,
) -> Result<Response, ApiError> {
    let user = session_user(&session)?;
    let post = fetch_post(&state, post_id)?;

    let form = PostForm {
        title: post.title,
        subtitle: post.subtitle,
        author: user.name.clone(),
        img_url: post.img_url,
        body: post.body,
    };
    render_post_form(&state, &session, form, FormErrors::default(), true)
}

/// Overwrites the post and makes the editor its author.
pub async fn edit_post(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(post_id): Path<i64>,
    Form(form): Form<PostForm>,
) -> Result<Response, ApiError> {
    let user = session_user(&session)?;
    let post = fetch_post(&state, post_id)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return render_post_form(&state, &session, form, errors, true);
    }

    if !state.db.update_post(
        post.id,
        &form.title,
        &form.subtitle,
        &form.body,
        &form.img_url,
        user.id,
    )? {
        return Err(ApiError::NotFound);
    }
    info!("User {} edited post {} (was by {})", user.id, post.id, post.author_id);

    Ok(Redirect::to(&format!("/post/{}", post.id)).into_response())
}

/// Comments of the post are removed by the store's cascade.
pub async fn delete_post(
    State(state): State<AppState>,
    Extension(session): Extension<CurrentSession>,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let user = session_user(&session)?;
    let post = fetch_post(&state, post_id)?;

    state.db.delete_post(post.id)?;
    info!("User {} deleted post {}", user.id, post.id);

    Ok(Redirect::to("/"))
}
