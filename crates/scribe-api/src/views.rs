use chrono::Local;

use scribe_db::models::{CommentRow, PostRow};
use scribe_types::api::PageContext;
use scribe_types::models::{BlogPost, Comment};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::gravatar;
use crate::session::{self, CurrentSession};

/// Footer year, pending flashes (consumed here) and the logged-in user.
pub fn page_context(state: &AppState, session: &CurrentSession) -> Result<PageContext, ApiError> {
    Ok(PageContext {
        year: Local::now().format("%Y").to_string(),
        flashes: session::take_flashes(state, session)?,
        current_user: session.user.clone(),
    })
}

/// Creation date as stored on posts, e.g. "October 16, 2026".
pub fn today() -> String {
    Local::now().format("%B %d, %Y").to_string()
}

pub fn post_from_row(row: PostRow) -> BlogPost {
    BlogPost {
        id: row.id,
        title: row.title,
        subtitle: row.subtitle,
        date: row.date,
        body: row.body,
        img_url: row.img_url,
        author_id: row.author_id,
        author_name: row.author_name,
    }
}

pub fn comment_from_row(row: CommentRow) -> Comment {
    Comment {
        id: row.id,
        text: row.text,
        post_id: row.post_id,
        author_id: row.author_id,
        author_name: row.author_name,
        author_avatar: gravatar::avatar_url(&row.author_email),
    }
}
