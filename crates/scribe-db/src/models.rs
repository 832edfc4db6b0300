/// Database row types — these map directly to SQLite rows.
/// Distinct from scribe-types models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// A blog post joined with its author's name.
pub struct PostRow {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author_id: i64,
    pub author_name: String,
}

/// A comment joined with the fields of its author needed for display.
pub struct CommentRow {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub author_name: String,
    pub author_email: String,
    pub post_id: i64,
}

pub struct SessionRow {
    pub id: String,
    pub user_id: Option<i64>,
    pub created_at: String,
}
