pub mod api;
pub mod models;

/// The account allowed to author, edit and delete posts: the first one registered.
pub const ADMIN_USER_ID: i64 = 1;
