use serde::{Deserialize, Serialize};

use crate::ADMIN_USER_ID;

/// A registered account as seen by handlers and views. The password hash
/// never leaves the database layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.id == ADMIN_USER_ID
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    /// Human-readable creation date, e.g. "October 16, 2026".
    pub date: String,
    pub body: String,
    pub img_url: String,
    pub author_id: i64,
    pub author_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub post_id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub author_avatar: String,
}
