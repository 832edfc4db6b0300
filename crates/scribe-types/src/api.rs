use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{BlogPost, Comment, User};

// -- Session --

/// Claims carried by the signed session cookie. The token only names a
/// server-side session; who is logged in is looked up in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: Uuid,
    pub exp: usize,
}

// -- Forms --
//
// Every field defaults to empty so a missing field reaches validation and is
// reported inline instead of rejecting the whole request.

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub comment: String,
}

/// Create/edit form for a post. `author` is shown and required but never
/// persisted: the author is always the session user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub img_url: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(pub BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: &str) {
        self.0.entry(field.to_string()).or_default().push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// A form as it is rendered: submitted (or pre-filled) data plus errors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState<T> {
    pub data: T,
    pub errors: FormErrors,
}

impl<T> FormState<T> {
    pub fn new(data: T) -> Self {
        Self { data, errors: FormErrors::default() }
    }

    pub fn with_errors(data: T, errors: FormErrors) -> Self {
        Self { data, errors }
    }
}

// -- Views --

/// Data every page receives: footer year, pending flashes, who is logged in.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub year: String,
    pub flashes: Vec<String>,
    pub current_user: Option<User>,
}

#[derive(Debug, Serialize)]
pub struct IndexView {
    #[serde(flatten)]
    pub page: PageContext,
    pub posts: Vec<BlogPost>,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub page: PageContext,
    pub post: BlogPost,
    pub comments: Vec<Comment>,
    pub comment_form: FormState<CommentForm>,
}

#[derive(Debug, Serialize)]
pub struct PostFormView {
    #[serde(flatten)]
    pub page: PageContext,
    pub form: FormState<PostForm>,
    pub is_edit: bool,
}

#[derive(Debug, Serialize)]
pub struct AuthFormView<T> {
    #[serde(flatten)]
    pub page: PageContext,
    pub form: FormState<T>,
}

#[derive(Debug, Serialize)]
pub struct ContactView {
    #[serde(flatten)]
    pub page: PageContext,
    pub msg_sent: bool,
}
