//! Field validation for submitted forms.

use scribe_types::api::{CommentForm, FormErrors, LoginForm, PostForm, RegisterForm};
use url::Url;

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_URL: &str = "Invalid URL.";

pub trait Validate {
    /// Empty when the form may be acted on.
    fn validate(&self) -> FormErrors;
}

fn required(errors: &mut FormErrors, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, REQUIRED);
        return false;
    }
    true
}

fn http_url(errors: &mut FormErrors, field: &str, value: &str) {
    let valid = Url::parse(value.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some_and(|h| !h.is_empty()))
        .unwrap_or(false);
    if !valid {
        errors.add(field, INVALID_URL);
    }
}

impl Validate for RegisterForm {
    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        required(&mut errors, "name", &self.name);
        required(&mut errors, "email", &self.email);
        required(&mut errors, "password", &self.password);
        errors
    }
}

impl Validate for LoginForm {
    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        required(&mut errors, "email", &self.email);
        required(&mut errors, "password", &self.password);
        errors
    }
}

impl Validate for CommentForm {
    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        required(&mut errors, "comment", &self.comment);
        errors
    }
}

impl Validate for PostForm {
    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        required(&mut errors, "title", &self.title);
        required(&mut errors, "subtitle", &self.subtitle);
        required(&mut errors, "author", &self.author);
        // A missing URL is only reported once.
        if required(&mut errors, "img_url", &self.img_url) {
            http_url(&mut errors, "img_url", &self.img_url);
        }
        required(&mut errors, "body", &self.body);
        errors
    }
}
