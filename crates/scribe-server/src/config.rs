use std::path::PathBuf;

use anyhow::{Result, bail};

/// Placeholder session secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// SMTP relay account. Mail is sent from and to `user`.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub user: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub session_secret: String,
    pub site_name: String,
    /// `None` unless both the relay user and password are set.
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let session_secret = var("SCRIBE_SESSION_SECRET").unwrap_or_default();
        if session_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("SCRIBE_SESSION_SECRET is unset or still a placeholder");
        }

        let host = var("SCRIBE_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("SCRIBE_PORT").unwrap_or_else(|| "5003".into()).parse()?;
        let db_path = var("SCRIBE_DB_PATH").unwrap_or_else(|| "scribe.db".into()).into();
        let site_name = var("SCRIBE_SITE_NAME").unwrap_or_else(|| "themarcoblog.com".into());

        let mail = match (var("SCRIBE_MAIL_USER"), var("SCRIBE_MAIL_PASSWORD")) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => Some(MailConfig {
                host: var("SCRIBE_SMTP_HOST").unwrap_or_else(|| "smtp-relay.gmail.com".into()),
                user,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            db_path,
            session_secret,
            site_name,
            mail,
        })
    }
}
