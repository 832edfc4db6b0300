mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use scribe_api::auth::{AppState, AppStateInner};
use scribe_api::mail::{DisabledMailer, Mailer, SmtpMailer};
use scribe_api::session::SESSION_DAYS;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scribe=debug,scribe_api=debug,scribe_db=info,tower_http=debug".into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            eprintln!("       Set it in your .env file and restart.");
            std::process::exit(1);
        }
    };

    // Init database
    let db = scribe_db::Database::open(&config.db_path)?;
    let purged = db.purge_stale_sessions(SESSION_DAYS)?;
    if purged > 0 {
        info!("Purged {} stale sessions", purged);
    }

    let mailer: Box<dyn Mailer> = match &config.mail {
        Some(mail) => {
            info!("Contact form relays through {} as {}", mail.host, mail.user);
            Box::new(SmtpMailer::new(&mail.host, &mail.user, &mail.password, &config.site_name)?)
        }
        None => {
            warn!("SCRIBE_MAIL_USER/SCRIBE_MAIL_PASSWORD not set; contact form will fail");
            Box::new(DisabledMailer)
        }
    };

    // Shared state
    let state: AppState = Arc::new(AppStateInner {
        db,
        session_secret: config.session_secret.clone(),
        mailer,
    });

    let app = scribe_api::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Scribe listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            warn!("Failed to install SIGTERM handler; only Ctrl+C will stop the server");
            ctrl_c.await.ok();
            return;
        };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
