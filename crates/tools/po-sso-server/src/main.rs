use anyhow::{Context, Result};
use clap::Parser;
use po_identity_core::InMemoryUserStore;
use po_sso_server::{AppState, Settings, router};
use po_sso_session::{InMemorySessionManager, SsoSessionProvider};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Serve Product Opener SSO sessions over HTTP
#[derive(Parser)]
#[command(name = "po-sso-server")]
#[command(version)]
struct Args {
    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "PO_SSO_CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        settings.server.port = port;
        settings.validate()?;
    }

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let users = Arc::new(InMemoryUserStore::new());
    let sessions = Arc::new(
        InMemorySessionManager::new(settings.sessions.ttl_seconds)
            .context("Invalid session configuration")?,
    );

    let provider = SsoSessionProvider::from_config(
        settings.provider.clone(),
        users,
        sessions.clone(),
    )
    .context("Invalid provider configuration")?;

    info!(
        "SSO session provider ready (priority {}, SSO domain {})",
        provider.priority(),
        provider.config().sso.domain
    );

    let cleanup_sessions = sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let removed = cleanup_sessions.cleanup_expired().await;
            if removed > 0 {
                debug!("Removed {} expired sessions", removed);
            }
        }
    });

    let app = router(AppState::new(provider, sessions));

    let addr = settings.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
