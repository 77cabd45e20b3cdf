//! # vnx-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the zkTLS verification API.
//! Binds to `PORT` (default 8080).

use std::sync::Arc;

use anyhow::Context;
use vnx_api::db::{InMemoryRepository, PgRepository, VerificationRepository};
use vnx_api::state::{AppConfig, AppState, LogFormat};
use vnx_client::{HostedAuthClient, HostedAuthConfig, HttpProofVerifier, VerifierConfig};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(config.log_format);

    if std::env::var_os("SUPABASE_SERVICE_ROLE_KEY").is_some() {
        tracing::debug!("SUPABASE_SERVICE_ROLE_KEY is set but unused; persistence goes through DATABASE_URL");
    }

    // Optional database; absent means the in-memory repository.
    let repository: Arc<dyn VerificationRepository> = match vnx_api::db::init_pool()
        .await
        .context("database initialization failed")?
    {
        Some(pool) => Arc::new(PgRepository::new(pool)),
        None => Arc::new(InMemoryRepository::new()),
    };

    let auth_config = HostedAuthConfig::from_env().context("auth service configuration")?;
    let identity = Arc::new(HostedAuthClient::new(auth_config).context("auth client")?);

    let verifier_config = VerifierConfig::from_env().context("proof verifier configuration")?;
    tracing::info!(app_id = %verifier_config.app_id, "proof verifier configured");
    let verifier = Arc::new(HttpProofVerifier::new(verifier_config).context("verifier client")?);

    let port = config.port;
    let state = AppState::new(config, repository, verifier, identity);
    let app = vnx_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("VNX API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
