use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agnos_core::repositories::{SqlitePatientRepository, SqliteStaffRepository};
use agnos_core::{CoreConfig, HttpHospitalClient, PatientService, StaffService, db};
use api_rest::AppState;
use api_shared::TokenSigner;

/// Main entry point for the Agnos registry
///
/// Resolves configuration, opens the database (creating and migrating it if needed) and serves
/// the REST API until Ctrl+C.
///
/// # Environment Variables
/// - `AGNOS_ADDR`: server address (default: "0.0.0.0:8080")
/// - `TOKEN_SECRET`: session token signing secret, at least 32 bytes (required)
/// - `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`, `BCRYPT_COST`, `HOSPITAL_A_API_URL`,
///   `HOSPITAL_API_TIMEOUT_SECS`: see `CoreConfig::from_env`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is missing or invalid,
/// - the database cannot be opened or migrated,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agnos=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("AGNOS_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());

    let secret = std::env::var("TOKEN_SECRET").context("TOKEN_SECRET must be set")?;
    let tokens = TokenSigner::new(secret.into_bytes()).context("invalid TOKEN_SECRET")?;

    let cfg = CoreConfig::from_env().context("invalid configuration")?;
    let pool = db::connect(cfg.database_url(), cfg.max_connections())
        .await
        .context("failed to open database")?;
    let hospitals =
        HttpHospitalClient::new(cfg.hospital_endpoints().clone(), cfg.hospital_api_timeout())?;

    let state = AppState::new(
        StaffService::new(
            Arc::new(SqliteStaffRepository::new(pool.clone())),
            cfg.password_hasher(),
        ),
        PatientService::new(
            Arc::new(SqlitePatientRepository::new(pool.clone())),
            Arc::new(hospitals),
        ),
        tokens,
    );
    let app = api_rest::router(state);

    tracing::info!("++ Starting Agnos REST on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    tracing::info!("-- Agnos REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
