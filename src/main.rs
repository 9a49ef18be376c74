use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use patientor_core::config::{data_file_from_env_value, seed_patients_from_env_value};
use patientor_core::constants::{
    DEFAULT_REST_ADDR, DIAGNOSES_FILE_ENV, PATIENTS_FILE_ENV, REST_ADDR_ENV, SEED_PATIENTS_ENV,
};
use patientor_core::{CoreConfig, PatientService};

/// Main entry point for the Patientor application
///
/// Resolves configuration once, loads the diagnosis reference and the patient repository, and
/// serves the REST API until interrupted.
///
/// # Environment Variables
/// - `PATIENTOR_REST_ADDR`: REST server address (default: "0.0.0.0:3001")
/// - `PATIENTOR_DIAGNOSES_FILE`: diagnoses JSON replacing the bundled list
/// - `PATIENTOR_PATIENTS_FILE`: patients JSON replacing the bundled demo patients
/// - `PATIENTOR_SEED_PATIENTS`: `false` to start with an empty repository (default: true)
/// - `RUST_LOG`: tracing filter, on top of the default `info` for the Patientor crates
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values are invalid or data files cannot be loaded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor_run=info".parse()?)
                .add_directive("patientor_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::new(
        data_file_from_env_value(std::env::var(DIAGNOSES_FILE_ENV).ok()),
        data_file_from_env_value(std::env::var(PATIENTS_FILE_ENV).ok()),
        seed_patients_from_env_value(std::env::var(SEED_PATIENTS_ENV).ok())?,
    )?;
    let patient_service = PatientService::from_config(&cfg)?;

    let rest_addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    tracing::info!("++ Starting Patientor REST on {}", rest_addr);

    let app = api_rest::router(AppState { patient_service });
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Patientor REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
