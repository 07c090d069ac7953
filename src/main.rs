//! linkvault server.
//!
//! Loads settings, initialises logging, opens the database and serves the
//! HTTP API until Ctrl+C or SIGTERM.

use std::sync::Arc;

use linkvault::api;
use linkvault::app::App;
use linkvault::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use linkvault::types::settings::ServerSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    let settings = load_settings()?;
    init_tracing(&settings);

    let missing = settings.missing_required();
    if !missing.is_empty() {
        tracing::warn!(?missing, "required settings are blank; /health will report unhealthy");
    }

    let addr = settings.server.socket_addr();
    let db_path = settings.database.path.clone();
    let app = Arc::new(App::new(settings)?);
    tracing::info!(path = %db_path, "database ready");

    let router = api::router(app);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("linkvault listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("linkvault stopped");
    Ok(())
}

/// File settings first, then `LINKVAULT__*` environment overrides.
fn load_settings() -> Result<ServerSettings, Box<dyn std::error::Error>> {
    let mut engine = SettingsEngine::new(None);
    engine.load()?;
    engine.apply_env_overrides()?;
    Ok(engine.get_settings().clone())
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(settings: &ServerSettings) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
