use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use subway_server::config::ServerConfig;
use subway_server::service::SubwayService;
use subway_server::store::SnapshotFile;
use subway_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "subway_server=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    // Load persisted state (fail fast if it is unreadable or inconsistent)
    let service = match &config.data_path {
        Some(path) => match SubwayService::open(SnapshotFile::new(path)) {
            Ok(service) => service,
            Err(e) => {
                error!("failed to load snapshot: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            info!("no SUBWAY_DATA_PATH set; state will not survive restarts");
            SubwayService::in_memory()
        }
    };

    let app = create_router(AppState::new(service));

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Subway line service listening on http://{}", config.bind_addr);
    info!("  GET    /health");
    info!("  POST   /stations, GET /stations, DELETE /stations/:id");
    info!("  POST   /lines, GET /lines, GET|PUT|DELETE /lines/:id");
    info!("  POST   /lines/:id/sections, DELETE /lines/:id/sections?station_id=");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    info!("shut down");
    ExitCode::SUCCESS
}

/// Resolves on Ctrl-C. Never resolves if the signal handler can't be installed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
