use registry_sheet_gateway::api::{build_router, RegistryState};
use registry_sheet_gateway::config::{AllowedOrigins, Config};
use registry_sheet_gateway::registry::RegistryStore;
use registry_sheet_gateway::sheet::{FileWorkbook, MemoryWorkbook, Workbook};

use axum::http::HeaderValue;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env file if present
    let dotenv_result = dotenvy::dotenv();

    let config = Config::from_env()?;

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(&config.log_dir).unwrap_or_else(|e| {
        eprintln!(
            "Warning: Could not create log directory {}: {}",
            config.log_dir.display(),
            e
        );
    });

    // Create file appender with daily rotation
    let file_appender =
        RollingFileAppender::new(Rotation::DAILY, &config.log_dir, "registry-sheet-gateway.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Initialize logging - both stdout and file
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,registry_sheet_gateway=debug")),
        )
        // Console output
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        // File output with JSON format for easy parsing
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_writer(non_blocking),
        )
        .init();

    debug!("Logging initialized - log directory: {}", config.log_dir.display());

    if let Err(e) = dotenv_result {
        warn!("No .env file found or error loading it: {}", e);
    }

    let socket_addr = config.socket_addr()?;

    info!("Starting registry gateway on {}", socket_addr);
    info!("Registry sheet: {}", config.sheet_name);
    info!("Allowed origins: {:?}", config.allowed_origins);

    let workbook: Arc<dyn Workbook> = match &config.workbook_path {
        Some(path) => {
            info!("Using workbook file {}", path.display());
            Arc::new(FileWorkbook::new(path))
        }
        None => {
            warn!("WORKBOOK_PATH not set, using an empty in-memory workbook");
            Arc::new(MemoryWorkbook::new())
        }
    };

    match workbook.sheet_names() {
        Ok(names) if names.contains(&config.sheet_name) => {
            debug!("Workbook sheets: {:?}", names);
        }
        Ok(names) => {
            warn!(
                "Sheet '{}' not present in workbook (found {:?}); requests will fail until it is provisioned",
                config.sheet_name, names
            );
        }
        Err(e) => {
            warn!("Could not read workbook: {}", e);
        }
    }

    let store = RegistryStore::new(workbook, &config.sheet_name);
    let state = Arc::new(RegistryState::new(store));

    let app = build_router(state, config.max_body_bytes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&config.allowed_origins)),
    );

    // Create listener
    let listener = tokio::net::TcpListener::bind(&socket_addr).await?;
    info!("Server listening on {}", socket_addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

fn cors_layer(allowed_origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match allowed_origins {
        AllowedOrigins::Any => layer.allow_origin(Any),
        AllowedOrigins::List(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            layer.allow_origin(origins)
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal");
}
