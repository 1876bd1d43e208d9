//! # Userbase Server
//!
//! Serves the users API over HTTP.

use tokio::signal;
use tracing::{error, info, warn};
use userbase_config::ConfigLoader;
use userbase_core::telemetry::{init_telemetry, shutdown_telemetry};
use userbase_core::{UserbaseError, UserbaseResult};
use userbase_rest::create_router;
use userbase_server::{app::Components, startup::print_startup_info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be up yet if loading config failed.
        error!("Application error: {}", e);
        eprintln!("userbase-server: {e}");
        std::process::exit(1);
    }
}

async fn run() -> UserbaseResult<()> {
    let config = ConfigLoader::from_default_location().load()?;

    init_telemetry(&config.observability.telemetry(&config.app.name))?;

    info!("Starting Userbase server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let components = Components::build(&config).await?;
    let router = create_router(components.state.clone(), &config.server);

    let rest_addr = config.server.rest_addr();
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .map_err(|e| UserbaseError::Internal(format!("Failed to bind {}: {}", rest_addr, e)))?;

    print_startup_info(&config);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| UserbaseError::Internal(format!("REST server error: {}", e)));

    components.shutdown().await;
    info!("Server shutdown complete");
    shutdown_telemetry();

    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        () = terminate => info!("Received terminate signal, initiating graceful shutdown..."),
    }
}
