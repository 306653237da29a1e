use tokio::signal;

use blinks::config;
use blinks::startup;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match config::AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            eprintln!("Please check your environment variables and configuration.");
            eprintln!("Required: REDIS_URL");
            std::process::exit(1);
        }
    };

    // The service still runs if logging cannot be installed
    let _guard = match startup::init_logging(&config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            eprintln!("Continuing with default logging configuration...");
            None
        }
    };

    if config.app_debug {
        tracing::warn!("Debug mode enabled");
    }

    let storage = startup::init_storage(&config).await?;

    let router = startup::build_app(storage.clone());
    let router = blinks::cors::apply_cors(router, &config)?;

    let addr = config.to_socket_addr().await?;
    startup::start_server(router, addr, shutdown_signal()).await?;

    startup::shutdown_storage(&storage);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! { _ = ctrl_c => {}, _ = terminate => {}, }
    tracing::info!("Shutdown signal received");
}
