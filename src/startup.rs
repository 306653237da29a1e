use std::net::SocketAddr;

use axum::Router;
use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    config::{AppConfig, LogFormat},
    error::BlinksError,
    logging::try_init_subscriber,
    state::AppState,
    storage::{BlinkStore, redis::RedisStorage},
};

/// Initialize logging subsystem
///
/// The returned guard flushes the non-blocking writer when dropped, so it must
/// live as long as the process logs.
pub fn init_logging(config: &AppConfig) -> Result<WorkerGuard, BlinksError> {
    let (stdout, guard) = tracing_appender::non_blocking(std::io::stdout());

    match config.log_format {
        LogFormat::Json => {
            let subscriber =
                crate::logging::build_json_subscriber("blinks", config.log_filter(), stdout)?;
            try_init_subscriber(subscriber)?;
        }
        LogFormat::Plain => {
            let subscriber = crate::logging::build_plain_subscriber(config.log_filter(), stdout);
            try_init_subscriber(subscriber)?;
        }
    }

    Ok(guard)
}

/// Create the process-wide Redis pool and ping it once.
///
/// An unreachable Redis does not abort start-up: the pool reconnects lazily
/// and `/health` reports the outage.
pub async fn init_storage(config: &AppConfig) -> Result<RedisStorage, BlinksError> {
    let storage = RedisStorage::try_from_redis_url(
        config.redis_url.as_str(),
        config.redis_pool_size,
        config.redis_pool_timeout_secs,
    )?;

    match storage.ping().await {
        Ok(()) => tracing::info!(
            pool_size = config.redis_pool_size,
            "Redis connection pool initialized"
        ),
        Err(e) => tracing::warn!(
            error = %e,
            "Redis is not reachable yet, continuing; requests will fail until it is"
        ),
    }

    Ok(storage)
}

/// Build the router over the given store
pub fn build_app<Store>(store: Store) -> Router
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    crate::routes::build_router(AppState::new(store))
}

/// Close the Redis pool once the server has stopped accepting requests
pub fn shutdown_storage(storage: &RedisStorage) {
    storage.close();
    tracing::info!("Redis connection pool closed");
}

/// Start the HTTP server with graceful shutdown
pub async fn start_server<F>(
    router: Router,
    addr: SocketAddr,
    shutdown_signal: F,
) -> Result<(), BlinksError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
        BlinksError::InternalServerError(format!("Failed to bind to {}: {}", addr, e))
    })?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .map_err(|e| BlinksError::InternalServerError(format!("Server error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[tokio::test]
    async fn server_stops_on_shutdown_signal() {
        let router = build_app(MemoryStorage::new());
        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

        let result = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            start_server(router, addr, async {}),
        )
        .await
        .expect("server should shut down promptly");

        assert!(result.is_ok());
    }
}
