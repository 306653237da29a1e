use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::{state::AppState, storage::BlinkStore};

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    redis: &'static str,
}

pub async fn health_check<Store>(State(state): State<AppState<Store>>) -> impl IntoResponse
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(Health {
                status: "healthy",
                redis: "connected",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed, store unreachable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Health {
                    status: "unhealthy",
                    redis: "disconnected",
                }),
            )
        }
    }
}
