use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use crate::{blink::Blink, error::ApiError, state::AppState, storage::BlinkStore};

#[derive(Serialize)]
pub struct ListResponse {
    pub blinks: Vec<Blink>,
    pub count: usize,
}

/// Full scan of the blink namespace, no pagination.
pub async fn list_blinks<Store>(
    State(state): State<AppState<Store>>,
) -> Result<impl IntoResponse, ApiError>
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    let blinks = state.store.list_blinks().await?;
    tracing::debug!(count = blinks.len(), "Listed blinks");

    Ok(Json(ListResponse {
        count: blinks.len(),
        blinks,
    }))
}
