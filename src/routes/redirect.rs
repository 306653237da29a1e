use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::{error::ApiError, routes::path_blink_url, state::AppState, storage::BlinkStore};

#[derive(Serialize)]
pub struct RedirectResponse {
    pub redirect_url: String,
}

pub async fn redirect<Store>(
    Path(blink_url): Path<String>,
    State(state): State<AppState<Store>>,
) -> Result<impl IntoResponse, ApiError>
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    let blink_url = path_blink_url(&blink_url)?;
    let blink = state
        .store
        .get_blink(&blink_url)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(RedirectResponse {
        redirect_url: blink.redirect_url,
    }))
}
