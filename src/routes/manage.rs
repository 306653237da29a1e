use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use crate::{
    blink::is_valid_redirect_url,
    error::ApiError,
    routes::{BlinkWithMessage, path_blink_url},
    state::AppState,
    storage::BlinkStore,
};

#[derive(Deserialize)]
pub struct UpdateBlinkRequest {
    pub redirect_url: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn blink_info<Store>(
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

    Ok(Json(blink))
}

/// Replace the target of an existing blink. Unlike create, no scheme is
/// assumed: the new target must already be absolute.
pub async fn update_blink<Store>(
    Path(blink_url): Path<String>,
    State(state): State<AppState<Store>>,
    body: Result<Json<UpdateBlinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    let blink_url = path_blink_url(&blink_url)?;

    // An unknown blink is reported before anything is said about the body.
    if state.store.get_blink(&blink_url).await?.is_none() {
        return Err(ApiError::NotFound);
    }

    let Json(body) = body?;
    let redirect_url = body
        .redirect_url
        .ok_or(ApiError::BadRequest("redirect_url is required"))?;
    let redirect_url = redirect_url.trim();
    if !is_valid_redirect_url(redirect_url) {
        return Err(ApiError::BadRequest("Invalid redirect_url format"));
    }

    // Deleted since the existence check
    let blink = state
        .store
        .update_redirect_url(&blink_url, redirect_url)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(
        blink_url = %blink.blink_url,
        redirect_url = %blink.redirect_url,
        "Blink updated"
    );

    Ok(Json(BlinkWithMessage {
        blink,
        message: "Blink updated successfully",
    }))
}

pub async fn delete_blink<Store>(
    Path(blink_url): Path<String>,
    State(state): State<AppState<Store>>,
) -> Result<impl IntoResponse, ApiError>
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    let blink_url = path_blink_url(&blink_url)?;

    if !state.store.delete_blink(&blink_url).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(blink_url = %blink_url, "Blink deleted");

    Ok(Json(MessageResponse {
        message: "Blink deleted successfully",
    }))
}
