use axum::{
    Router,
    routing::{get, post, put},
};
use serde::Serialize;

use crate::blink::{Blink, normalize_blink_url};
use crate::error::ApiError;
use crate::state::AppState;
use crate::storage::BlinkStore;

pub mod create;
pub mod health;
pub mod index;
pub mod list;
pub mod manage;
pub mod redirect;

/// Build router with all routes configured
pub fn build_router<Store>(state: AppState<Store>) -> Router
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(health::health_check::<Store>))
        .route("/create-blink", post(create::create_blink::<Store>))
        .route("/b/{blink_url}", get(redirect::redirect::<Store>))
        .route("/blinks", get(list::list_blinks::<Store>))
        .route("/blink/{blink_url}/info", get(manage::blink_info::<Store>))
        .route(
            "/blink/{blink_url}",
            put(manage::update_blink::<Store>).delete(manage::delete_blink::<Store>),
        )
        .with_state(state)
}

/// A blink plus a human-readable outcome, returned by create and update.
#[derive(Serialize)]
pub struct BlinkWithMessage {
    #[serde(flatten)]
    pub blink: Blink,
    pub message: &'static str,
}

/// Normalize a blink id taken from the path. Ids that can never be stored
/// cannot be found either.
pub(crate) fn path_blink_url(raw: &str) -> Result<String, ApiError> {
    normalize_blink_url(raw).ok_or(ApiError::NotFound)
}
