use axum::{
    extract::{FromRequest, Json, Request, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    blink::{Blink, is_valid_redirect_url, normalize_blink_url, with_default_scheme},
    error::ApiError,
    routes::BlinkWithMessage,
    state::AppState,
    storage::BlinkStore,
};

#[derive(Deserialize)]
pub struct CreateBlinkRequest {
    pub redirect_url: Option<String>,
    pub blink_url: Option<String>,
}

/// Create input after normalization: lowercase id, scheme-qualified target.
pub struct ValidatedCreateRequest {
    blink_url: String,
    redirect_url: String,
}

pub async fn create_blink<Store>(
    State(state): State<AppState<Store>>,
    request_body: ValidatedCreateRequest,
) -> Result<impl IntoResponse, ApiError>
where
    Store: BlinkStore + Clone + Send + Sync + 'static,
{
    let blink = Blink::new(request_body.blink_url, request_body.redirect_url);

    if !state.store.insert_blink(&blink).await? {
        return Err(ApiError::Conflict);
    }

    tracing::info!(
        blink_url = %blink.blink_url,
        redirect_url = %blink.redirect_url,
        "Blink created"
    );

    Ok((
        StatusCode::CREATED,
        Json(BlinkWithMessage {
            blink,
            message: "Blink created successfully",
        }),
    ))
}

impl<S> FromRequest<S> for ValidatedCreateRequest
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<CreateBlinkRequest>::from_request(req, state).await?;

        let (Some(redirect_url), Some(blink_url)) = (body.redirect_url, body.blink_url) else {
            return Err(ApiError::BadRequest(
                "Both redirect_url and blink_url are required",
            ));
        };

        let blink_url = normalize_blink_url(&blink_url)
            .ok_or(ApiError::BadRequest("Invalid blink_url format"))?;

        let redirect_url = with_default_scheme(&redirect_url);
        if !is_valid_redirect_url(&redirect_url) {
            return Err(ApiError::BadRequest("Invalid redirect_url format"));
        }

        Ok(ValidatedCreateRequest {
            blink_url,
            redirect_url,
        })
    }
}
