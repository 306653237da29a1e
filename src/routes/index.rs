use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "Blinks API is running!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "create_blink": "POST /create-blink",
            "get_redirect": "GET /b/{blink_url}",
            "list_blinks": "GET /blinks",
            "blink_info": "GET /blink/{blink_url}/info",
            "update_blink": "PUT /blink/{blink_url}",
            "delete_blink": "DELETE /blink/{blink_url}",
        }
    }))
}
