mod callback;
mod orders;
mod redeem;
mod verify;

pub use callback::*;
pub use orders::*;
pub use redeem::*;
pub use verify::*;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", post(create_order))
        .route("/verify", post(verify_payment))
        // PayU posts the redirect callback as form-urlencoded
        .route("/payu/callback", post(payu_callback))
        .route("/activate", post(activate_plan))
}
