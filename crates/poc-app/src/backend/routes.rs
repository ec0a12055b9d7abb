use std::sync::Arc;
use axum::Router;
use axum::routing::{get, post};
use crate::backend::routes::signatures::create_signatures;
use crate::backend::routes::status::{get_status, heartbeat};
use crate::backend::state::GatewayState;

mod signatures;
mod status;

pub fn api_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        .route("/heartbeat", get(heartbeat))
        .route("/status", get(get_status))
        .route("/signatures/create", post(create_signatures))
}
