use std::sync::Arc;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use crate::backend::schemas::StatusResponse;
use crate::backend::state::GatewayState;

pub async fn heartbeat() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn get_status(State(state): State<Arc<GatewayState>>) -> Json<StatusResponse> {
    Json(state.client.status().await.into())
}
