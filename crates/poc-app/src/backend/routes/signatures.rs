use std::sync::Arc;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use poc_core::signature::{SignatureDraft, SignatureResult};
use crate::backend::state::GatewayState;
use crate::error::ApiError;

pub async fn create_signatures(
    State(state): State<Arc<GatewayState>>,
    draft: Result<Json<SignatureDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SignatureResult>), ApiError> {
    let Json(draft) = draft?;
    let request = draft.build()?;
    let result = state.client.create(&request).await?;

    Ok((StatusCode::CREATED, Json(result)))
}
