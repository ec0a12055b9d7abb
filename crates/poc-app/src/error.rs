use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;
use thiserror::Error;
use poc_core::error::Error;
use crate::backend::schemas::ErrorResponse;

const TRY_AGAIN: &str = "an error occurred, please try again!";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] Error),
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        let e = match self {
            Self::Service(e) => e,
            Self::Body(rejection) => return (rejection.status(), rejection.body_text()),
        };
        match e {
            Error::EndpointUnreachable => (StatusCode::SERVICE_UNAVAILABLE, "systems down".into()),
            Error::InvalidRequest(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            e if e.is_transport() => (StatusCode::BAD_GATEWAY, TRY_AGAIN.into()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, TRY_AGAIN.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = self.status_and_message();
        warn!("Request failed with {status}: {self}");
        (status, Json(ErrorResponse { error })).into_response()
    }
}
