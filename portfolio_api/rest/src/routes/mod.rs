use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiErrorResponse;

pub mod contact;
pub mod health;

pub(crate) fn error(code: StatusCode, message: impl Into<String>) -> Response {
    (code, Json(ApiErrorResponse::new(message))).into_response()
}

pub(crate) fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

pub(crate) async fn not_found(OriginalUri(uri): OriginalUri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorResponse::new("Route not found").with_path(uri.path())),
    )
        .into_response()
}
