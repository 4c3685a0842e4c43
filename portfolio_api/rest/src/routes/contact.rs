use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use portfolio_core_contact_contracts::{ContactService, ContactSubmitError};

use super::{error, internal_server_error};
use crate::{
    middlewares::client_ip::ClientIp,
    models::{contact::ApiContactSubmission, ApiErrorResponse, ApiSuccessResponse},
};

pub fn router(service: Arc<impl ContactService>) -> Router<()> {
    Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service)
}

async fn submit(
    service: State<Arc<impl ContactService>>,
    Extension(client_ip): Extension<ClientIp>,
    Json(submission): Json<ApiContactSubmission>,
) -> Response {
    match service.submit(client_ip.0, submission.into()).await {
        Ok(()) => Json(ApiSuccessResponse::new("Message sent successfully!")).into_response(),
        Err(ContactSubmitError::RateLimited { retry_after }) => {
            let seconds = retry_after.as_secs();
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, seconds.to_string())],
                Json(
                    ApiErrorResponse::new("Too many requests. Please try again later.")
                        .with_retry_after(seconds),
                ),
            )
                .into_response()
        }
        Err(ContactSubmitError::Invalid(err)) => error(StatusCode::BAD_REQUEST, err.to_string()),
        Err(ContactSubmitError::Send) => error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to send your message. Please try again in a few minutes.",
        ),
        Err(ContactSubmitError::Other(err)) => internal_server_error(err),
    }
}
