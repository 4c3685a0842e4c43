use std::{future::Future, net::IpAddr, time::Duration};

use portfolio_models::contact::{ContactSubmissionDraft, ContactValidateError};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactService: Send + Sync + 'static {
    /// Runs a contact form submission through the full pipeline: rate limit
    /// check, validation, owner notification and the optional auto-reply.
    fn submit(
        &self,
        client: IpAddr,
        draft: ContactSubmissionDraft,
    ) -> impl Future<Output = Result<(), ContactSubmitError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("Too many requests (retry after {}s).", retry_after.as_secs())]
    RateLimited { retry_after: Duration },
    #[error(transparent)]
    Invalid(#[from] ContactValidateError),
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
