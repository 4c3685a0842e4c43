use portfolio_models::contact::ContactSubmissionDraft;
use serde::Deserialize;

/// Raw contact form payload. Fields default to empty strings so an absent
/// field fails the presence rule instead of deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl From<ApiContactSubmission> for ContactSubmissionDraft {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}
