use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod contact;

/// Envelope for every successful JSON response.
#[derive(Debug, Serialize)]
pub struct ApiSuccessResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ApiSuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Envelope for every error JSON response.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ApiErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            retry_after: None,
            path: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_retry_after(self, seconds: u64) -> Self {
        Self {
            retry_after: Some(format!("{seconds} seconds")),
            ..self
        }
    }

    pub fn with_path(self, path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_skips_empty_fields() {
        let value = serde_json::to_value(ApiErrorResponse::new("nope")).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["success"], false);
        assert_eq!(object["error"], "nope");
        assert!(!object.contains_key("retryAfter"));
        assert!(!object.contains_key("path"));
        assert!(object.contains_key("timestamp"));
    }

    #[test]
    fn retry_after_is_rendered_in_seconds() {
        let value =
            serde_json::to_value(ApiErrorResponse::new("slow down").with_retry_after(42)).unwrap();

        assert_eq!(value["retryAfter"], "42 seconds");
    }
}
