use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - token may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    /// Pull the human-readable message out of an error body.
    /// The backend reports failures as `{"detail": ...}`; anything else is used verbatim.
    fn error_message(body: &str) -> String {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| value.get("detail").cloned());
        match detail {
            Some(serde_json::Value::String(text)) => Self::truncate_body(&text),
            Some(other) => Self::truncate_body(&other.to_string()),
            None => Self::truncate_body(body),
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = Self::error_message(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            429 => ApiError::RateLimited,
            code @ 500..=599 => ApiError::ServerError { status: code, message },
            code => ApiError::Rejected { status: code, message },
        }
    }

    /// HTTP status behind this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::AccessDenied(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::RateLimited => Some(429),
            ApiError::ServerError { status, .. } | ApiError::Rejected { status, .. } => Some(*status),
            ApiError::Network(err) => err.status().map(|s| s.as_u16()),
            ApiError::InvalidResponse(_) | ApiError::InvalidConfig(_) | ApiError::Io(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}
