use thiserror::Error;

/// Typed form of a failed envelope, for callers that prefer `Result`.
///
/// Every variant carries the message meant for the user: the server's
/// `message` when it sent one, otherwise the caller's default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("{0}")]
    ServerError(String),

    #[error("{0}")]
    Network(String),
}

/// Maximum length for messages taken from response bodies
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a message to avoid surfacing an entire error page
    fn truncate_body(body: &str) -> String {
        if body.chars().count() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let head: String = body.chars().take(MAX_ERROR_BODY_LENGTH).collect();
            format!("{}... (truncated, {} total bytes)", head, body.len())
        }
    }

    pub fn from_status(status: u16, message: &str) -> Self {
        let message = Self::truncate_body(message);
        match status {
            0 => ApiError::Network(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::AccessDenied(message),
            404 => ApiError::NotFound(message),
            500..=599 => ApiError::ServerError(message),
            _ => ApiError::Rejected { status, message },
        }
    }

    /// HTTP status behind the error; 0 for transport failures.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::AccessDenied(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Rejected { status, .. } => *status,
            ApiError::ServerError(_) => 500,
            ApiError::Network(_) => 0,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Unauthorized(m)
            | ApiError::AccessDenied(m)
            | ApiError::NotFound(m)
            | ApiError::ServerError(m)
            | ApiError::Network(m) => m,
            ApiError::Rejected { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert_eq!(ApiError::from_status(0, "x"), ApiError::Network("x".to_string()));
        assert_eq!(ApiError::from_status(401, "x"), ApiError::Unauthorized("x".to_string()));
        assert_eq!(ApiError::from_status(403, "x"), ApiError::AccessDenied("x".to_string()));
        assert_eq!(ApiError::from_status(404, "x"), ApiError::NotFound("x".to_string()));
        assert_eq!(ApiError::from_status(503, "x"), ApiError::ServerError("x".to_string()));
        assert_eq!(
            ApiError::from_status(422, "Title taken"),
            ApiError::Rejected {
                status: 422,
                message: "Title taken".to_string()
            }
        );
    }

    #[test]
    fn test_display_is_the_message() {
        let err = ApiError::from_status(422, "Title taken");
        assert_eq!(err.to_string(), "Title taken");
        assert_eq!(err.status(), 422);
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let err = ApiError::from_status(500, &body);
        assert!(err.message().starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(err.message().ends_with("(truncated, 510 total bytes)"));
    }
}
