use thiserror::Error;

use crate::api::ApiError;

/// Why a sign-in or registration did not complete.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server refused or could not be reached
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server accepted the credentials but the session could not be saved
    #[error("Signed in, but the session could not be saved: {0}")]
    Storage(String),
}

impl AuthError {
    /// HTTP status behind the error; 0 when no response was involved.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::Api(e) => e.status(),
            AuthError::Storage(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let api: AuthError = ApiError::from_status(400, "Wrong password").into();
        assert_eq!(api.to_string(), "Wrong password");
        assert_eq!(api.status(), 400);

        let storage = AuthError::Storage("disk full".to_string());
        assert_eq!(
            storage.to_string(),
            "Signed in, but the session could not be saved: disk full"
        );
        assert_eq!(storage.status(), 0);
    }
}
