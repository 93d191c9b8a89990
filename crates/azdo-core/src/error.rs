//! Error types for azdo-tools.

use thiserror::Error;

/// Main error type for azdo operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication failed
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response or input could not be interpreted
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Map an HTTP status code and response body to an error.
    ///
    /// Azure DevOps answers a rejected PAT with `203 Non-Authoritative
    /// Information` and an HTML sign-in page rather than a 401.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            203 => Error::Auth(
                "Azure DevOps returned a sign-in page; the personal access token is invalid or expired"
                    .to_string(),
            ),
            401 | 403 => Error::Auth(message),
            404 => Error::NotFound(message),
            _ => Error::Api { status, message },
        }
    }

    /// Whether this error means the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

/// Result type alias for azdo operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_auth() {
        assert!(matches!(Error::from_status(401, "nope"), Error::Auth(_)));
        assert!(matches!(Error::from_status(403, "nope"), Error::Auth(_)));
    }

    #[test]
    fn test_from_status_sign_in_page() {
        let err = Error::from_status(203, "<html>Sign in</html>");
        match err {
            Error::Auth(msg) => assert!(msg.contains("personal access token")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_status_not_found() {
        let err = Error::from_status(404, "TF14045: changeset 999999 does not exist");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("999999"));
    }

    #[test]
    fn test_from_status_other() {
        match Error::from_status(500, "boom") {
            Error::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected api error, got {:?}", other),
        }
    }
}
