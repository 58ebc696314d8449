use serde::{Deserialize, Serialize};
use std::fmt;

/// Error body returned by the accounts service when a token request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthErrorResponse {
    pub error: String,
    #[serde(default)]
    pub error_description: String,
}

impl AuthErrorResponse {
    /// Builds an error from a rejected token response, whatever its body.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| AuthErrorResponse {
            error: status.to_string(),
            error_description: body.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub status: u16,
    pub message: String,
}

/// Error body returned by the Web API, `{"error": {"status": .., "message": ..}}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

impl ApiErrorResponse {
    /// Builds an error from a response whose body is not the usual JSON envelope.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| ApiErrorResponse {
            error: ApiErrorBody {
                status,
                message: body.trim().to_string(),
            },
        })
    }
}

#[derive(Debug)]
pub enum BsidesError {
    /// The token endpoint rejected the client credentials
    Auth(AuthErrorResponse),
    /// The Web API answered with a non-success status
    Api(ApiErrorResponse),
    /// Transport and decoding errors raised by the Spotify client
    Spotify(rspotify::ClientError),
    /// A catalog id that is not a base62 Spotify id
    InvalidId(String),
    /// Represents `.env` file errors
    Env(dotenv::Error),
    /// Represents malformed CSV input
    Csv(csv::Error),
    /// A CSV record is too short for the requested column positions
    InvalidRow {
        line: u64,
        expected: usize,
        found: usize,
    },
    /// Represents file I/O errors
    Io(std::io::Error),
    /// Represents missing environment variable errors
    MissingEnvVar(String),
    /// Represents other errors
    Other(String),
}

impl std::error::Error for BsidesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BsidesError::Spotify(e) => Some(e),
            BsidesError::Env(e) => Some(e),
            BsidesError::Csv(e) => Some(e),
            BsidesError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for BsidesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BsidesError::Auth(e) => write!(
                f,
                "Spotify authentication error {}: {}",
                e.error, e.error_description
            ),
            BsidesError::Api(e) => write!(
                f,
                "Spotify API error {}: {}",
                e.error.status, e.error.message
            ),
            BsidesError::Spotify(e) => write!(f, "Spotify client error: {e}"),
            BsidesError::InvalidId(id) => write!(f, "Invalid Spotify id: {id:?}"),
            BsidesError::Env(e) => write!(f, "Environment file error: {e}"),
            BsidesError::Csv(e) => write!(f, "CSV error: {e}"),
            BsidesError::InvalidRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "CSV error: line {line} has {found} fields, expected at least {expected}"
            ),
            BsidesError::Io(e) => write!(f, "I/O error: {e}"),
            BsidesError::MissingEnvVar(var) => write!(
                f,
                "Missing required environment variable: {var}\n\
                 Please set it in your environment or .env file"
            ),
            BsidesError::Other(e) => write!(f, "Error: {e}"),
        }
    }
}

impl From<rspotify::ClientError> for BsidesError {
    fn from(err: rspotify::ClientError) -> Self {
        BsidesError::Spotify(err)
    }
}

impl From<dotenv::Error> for BsidesError {
    fn from(err: dotenv::Error) -> Self {
        BsidesError::Env(err)
    }
}

impl From<csv::Error> for BsidesError {
    fn from(err: csv::Error) -> Self {
        BsidesError::Csv(err)
    }
}

impl From<std::io::Error> for BsidesError {
    fn from(err: std::io::Error) -> Self {
        BsidesError::Io(err)
    }
}

/// Helper type for Result with `BsidesError`
pub type Result<T> = std::result::Result<T, BsidesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_from_json_body() {
        let body = r#"{"error": {"status": 400, "message": "invalid id"}}"#;
        let err = ApiErrorResponse::from_status(400, body);

        assert_eq!(err.error.status, 400);
        assert_eq!(err.error.message, "invalid id");
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let err = ApiErrorResponse::from_status(503, "Service Unavailable\n");

        assert_eq!(err.error.status, 503);
        assert_eq!(err.error.message, "Service Unavailable");
    }

    #[test]
    fn test_auth_error_from_oauth_body() {
        let body = r#"{"error": "invalid_client", "error_description": "Invalid client"}"#;
        let err = AuthErrorResponse::from_status(400, body);

        assert_eq!(err.error, "invalid_client");
        assert_eq!(err.error_description, "Invalid client");
    }

    #[test]
    fn test_auth_error_from_plain_body() {
        let err = AuthErrorResponse::from_status(401, "Unauthorized");

        assert_eq!(err.error, "401");
        assert_eq!(err.error_description, "Unauthorized");
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = BsidesError::MissingEnvVar("SPOTIPY_CLIENT_ID".to_string());

        assert!(err.to_string().contains("SPOTIPY_CLIENT_ID"));
    }
}
