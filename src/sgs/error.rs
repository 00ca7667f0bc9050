//! Error types for the storage-gateway client.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Result alias used throughout the client.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum length of a server message carried in an error
const MAX_MESSAGE_LENGTH: usize = 200;

/// Errors raised by the client library.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// No resource at that id or name.
    #[error("{message}")]
    NotFound {
        /// Server message, or a description of the failed lookup.
        message: String,
    },
    /// A name resolved to more than one resource.
    #[error("Multiple {kind} matches found for '{reference}', use an ID to be more specific.")]
    NoUniqueMatch {
        /// Display name of the resource kind.
        kind: String,
        /// Name supplied by the caller.
        reference: String,
    },
    /// Client-side validation failed before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The server answered with a 4xx status other than 404, or with an
    /// unexpected non-success status outside 4xx and 5xx.
    #[error("{message} (HTTP {status})")]
    Client {
        /// HTTP status code.
        status: u16,
        /// Fault message returned by the server.
        message: String,
    },
    /// The server answered with a 5xx status.
    #[error("{message} (HTTP {status})")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Fault message returned by the server.
        message: String,
    },
    /// The request never completed (connection refused, timeout, ...).
    #[error("connection failed: {0}")]
    Connection(String),
    /// The response body could not be interpreted.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A CLI command failed as a whole.
    #[error("{0}")]
    Command(String),
}

impl Error {
    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = fault_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

        match status.as_u16() {
            404 => Self::NotFound { message },
            code @ 500..=599 => Self::Server {
                status: code,
                message,
            },
            code => Self::Client {
                status: code,
                message,
            },
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Client { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when a lookup by id should fall back to a lookup by name.
    ///
    /// The server answers 404 for unknown ids and 400 for strings that are
    /// not valid ids at all.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Client { status: 400, .. })
    }

    /// Short advice for the user, shown below the error by the CLI.
    pub fn hint(&self) -> Option<&'static str> {
        match self.status()? {
            401 => Some("Authentication failed. Check --auth-token or SGS_AUTH_TOKEN."),
            403 => Some("Permission denied for this operation."),
            404 => Some("Resource not found. Check the name or ID."),
            409 => Some("Resource conflict. The resource may be in use or in a transitional state."),
            429 => Some("Rate limit exceeded. Please try again later."),
            500..=599 => Some("The storage-gateway service failed to handle the request."),
            _ => None,
        }
    }
}

/// Extract the message from a fault body.
///
/// Faults come either as `{"<faultName>": {"message": ..., "code": ...}}` or
/// as `{"error": {"message": ...}}`. Anything else is reported as the
/// sanitized raw body.
fn fault_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
        let message = map.values().find_map(|fault| {
            fault
                .get("message")
                .and_then(|m| m.as_str())
                .map(|m| m.to_string())
        });
        if message.is_some() {
            return message;
        }
    }

    let cleaned = sanitize(trimmed);
    (!cleaned.trim().is_empty()).then_some(cleaned)
}

/// Truncate and strip control characters from a server supplied string
pub(crate) fn sanitize(body: &str) -> String {
    let cleaned: String = body
        .chars()
        .filter(|c| !c.is_control())
        .collect();

    if cleaned.chars().count() > MAX_MESSAGE_LENGTH {
        let truncated: String = cleaned.chars().take(MAX_MESSAGE_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", truncated, body.len())
    } else {
        cleaned
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Connection(error.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

/// Failures writing CLI output
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Command(format!("failed to write output: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_404_maps_to_not_found_with_fault_message() {
        let body = r#"{"itemNotFound": {"message": "Volume vol-1 could not be found.", "code": 404}}"#;
        let err = Error::from_status(StatusCode::NOT_FOUND, body);
        assert_eq!(
            err,
            Error::NotFound {
                message: "Volume vol-1 could not be found.".to_string()
            }
        );
        assert!(err.is_lookup_miss());
    }

    #[test]
    fn test_4xx_maps_to_client_error() {
        let body = r#"{"error": {"message": "Invalid volume status"}}"#;
        let err = Error::from_status(StatusCode::CONFLICT, body);
        assert_eq!(
            err,
            Error::Client {
                status: 409,
                message: "Invalid volume status".to_string()
            }
        );
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_lookup_miss());
    }

    #[test]
    fn test_400_is_a_lookup_miss() {
        let err = Error::from_status(StatusCode::BAD_REQUEST, "");
        assert!(err.is_lookup_miss());
    }

    #[test]
    fn test_5xx_maps_to_server_error() {
        let err = Error::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            err,
            Error::Server {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
        assert!(err.hint().is_some());
    }

    #[test]
    fn test_plain_text_body_is_sanitized() {
        let body = format!("oops\n{}", "x".repeat(400));
        let err = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, &body);
        let Error::Server { message, .. } = err else {
            panic!("expected server error");
        };
        assert!(message.starts_with("oops"));
        assert!(message.contains("[truncated"));
        assert!(!message.contains('\n'));
    }

    #[test]
    fn test_non_ascii_body_is_kept() {
        let err = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, "卷不存在");
        assert_eq!(
            err,
            Error::Server {
                status: 500,
                message: "卷不存在".to_string()
            }
        );
        assert_eq!(err.to_string(), "卷不存在 (HTTP 500)");
    }

    #[test]
    fn test_long_non_ascii_body_is_truncated_by_chars() {
        let body = "é".repeat(300);
        let err = Error::from_status(StatusCode::BAD_GATEWAY, &body);
        let Error::Server { message, .. } = err else {
            panic!("expected server error");
        };
        assert!(message.starts_with(&"é".repeat(200)));
        assert!(!message.starts_with(&"é".repeat(201)));
        assert!(message.ends_with("[truncated, 600 bytes total]"));
    }

    #[test]
    fn test_control_only_body_falls_back_to_reason() {
        let err = Error::from_status(StatusCode::INTERNAL_SERVER_ERROR, "\u{7}\u{1b}");
        assert_eq!(
            err,
            Error::Server {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn test_redirect_status_is_not_a_server_error() {
        let err = Error::from_status(StatusCode::MULTIPLE_CHOICES, "");
        assert_eq!(
            err,
            Error::Client {
                status: 300,
                message: "Multiple Choices".to_string()
            }
        );
        assert_eq!(err.hint(), None);
    }

    #[test]
    fn test_validation_errors_carry_no_status() {
        let err = Error::InvalidInput("bad sort".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.hint(), None);
    }
}
