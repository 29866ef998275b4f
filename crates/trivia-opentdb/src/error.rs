//! Client error types.

use thiserror::Error;
use trivia_core::error::DomainError;

/// Failures talking to the Open Trivia Database.
#[derive(Debug, Error)]
pub enum OpenTdbError {
    /// The HTTP request failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A response body is not the expected JSON.
    #[error("invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-2xx status and no usable body.
    #[error("unexpected status {0}")]
    Status(u16),

    /// A base64 field could not be decoded.
    #[error("field `{field}` is not valid base64: {source}")]
    Base64 {
        /// The offending field.
        field: &'static str,
        /// The decoder error.
        source: base64::DecodeError,
    },

    /// A decoded field is not UTF-8.
    #[error("field `{field}` is not valid UTF-8")]
    Utf8 {
        /// The offending field.
        field: &'static str,
    },

    /// A field held a value outside its known set.
    #[error("unknown {field}: {value}")]
    UnknownValue {
        /// The offending field.
        field: &'static str,
        /// The value received.
        value: String,
    },
}

impl From<OpenTdbError> for DomainError {
    fn from(err: OpenTdbError) -> Self {
        DomainError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_surface_as_infrastructure() {
        let err = OpenTdbError::UnknownValue {
            field: "difficulty",
            value: "extreme".into(),
        };

        let domain: DomainError = err.into();

        match domain {
            DomainError::Infrastructure(msg) => assert_eq!(msg, "unknown difficulty: extreme"),
            other => panic!("expected Infrastructure, got {other:?}"),
        }
    }
}
