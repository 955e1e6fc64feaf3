//! Upload error types.

use crate::events::Phase;

/// Longest response body excerpt kept in [`UploadError`]'s display text.
const BODY_EXCERPT_LEN: usize = 200;

/// Errors produced while uploading a file.
///
/// Every failure is one of three kinds: a local precondition that failed
/// before or between network calls, a transport that could not complete a
/// call, or a remote that answered with a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("network error during {phase}: {message}")]
    Network { phase: Phase, message: String },

    #[error("{phase} failed with HTTP {status}{}", body_excerpt(.body))]
    Protocol {
        phase: Phase,
        status: u16,
        body: String,
    },
}

impl UploadError {
    /// HTTP status of a protocol failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            UploadError::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Phase the error was raised in, if any network phase had started.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            UploadError::Validation(_) => None,
            UploadError::Network { phase, .. } | UploadError::Protocol { phase, .. } => {
                Some(*phase)
            }
        }
    }

    /// Whether the caller may reasonably try the same file again.
    ///
    /// Only transport failures qualify; nothing is retried automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(self, UploadError::Network { .. })
    }
}

fn body_excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((cut, _)) => format!(": {}...", &trimmed[..cut]),
        None => format!(": {trimmed}"),
    }
}

/// Failure of a transport call before any response was available.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest hides the root cause (DNS, refused, timeout) behind `source`.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        TransportError(message)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        TransportError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_display_includes_status_and_body() {
        let err = UploadError::Protocol {
            phase: Phase::Transfer,
            status: 500,
            body: "internal error\n".into(),
        };
        assert_eq!(err.to_string(), "upload failed with HTTP 500: internal error");
        assert_eq!(err.status(), Some(500));
        assert!(!err.is_retryable());
    }

    #[test]
    fn protocol_display_without_body() {
        let err = UploadError::Protocol {
            phase: Phase::Finalize,
            status: 404,
            body: String::new(),
        };
        assert_eq!(err.to_string(), "completeUpload failed with HTTP 404");
    }

    #[test]
    fn long_bodies_are_truncated() {
        let err = UploadError::Protocol {
            phase: Phase::RequestTarget,
            status: 502,
            body: "x".repeat(1000),
        };
        let msg = err.to_string();
        assert!(msg.ends_with("..."));
        assert!(msg.len() < 300, "message too long: {}", msg.len());
    }

    #[test]
    fn network_errors_are_retryable() {
        let err = UploadError::Network {
            phase: Phase::RequestTarget,
            message: "connection refused".into(),
        };
        assert!(err.is_retryable());
        assert_eq!(err.phase(), Some(Phase::RequestTarget));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_has_no_phase() {
        let err = UploadError::Validation("no files selected".into());
        assert_eq!(err.phase(), None);
        assert_eq!(err.to_string(), "validation failed: no files selected");
    }
}
