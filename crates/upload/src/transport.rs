//! Transport abstraction.
//!
//! `Transport` is the only place that touches the network. Keeping it a
//! trait lets the phase logic run against a mock in tests and against
//! [`HttpTransport`](crate::HttpTransport) in production.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::error::TransportError;
use crate::types::CandidateSource;

/// Future returned by [`Transport`] calls.
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + Send + 'a>>;

/// Called with `(bytes_sent, total_bytes)` as body chunks are handed to the wire.
pub type ProgressFn = Arc<dyn Fn(u64, Option<u64>) + Send + Sync>;

/// A completed HTTP exchange. Any status, including errors, lands here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The single file part of a multipart upload body.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    /// Exact body length, when known up front.
    pub length: Option<u64>,
    pub source: CandidateSource,
}

/// Network calls the upload phases are built on.
pub trait Transport: Send + Sync {
    /// POSTs `body` as JSON and returns the response, whatever its status.
    fn post_json<'a>(&'a self, url: &'a str, body: &'a serde_json::Value) -> TransportFuture<'a>;

    /// POSTs a multipart form holding `part`, reporting progress as it streams.
    fn post_multipart<'a>(
        &'a self,
        url: &'a str,
        part: FilePart,
        progress: ProgressFn,
    ) -> TransportFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(!HttpResponse::new(300, "").is_success());
        assert!(!HttpResponse::new(500, "boom").is_success());
    }
}
