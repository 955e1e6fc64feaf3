//! `reqwest`-backed [`Transport`].

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;
use tracing::debug;

use crate::error::TransportError;
use crate::transport::{FilePart, HttpResponse, ProgressFn, Transport, TransportFuture};

/// Read size for streaming upload bodies.
const CHUNK_SIZE: usize = 64 * 1024;

/// Production transport over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport. `request_timeout` bounds each whole request.
    pub fn new(request_timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("mediadrop/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    async fn send_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, TransportError> {
        debug!(%url, "POST json");
        let resp = self.http.post(url).json(body).send().await?;
        read_response(resp).await
    }

    async fn send_multipart(
        &self,
        url: &str,
        part: FilePart,
        progress: ProgressFn,
    ) -> Result<HttpResponse, TransportError> {
        let reader = part.source.open().await?;
        let total = part.length;
        progress(0, total);

        let mut sent: u64 = 0;
        let stream = ReaderStream::with_capacity(reader, CHUNK_SIZE).map(move |chunk| {
            if let Ok(bytes) = &chunk {
                sent += bytes.len() as u64;
                progress(sent, total);
            }
            chunk
        });
        let body = reqwest::Body::wrap_stream(stream);

        let file_part = match total {
            Some(length) => Part::stream_with_length(body, length),
            None => Part::stream(body),
        }
        .file_name(part.file_name)
        .mime_str(&part.content_type)?;
        let form = Form::new().part(part.field_name, file_part);

        debug!(%url, bytes = ?total, "POST multipart");
        let resp = self.http.post(url).multipart(form).send().await?;
        read_response(resp).await
    }
}

impl Transport for HttpTransport {
    fn post_json<'a>(&'a self, url: &'a str, body: &'a serde_json::Value) -> TransportFuture<'a> {
        Box::pin(self.send_json(url, body))
    }

    fn post_multipart<'a>(
        &'a self,
        url: &'a str,
        part: FilePart,
        progress: ProgressFn,
    ) -> TransportFuture<'a> {
        Box::pin(self.send_multipart(url, part, progress))
    }
}

/// Collects status and body. Error bodies are best effort: a failure to
/// read them leaves the body empty instead of hiding the status.
async fn read_response(resp: reqwest::Response) -> Result<HttpResponse, TransportError> {
    let status = resp.status();
    let body = if status.is_success() {
        resp.text().await?
    } else {
        resp.text().await.unwrap_or_default()
    };
    Ok(HttpResponse {
        status: status.as_u16(),
        body,
    })
}
