//! Scripted transport shared by the orchestration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;

use crate::error::TransportError;
use crate::transport::{FilePart, HttpResponse, ProgressFn, Transport, TransportFuture};
use crate::types::UploadCandidate;

type Scripted = Result<HttpResponse, TransportError>;

/// An upload as the mock received it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedUpload {
    pub url: String,
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub length: Option<u64>,
    pub data: Vec<u8>,
}

/// Transport answering from two FIFO scripts: one for JSON calls, one for
/// uploads. An empty script answers with a transport error.
pub(crate) struct MockTransport {
    json_responses: Mutex<VecDeque<Scripted>>,
    upload_responses: Mutex<VecDeque<Scripted>>,
    json_calls: Mutex<Vec<(String, Value)>>,
    uploads: Mutex<Vec<RecordedUpload>>,
    chunk_size: usize,
    gate: Option<Arc<Semaphore>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            json_responses: Mutex::new(VecDeque::new()),
            upload_responses: Mutex::new(VecDeque::new()),
            json_calls: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            chunk_size: 512,
            gate: None,
        }
    }

    /// Every JSON call waits for a permit from `gate` first.
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn push_json(&self, status: u16, body: Value) {
        self.push_json_raw(status, &body.to_string());
    }

    pub fn push_json_raw(&self, status: u16, body: &str) {
        self.json_responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_json_error(&self, message: &str) {
        self.json_responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.into())));
    }

    pub fn push_upload(&self, status: u16, body: &str) {
        self.upload_responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_upload_error(&self, message: &str) {
        self.upload_responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError(message.into())));
    }

    /// Scripts a full successful run for one file.
    pub fn script_success(&self, upload_url: &str, descriptor: Value, asset: Value) {
        self.push_json(
            200,
            json!({"uploadUrl": upload_url, "fileDescriptor": descriptor}),
        );
        self.push_upload(200, "");
        self.push_json(200, json!({"file": asset}));
    }

    pub fn json_calls(&self) -> Vec<(String, Value)> {
        self.json_calls.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.json_calls.lock().unwrap().len() + self.uploads.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn post_json<'a>(&'a self, url: &'a str, body: &'a Value) -> TransportFuture<'a> {
        self.json_calls
            .lock()
            .unwrap()
            .push((url.to_string(), body.clone()));

        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.acquire()
                    .await
                    .map_err(|e| TransportError(e.to_string()))?
                    .forget();
            }
            let next = self.json_responses.lock().unwrap().pop_front();
            next.unwrap_or_else(|| Err(TransportError("no scripted json response".into())))
        })
    }

    fn post_multipart<'a>(
        &'a self,
        url: &'a str,
        part: FilePart,
        progress: ProgressFn,
    ) -> TransportFuture<'a> {
        Box::pin(async move {
            let mut reader = part.source.open().await?;
            let mut data = Vec::new();
            reader.read_to_end(&mut data).await?;

            let next = self.upload_responses.lock().unwrap().pop_front();
            let response =
                next.unwrap_or_else(|| Err(TransportError("no scripted upload response".into())));

            // A transport error means nothing reached the server.
            if response.is_ok() {
                let mut sent = 0u64;
                progress(sent, part.length);
                for chunk in data.chunks(self.chunk_size) {
                    sent += chunk.len() as u64;
                    progress(sent, part.length);
                }
            }

            self.uploads.lock().unwrap().push(RecordedUpload {
                url: url.to_string(),
                field_name: part.field_name,
                file_name: part.file_name,
                content_type: part.content_type,
                length: part.length,
                data,
            });
            response
        })
    }
}

/// SVG candidate of `size` bytes with no declared content type.
pub(crate) fn svg(name: &str, size: usize) -> UploadCandidate {
    UploadCandidate::from_bytes(name, "", vec![b'<'; size])
}

/// Asset record as the completion endpoint returns it.
pub(crate) fn asset_json(id: &str, file_name: &str) -> Value {
    json!({
        "_id": id,
        "fileName": file_name,
        "mimeType": "image/svg+xml",
        "mediaType": "Image",
    })
}
