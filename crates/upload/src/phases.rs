//! The three network phases of a file upload.
//!
//! Each operation wraps one logical step of the hand-off protocol,
//! translates transport results into [`UploadError`] and reports its own
//! start, success and failure as events.

use std::future::Future;
use std::sync::Arc;

use mediadrop_protocol::{
    CompleteUploadRequest, CompleteUploadResponse, GenerateUploadUrlRequest,
    GenerateUploadUrlResponse, UPLOAD_FIELD_NAME,
};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::UploaderConfig;
use crate::error::{TransportError, UploadError};
use crate::events::{EventSink, Phase, UploadEvent};
use crate::progress::ProgressTracker;
use crate::transport::{FilePart, HttpResponse, ProgressFn, Transport};
use crate::types::{FileDescriptor, FinalizedAsset, UploadCandidate, UploadTarget};

/// Runs phase operations for the file at `index` of a batch.
pub struct PhaseOps<'a> {
    transport: &'a dyn Transport,
    config: &'a UploaderConfig,
    events: &'a EventSink,
    index: usize,
}

impl<'a> PhaseOps<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        config: &'a UploaderConfig,
        events: &'a EventSink,
        index: usize,
    ) -> Self {
        Self {
            transport,
            config,
            events,
            index,
        }
    }

    /// Asks the control endpoint where to put the file.
    ///
    /// `content_type` is the effective type computed during validation.
    pub async fn request_upload_target(
        &self,
        candidate: &UploadCandidate,
        content_type: &str,
    ) -> Result<UploadTarget, UploadError> {
        const PHASE: Phase = Phase::RequestTarget;

        let request = GenerateUploadUrlRequest {
            file_name: candidate.name.clone(),
            mime_type: content_type.to_string(),
        };
        let url = &self.config.endpoints.generate_upload_url;

        self.observe(
            PHASE,
            async {
                let payload = to_payload(&request)?;
                let resp = self
                    .transport
                    .post_json(url, &payload)
                    .await
                    .map_err(network(PHASE))?;
                let parsed: GenerateUploadUrlResponse = parse_success(PHASE, resp)?;
                target_from_response(parsed)
            },
            |target| format!("upload url issued ({} chars)", target.upload_url.len()),
        )
        .await
    }

    /// Streams the file to the target as multipart field `file`.
    ///
    /// Progress is reported for every chunk when the size is known. Any 2xx
    /// answer counts as success; its body is not inspected.
    pub async fn transfer_bytes(
        &self,
        target: &UploadTarget,
        candidate: &UploadCandidate,
        content_type: &str,
    ) -> Result<(), UploadError> {
        const PHASE: Phase = Phase::Transfer;

        let tracker = Arc::new(ProgressTracker::new(self.index, self.events.clone()));
        let progress: ProgressFn = {
            let tracker = Arc::clone(&tracker);
            Arc::new(move |sent: u64, total: Option<u64>| tracker.record(sent, total))
        };
        let part = FilePart {
            field_name: UPLOAD_FIELD_NAME.to_string(),
            file_name: candidate.name.clone(),
            content_type: content_type.to_string(),
            length: candidate.known_size(),
            source: candidate.source.clone(),
        };

        debug!(
            index = self.index,
            file = %candidate.name,
            bytes = candidate.size,
            "starting transfer"
        );

        self.observe(
            PHASE,
            async {
                let resp = self
                    .transport
                    .post_multipart(&target.upload_url, part, progress)
                    .await
                    .map_err(network(PHASE))?;
                let resp = check_status(PHASE, resp)?;
                Ok(resp.status)
            },
            |status| format!("status {status}"),
        )
        .await
        .map(|_| ())
    }

    /// Registers the transferred file, sending only the descriptor.
    pub async fn finalize_upload(
        &self,
        target: &UploadTarget,
    ) -> Result<FinalizedAsset, UploadError> {
        const PHASE: Phase = Phase::Finalize;

        let request = CompleteUploadRequest {
            file_descriptor: target.descriptor.as_value().clone(),
        };
        let url = &self.config.endpoints.complete_upload;

        self.observe(
            PHASE,
            async {
                let payload = to_payload(&request)?;
                let resp = self
                    .transport
                    .post_json(url, &payload)
                    .await
                    .map_err(network(PHASE))?;
                let parsed: CompleteUploadResponse = parse_success(PHASE, resp)?;
                asset_from_response(parsed)
            },
            |asset| format!("file id {}", asset.id),
        )
        .await
    }

    /// Reports a phase around `work`, racing it against the configured deadline.
    async fn observe<T, F>(
        &self,
        phase: Phase,
        work: F,
        detail: impl FnOnce(&T) -> String,
    ) -> Result<T, UploadError>
    where
        F: Future<Output = Result<T, UploadError>>,
    {
        self.events.emit(UploadEvent::PhaseStarted {
            index: self.index,
            phase,
        });
        debug!(index = self.index, %phase, "phase started");

        let result = match self.config.phase_timeout {
            Some(limit) => match tokio::time::timeout(limit, work).await {
                Ok(result) => result,
                Err(_) => Err(UploadError::Network {
                    phase,
                    message: format!("no response within {} ms", limit.as_millis()),
                }),
            },
            None => work.await,
        };

        match &result {
            Ok(value) => {
                let detail = detail(value);
                debug!(index = self.index, %phase, %detail, "phase succeeded");
                self.events.emit(UploadEvent::PhaseSucceeded {
                    index: self.index,
                    phase,
                    detail,
                });
            }
            Err(err) => {
                warn!(index = self.index, %phase, error = %err, "phase failed");
                self.events.emit(UploadEvent::PhaseFailed {
                    index: self.index,
                    phase,
                    status: err.status(),
                    message: err.to_string(),
                });
            }
        }
        result
    }
}

fn network(phase: Phase) -> impl FnOnce(TransportError) -> UploadError {
    move |err| UploadError::Network {
        phase,
        message: err.0,
    }
}

fn to_payload<T: serde::Serialize>(request: &T) -> Result<serde_json::Value, UploadError> {
    serde_json::to_value(request)
        .map_err(|e| UploadError::Validation(format!("cannot encode request: {e}")))
}

fn check_status(phase: Phase, resp: HttpResponse) -> Result<HttpResponse, UploadError> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(UploadError::Protocol {
            phase,
            status: resp.status,
            body: resp.body,
        })
    }
}

fn parse_success<T: DeserializeOwned>(phase: Phase, resp: HttpResponse) -> Result<T, UploadError> {
    let resp = check_status(phase, resp)?;
    serde_json::from_str(&resp.body)
        .map_err(|e| UploadError::Validation(format!("malformed {phase} response: {e}")))
}

fn target_from_response(resp: GenerateUploadUrlResponse) -> Result<UploadTarget, UploadError> {
    let upload_url = resp
        .upload_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| UploadError::Validation("generateUploadUrl returned no uploadUrl".into()))?;
    let descriptor = FileDescriptor::new(resp.file_descriptor).ok_or_else(|| {
        UploadError::Validation("generateUploadUrl returned no fileDescriptor".into())
    })?;
    Ok(UploadTarget {
        upload_url,
        descriptor,
    })
}

fn asset_from_response(resp: CompleteUploadResponse) -> Result<FinalizedAsset, UploadError> {
    let file = resp
        .file
        .ok_or_else(|| UploadError::Validation("completeUpload returned no file".into()))?;
    if file.id.is_empty() {
        return Err(UploadError::Validation(
            "completeUpload returned a file without _id".into(),
        ));
    }
    Ok(FinalizedAsset {
        id: file.id,
        file_name: file.file_name,
        mime_type: file.mime_type,
        media_type: file.media_type,
        extra: file.extra,
    })
}
