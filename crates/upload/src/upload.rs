//! Per-file upload state machine.
//!
//! Drives one candidate through
//! `Validating → RequestingTarget → Transferring → Finalizing → Done`,
//! dropping into `Failed` from whichever state hits an error.

use tracing::{debug, error, info};

use crate::candidate::validate_candidate;
use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::events::{EventSink, FileState, UploadEvent};
use crate::phases::PhaseOps;
use crate::transport::Transport;
use crate::types::{FinalizedAsset, UploadCandidate, UploadOutcome};

/// Uploads single files. Holds no per-file state between calls.
pub struct FileUploader<'a> {
    transport: &'a dyn Transport,
    config: &'a UploaderConfig,
    events: &'a EventSink,
}

impl<'a> FileUploader<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        config: &'a UploaderConfig,
        events: &'a EventSink,
    ) -> Self {
        Self {
            transport,
            config,
            events,
        }
    }

    /// Runs the full pipeline for one file.
    ///
    /// Always yields exactly one outcome; failures are captured, not returned
    /// as errors. Progress is reset once the outcome is known.
    pub async fn upload(&self, index: usize, candidate: &UploadCandidate) -> UploadOutcome {
        self.events.emit(UploadEvent::FileStarted {
            index,
            name: candidate.name.clone(),
            size: candidate.size,
            content_type: candidate.content_type.clone(),
        });

        let outcome = match self.run(index, candidate).await {
            Ok(asset) => {
                self.enter(index, FileState::Done);
                info!(
                    index,
                    file = %candidate.name,
                    id = %asset.id,
                    media_type = %asset.media_type,
                    "upload registered"
                );
                self.events.emit(UploadEvent::FileSucceeded {
                    index,
                    asset: asset.clone(),
                });
                UploadOutcome::Success(asset)
            }
            Err(err) => {
                self.enter(index, FileState::Failed);
                error!(index, file = %candidate.name, error = %err, "upload failed");
                self.events.emit(UploadEvent::FileFailed {
                    index,
                    error: err.to_string(),
                });
                UploadOutcome::Failure(err)
            }
        };

        self.events.emit(UploadEvent::ProgressReset);
        outcome
    }

    async fn run(
        &self,
        index: usize,
        candidate: &UploadCandidate,
    ) -> Result<FinalizedAsset, UploadError> {
        self.enter(index, FileState::Validating);
        let content_type = validate_candidate(candidate, &self.config.accepted)?;

        let phases = PhaseOps::new(self.transport, self.config, self.events, index);

        self.enter(index, FileState::RequestingTarget);
        let target = phases
            .request_upload_target(candidate, &content_type)
            .await?;

        self.events.emit(UploadEvent::ProgressReset);
        self.enter(index, FileState::Transferring);
        phases
            .transfer_bytes(&target, candidate, &content_type)
            .await?;

        self.enter(index, FileState::Finalizing);
        phases.finalize_upload(&target).await
    }

    fn enter(&self, index: usize, state: FileState) {
        debug!(index, ?state, "file state");
        self.events
            .emit(UploadEvent::StateChanged { index, state });
    }
}
