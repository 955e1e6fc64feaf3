//! Status events emitted while a batch runs.
//!
//! The orchestrator never formats user-facing text. It reports what
//! happened as [`UploadEvent`]s and leaves rendering to the consumer of
//! the channel returned by [`BatchRunner::take_events`](crate::BatchRunner::take_events).

use std::fmt;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::types::FinalizedAsset;

/// One network phase of a file upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// `generateUploadUrl` on the control endpoint.
    RequestTarget,
    /// Multipart POST of the file bytes to the issued destination.
    Transfer,
    /// `completeUpload` on the control endpoint.
    Finalize,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::RequestTarget => "generateUploadUrl",
            Phase::Transfer => "upload",
            Phase::Finalize => "completeUpload",
        })
    }
}

/// Per-file orchestration state.
///
/// `Failed` is absorbing and reachable from every other state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileState {
    Validating,
    RequestingTarget,
    Transferring,
    Finalizing,
    Done,
    Failed,
}

impl FileState {
    pub fn is_terminal(self) -> bool {
        matches!(self, FileState::Done | FileState::Failed)
    }
}

/// Event emitted during a batch. `index` is the file's position in the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UploadEvent {
    BatchStarted {
        total: usize,
    },
    /// The batch was refused before any file was attempted.
    BatchRejected {
        reason: String,
    },
    /// A file was picked up. `content_type` is the declared type, possibly empty.
    FileStarted {
        index: usize,
        name: String,
        size: u64,
        content_type: String,
    },
    StateChanged {
        index: usize,
        state: FileState,
    },
    PhaseStarted {
        index: usize,
        phase: Phase,
    },
    /// `detail` is a short diagnostic, e.g. the HTTP status of the transfer.
    PhaseSucceeded {
        index: usize,
        phase: Phase,
        detail: String,
    },
    PhaseFailed {
        index: usize,
        phase: Phase,
        status: Option<u16>,
        message: String,
    },
    /// Transfer progress in percent, non-decreasing per file.
    Progress {
        index: usize,
        percent: u8,
    },
    /// Progress display should be hidden and zeroed.
    ProgressReset,
    FileSucceeded {
        index: usize,
        asset: FinalizedAsset,
    },
    FileFailed {
        index: usize,
        error: String,
    },
    BatchCompleted {
        succeeded: usize,
        failed: usize,
    },
}

/// Sending half of the event stream.
///
/// Sends never block and are dropped silently once the receiver is gone,
/// so reporting can never stall an upload.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<UploadEvent>,
}

impl EventSink {
    /// Creates a sink and the receiver that drains it.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: UploadEvent) {
        let _ = self.tx.send(event);
    }
}
