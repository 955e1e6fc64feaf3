//! Batch runner: sequential uploads with failure isolation.
//!
//! Files are uploaded one at a time in input order. A failing file is
//! recorded and the batch moves on; only the preconditions checked before
//! the first file (empty selection, batch already running) fail the
//! batch as a whole.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::UploaderConfig;
use crate::error::UploadError;
use crate::events::{EventSink, UploadEvent};
use crate::transport::Transport;
use crate::types::{BatchEntry, BatchReport, UploadCandidate};
use crate::upload::FileUploader;

/// Runs upload batches against one transport and configuration.
pub struct BatchRunner {
    transport: Arc<dyn Transport>,
    config: UploaderConfig,
    events_tx: EventSink,
    events_rx: Option<mpsc::UnboundedReceiver<UploadEvent>>,
    busy: AtomicBool,
}

impl BatchRunner {
    pub fn new(transport: Arc<dyn Transport>, config: UploaderConfig) -> Self {
        let (events_tx, events_rx) = EventSink::channel();
        Self {
            transport,
            config,
            events_tx,
            events_rx: Some(events_rx),
            busy: AtomicBool::new(false),
        }
    }

    /// Takes the event receiver. Can only be called once.
    ///
    /// The stream ends when the runner is dropped.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// True while a batch is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn config(&self) -> &UploaderConfig {
        &self.config
    }

    /// Uploads every candidate in order and reports one outcome per file.
    ///
    /// Fails without touching the network when `candidates` is empty or
    /// another batch is still running on this runner.
    pub async fn run(&self, candidates: Vec<UploadCandidate>) -> Result<BatchReport, UploadError> {
        if candidates.is_empty() {
            return Err(self.reject("no files selected"));
        }
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            return Err(self.reject("an upload batch is already running"));
        };

        let total = candidates.len();
        info!(files = total, "batch started");
        self.events_tx.emit(UploadEvent::BatchStarted { total });

        let uploader = FileUploader::new(self.transport.as_ref(), &self.config, &self.events_tx);
        let mut report = BatchReport::with_capacity(total);

        for (index, candidate) in candidates.iter().enumerate() {
            let outcome = uploader.upload(index, candidate).await;
            report.push(BatchEntry {
                name: candidate.name.clone(),
                size: candidate.size,
                outcome,
            });
        }

        let succeeded = report.succeeded();
        let failed = report.failed();
        info!(succeeded, failed, "batch complete");
        self.events_tx
            .emit(UploadEvent::BatchCompleted { succeeded, failed });

        Ok(report)
    }

    fn reject(&self, reason: &str) -> UploadError {
        warn!(reason, "batch rejected");
        self.events_tx.emit(UploadEvent::BatchRejected {
            reason: reason.to_string(),
        });
        UploadError::Validation(reason.to_string())
    }
}

/// Holds the busy flag for the duration of a batch and clears it on drop,
/// whichever way the batch ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
