use std::sync::atomic::{AtomicI16, Ordering};

use tracing::trace;

use crate::events::{EventSink, UploadEvent};

/// Converts a byte count into a whole percentage in `[0, 100]`.
///
/// Returns `None` when the total is unknown or zero.
pub fn percent_of(sent: u64, total: Option<u64>) -> Option<u8> {
    let total = total.filter(|t| *t > 0)?;
    let pct = (sent as f64 / total as f64) * 100.0;
    Some(pct.clamp(0.0, 100.0) as u8)
}

/// Turns raw transfer callbacks into [`UploadEvent::Progress`] events for
/// one file.
///
/// Emitted values never decrease and repeats are suppressed, so a transport
/// that reports the same or an older byte count is harmless.
pub struct ProgressTracker {
    index: usize,
    last: AtomicI16,
    events: EventSink,
}

impl ProgressTracker {
    pub fn new(index: usize, events: EventSink) -> Self {
        Self {
            index,
            last: AtomicI16::new(-1),
            events,
        }
    }

    /// Records a transport callback.
    pub fn record(&self, sent: u64, total: Option<u64>) {
        let Some(percent) = percent_of(sent, total) else {
            return;
        };
        let previous = self.last.fetch_max(i16::from(percent), Ordering::AcqRel);
        if i16::from(percent) > previous {
            trace!(index = self.index, percent, sent, "transfer progress");
            self.events.emit(UploadEvent::Progress {
                index: self.index,
                percent,
            });
        }
    }

    /// Last emitted percentage.
    pub fn last_percent(&self) -> Option<u8> {
        u8::try_from(self.last.load(Ordering::Acquire)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut tokio::sync::mpsc::UnboundedReceiver<UploadEvent>) -> Vec<u8> {
        let mut values = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let UploadEvent::Progress { percent, .. } = event {
                values.push(percent);
            }
        }
        values
    }

    #[test]
    fn percent_clamps_and_floors() {
        assert_eq!(percent_of(0, Some(2048)), Some(0));
        assert_eq!(percent_of(1023, Some(2048)), Some(49));
        assert_eq!(percent_of(2048, Some(2048)), Some(100));
        assert_eq!(percent_of(4096, Some(2048)), Some(100));
        assert_eq!(percent_of(10, None), None);
        assert_eq!(percent_of(10, Some(0)), None);
    }

    #[test]
    fn tracker_is_monotonic() {
        let (sink, mut rx) = EventSink::channel();
        let tracker = ProgressTracker::new(0, sink);
        for sent in [0, 512, 256, 1024, 1024, 2048] {
            tracker.record(sent, Some(2048));
        }
        assert_eq!(drain(&mut rx), vec![0, 25, 50, 100]);
        assert_eq!(tracker.last_percent(), Some(100));
    }

    #[test]
    fn tracker_ignores_unknown_total() {
        let (sink, mut rx) = EventSink::channel();
        let tracker = ProgressTracker::new(3, sink);
        tracker.record(100, None);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(tracker.last_percent(), None);
    }
}
