//! Renders upload events as log lines with a textual progress bar.

use mediadrop_upload::UploadEvent;

const BAR_WIDTH: usize = 20;

/// Progress bar state: hidden until the first progress update of a file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProgressBar {
    visible: bool,
    percent: u8,
}

impl ProgressBar {
    pub fn set(&mut self, percent: u8) {
        self.visible = true;
        self.percent = percent.min(100);
    }

    pub fn reset(&mut self) {
        self.visible = false;
        self.percent = 0;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn render(&self) -> String {
        let filled = BAR_WIDTH * self.percent as usize / 100;
        format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            self.percent
        )
    }
}

/// Event consumer for the panel.
#[derive(Debug, Default)]
pub struct Reporter {
    bar: ProgressBar,
}

impl Reporter {
    pub fn handle(&mut self, event: &UploadEvent) {
        match event {
            UploadEvent::Progress { percent, .. } => {
                let previous = self.bar.is_visible().then(|| self.bar.percent());
                self.bar.set(*percent);
                // One line per 10% step keeps the log readable.
                if previous.is_none_or(|p| p / 10 != *percent / 10) {
                    tracing::info!("{}", self.bar.render());
                }
            }
            UploadEvent::ProgressReset => self.bar.reset(),
            UploadEvent::StateChanged { index, state } => {
                tracing::debug!(index, ?state, "state changed");
            }
            UploadEvent::PhaseFailed { .. } => {
                if let Some(line) = render(event) {
                    tracing::warn!("{line}");
                }
            }
            UploadEvent::FileFailed { .. } | UploadEvent::BatchRejected { .. } => {
                if let Some(line) = render(event) {
                    tracing::error!("{line}");
                }
            }
            _ => {
                if let Some(line) = render(event) {
                    tracing::info!("{line}");
                }
            }
        }
    }

    #[cfg(test)]
    fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

/// Text for events that produce a log line. Progress is drawn by the bar instead.
pub fn render(event: &UploadEvent) -> Option<String> {
    let line = match event {
        UploadEvent::BatchStarted { total } => format!("Uploading {total} file(s)"),
        UploadEvent::FileStarted {
            name,
            size,
            content_type,
            ..
        } => {
            let content_type = if content_type.is_empty() {
                "unknown"
            } else {
                content_type
            };
            format!("---- Selected: {name} ({size} bytes, {content_type}) ----")
        }
        UploadEvent::PhaseStarted { phase, .. } => format!("→ {phase}"),
        UploadEvent::PhaseSucceeded { phase, detail, .. } => {
            if detail.is_empty() {
                format!("✓ {phase} OK")
            } else {
                format!("✓ {phase} OK ({detail})")
            }
        }
        UploadEvent::PhaseFailed {
            phase,
            status: Some(_),
            message,
            ..
        } => format!("HTTP ERROR ({phase}): {message}"),
        UploadEvent::PhaseFailed { phase, message, .. } => format!("ERROR ({phase}): {message}"),
        UploadEvent::FileSucceeded { asset, .. } => format!(
            "SUCCESS: {} registered as {} ({}, {})",
            asset.file_name, asset.id, asset.mime_type, asset.media_type
        ),
        UploadEvent::FileFailed { error, .. } => format!("FAILED: {error}"),
        UploadEvent::BatchRejected { reason } => format!("ERROR: {reason}"),
        UploadEvent::BatchCompleted { succeeded, failed } => {
            format!("=== All uploads complete: {succeeded} succeeded, {failed} failed ===")
        }
        UploadEvent::StateChanged { .. }
        | UploadEvent::Progress { .. }
        | UploadEvent::ProgressReset => return None,
    };
    Some(line)
}
