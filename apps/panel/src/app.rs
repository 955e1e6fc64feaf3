use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use mediadrop_upload::{BatchRunner, HttpTransport, candidate_from_path};

use crate::config::PanelConfig;
use crate::reporter::Reporter;

/// Uploads `paths` as one batch and renders its events until it finishes.
pub async fn run(config: PanelConfig, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let transport =
        HttpTransport::new(config.request_timeout()).context("failed to build HTTP client")?;

    let mut candidates = Vec::with_capacity(paths.len());
    let mut unreadable = 0usize;
    for path in &paths {
        match candidate_from_path(path).await {
            Ok(candidate) => candidates.push(candidate),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "skipping file");
                unreadable += 1;
            }
        }
    }

    let mut runner = BatchRunner::new(Arc::new(transport), config.uploader_config());

    // Keep the handle so every event is rendered before we report the result.
    let forwarder = runner.take_events().map(|mut rx| {
        tokio::spawn(async move {
            let mut reporter = Reporter::default();
            while let Some(event) = rx.recv().await {
                reporter.handle(&event);
            }
        })
    });

    let result = runner.run(candidates).await;

    // Dropping the runner closes the event channel so the forwarder drains and exits.
    drop(runner);
    if let Some(handle) = forwarder {
        let _ = handle.await;
    }

    let report = result?;
    let failed = report.failed() + unreadable;
    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed to upload", paths.len());
    }
    Ok(())
}
