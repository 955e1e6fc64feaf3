//! Candidate selection and validation.
//!
//! Validation is purely local: it decides whether a file may be uploaded
//! at all and which content type to announce for it, without touching the
//! network or the candidate itself.

use std::path::Path;

use crate::config::AcceptedKind;
use crate::error::UploadError;
use crate::types::{CandidateSource, UploadCandidate};

/// Builds a candidate for a file on disk.
///
/// The declared content type is left empty; validation derives it from the
/// accepted kind.
pub async fn candidate_from_path(path: &Path) -> Result<UploadCandidate, UploadError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|e| UploadError::Validation(format!("cannot read {}: {e}", path.display())))?;

    if !metadata.is_file() {
        return Err(UploadError::Validation(format!(
            "{} is not a regular file",
            path.display()
        )));
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| UploadError::Validation(format!("{} has no file name", path.display())))?;

    Ok(UploadCandidate {
        name,
        size: metadata.len(),
        content_type: String::new(),
        source: CandidateSource::Path(path.to_path_buf()),
    })
}

/// Checks the candidate against the accepted kinds and returns the
/// effective content type: the declared one, or the kind's fallback.
pub fn validate_candidate(
    candidate: &UploadCandidate,
    accepted: &[AcceptedKind],
) -> Result<String, UploadError> {
    let kind = accepted
        .iter()
        .find(|kind| kind.matches(&candidate.name))
        .ok_or_else(|| {
            let expected: Vec<String> = accepted
                .iter()
                .map(|k| format!(".{}", k.extension))
                .collect();
            UploadError::Validation(format!(
                "{} is not an accepted file ({})",
                candidate.name,
                expected.join(", ")
            ))
        })?;

    let declared = candidate.content_type.trim();
    if declared.is_empty() {
        return Ok(kind.fallback_content_type.clone());
    }
    declared.parse::<mime::Mime>().map_err(|e| {
        UploadError::Validation(format!(
            "{} declares an invalid content type {declared:?}: {e}",
            candidate.name
        ))
    })?;
    Ok(declared.to_string())
}
