//! Data types for the upload flow.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tokio::io::AsyncRead;

use crate::error::UploadError;

/// Readable handle for a candidate's bytes.
pub type ByteReader = Box<dyn AsyncRead + Send + Sync + Unpin>;

/// Where a candidate's bytes come from.
#[derive(Debug, Clone)]
pub enum CandidateSource {
    /// A file on disk, opened when the transfer starts.
    Path(PathBuf),
    /// Bytes already in memory.
    Memory(Arc<[u8]>),
}

impl CandidateSource {
    /// Opens a fresh reader positioned at the first byte.
    pub async fn open(&self) -> std::io::Result<ByteReader> {
        match self {
            CandidateSource::Path(path) => {
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::new(file))
            }
            CandidateSource::Memory(data) => Ok(Box::new(Cursor::new(Arc::clone(data)))),
        }
    }
}

/// A local file selected for upload.
#[derive(Debug, Clone)]
pub struct UploadCandidate {
    pub name: String,
    pub size: u64,
    /// Declared content type. Empty when the selection did not provide one.
    pub content_type: String,
    pub source: CandidateSource,
}

impl UploadCandidate {
    /// Builds a candidate from bytes held in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            source: CandidateSource::Memory(data),
        }
    }

    /// Total byte count when it can drive progress reporting.
    pub fn known_size(&self) -> Option<u64> {
        (self.size > 0).then_some(self.size)
    }
}

/// Opaque token issued by `generateUploadUrl` and required by `completeUpload`.
///
/// The client never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileDescriptor(Value);

impl FileDescriptor {
    /// Wraps a descriptor, rejecting blank values.
    pub fn new(value: Value) -> Option<Self> {
        if mediadrop_protocol::is_blank(&value) {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Where and how to upload one file. Lives for that file's upload only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub upload_url: String,
    pub descriptor: FileDescriptor,
}

/// Asset record returned once the upload is registered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedAsset {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub media_type: String,
    /// Fields of the record this client does not model.
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

/// Terminal result for one file.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Success(FinalizedAsset),
    Failure(UploadError),
}

impl UploadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UploadOutcome::Success(_))
    }

    pub fn asset(&self) -> Option<&FinalizedAsset> {
        match self {
            UploadOutcome::Success(asset) => Some(asset),
            UploadOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            UploadOutcome::Success(_) => None,
            UploadOutcome::Failure(err) => Some(err),
        }
    }
}

impl From<Result<FinalizedAsset, UploadError>> for UploadOutcome {
    fn from(result: Result<FinalizedAsset, UploadError>) -> Self {
        match result {
            Ok(asset) => UploadOutcome::Success(asset),
            Err(err) => UploadOutcome::Failure(err),
        }
    }
}

/// One file's line in a [`BatchReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEntry {
    pub name: String,
    pub size: u64,
    pub outcome: UploadOutcome,
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, entry: BatchEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn succeeded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome.is_success())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn into_entries(self) -> Vec<BatchEntry> {
        self.entries
    }
}
