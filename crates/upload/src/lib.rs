//! Client-side upload orchestration for a two-phase media hand-off.
//!
//! This crate implements the **business logic** of uploading files to a
//! media service that separates control from data: it has no UI, and the
//! network sits behind the [`Transport`] trait.
//!
//! # Pipeline (per file)
//!
//! 1. **Validate**: check the extension, derive the content type
//! 2. **Request target**: `generateUploadUrl` returns a destination and an opaque descriptor
//! 3. **Transfer**: multipart POST of the bytes with progress
//! 4. **Finalize**: `completeUpload` with the descriptor registers the asset
//!
//! [`BatchRunner`] applies the pipeline to a selection of files, one at a
//! time, and reports through a stream of [`UploadEvent`]s.

pub mod batch;
pub mod candidate;
pub mod config;
pub mod error;
pub mod events;
pub mod http;
pub mod phases;
pub mod progress;
pub mod transport;
pub mod types;
pub mod upload;

#[cfg(test)]
pub(crate) mod testing;

// Re-export primary types for convenience.
pub use batch::BatchRunner;
pub use candidate::{candidate_from_path, validate_candidate};
pub use config::{AcceptedKind, Endpoints, UploaderConfig};
pub use error::{TransportError, UploadError};
pub use events::{EventSink, FileState, Phase, UploadEvent};
pub use http::HttpTransport;
pub use phases::PhaseOps;
pub use progress::{ProgressTracker, percent_of};
pub use transport::{FilePart, HttpResponse, ProgressFn, Transport, TransportFuture};
pub use types::{
    BatchEntry, BatchReport, CandidateSource, FileDescriptor, FinalizedAsset, UploadCandidate,
    UploadOutcome, UploadTarget,
};
pub use upload::FileUploader;
