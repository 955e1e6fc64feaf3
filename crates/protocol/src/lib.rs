//! Wire protocol for the upload control endpoints.
//!
//! The control service exposes two JSON endpoints that bracket a raw
//! multipart transfer:
//!
//! 1. `generateUploadUrl` hands out a destination and an opaque descriptor
//! 2. the client posts the file bytes to that destination
//! 3. `completeUpload` registers the asset using the descriptor alone

pub mod constants;
pub mod messages;

pub use constants::*;
pub use messages::{
    CompleteUploadRequest, CompleteUploadResponse, GenerateUploadUrlRequest,
    GenerateUploadUrlResponse, MediaFile, is_blank,
};
