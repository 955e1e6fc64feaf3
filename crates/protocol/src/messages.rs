use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// generateUploadUrl
// ---------------------------------------------------------------------------

/// Asks the control endpoint for an upload destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlRequest {
    pub file_name: String,
    pub mime_type: String,
}

/// Response to [`GenerateUploadUrlRequest`].
///
/// Both fields are optional on the wire so that a response missing one of
/// them decodes and can be rejected with a precise message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateUploadUrlResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,
    /// Opaque token, echoed back verbatim in [`CompleteUploadRequest`].
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub file_descriptor: Value,
}

// ---------------------------------------------------------------------------
// completeUpload
// ---------------------------------------------------------------------------

/// Registers a transferred file with the media service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub file_descriptor: Value,
}

/// Response to [`CompleteUploadRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteUploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<MediaFile>,
}

/// Media record created by `completeUpload`.
///
/// Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub media_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reports whether an opaque value carries nothing usable.
///
/// `null`, empty strings, empty objects and empty arrays are all blank.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
