/// Path of the endpoint that issues upload destinations, relative to the control base.
pub const GENERATE_UPLOAD_URL_PATH: &str = "/generateUploadUrl";

/// Path of the endpoint that registers an uploaded file, relative to the control base.
pub const COMPLETE_UPLOAD_PATH: &str = "/completeUpload";

/// Multipart field name the upload destination reads the file from.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Extension accepted by default (compared case-insensitively).
pub const SVG_EXTENSION: &str = "svg";

/// Content type sent for SVG files whose declared type is missing.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
