//! Uploader configuration.

use std::time::Duration;

use mediadrop_protocol::{
    COMPLETE_UPLOAD_PATH, GENERATE_UPLOAD_URL_PATH, SVG_CONTENT_TYPE, SVG_EXTENSION,
};

/// The two control endpoints, resolved against a base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub generate_upload_url: String,
    pub complete_upload: String,
}

impl Endpoints {
    /// Resolves both endpoints under `base`. A trailing `/` on `base` is ignored.
    pub fn from_control_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            generate_upload_url: format!("{base}{GENERATE_UPLOAD_URL_PATH}"),
            complete_upload: format!("{base}{COMPLETE_UPLOAD_PATH}"),
        }
    }
}

/// A file kind the uploader accepts, with the content type assumed when
/// a file of this kind does not declare one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedKind {
    pub extension: String,
    pub fallback_content_type: String,
}

impl AcceptedKind {
    pub fn new(extension: impl Into<String>, fallback_content_type: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            fallback_content_type: fallback_content_type.into(),
        }
    }

    pub fn svg() -> Self {
        Self::new(SVG_EXTENSION, SVG_CONTENT_TYPE)
    }

    /// Case-insensitive match on the text after the last `.` of `file_name`.
    pub fn matches(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(&self.extension))
    }
}

/// Settings shared by every file of a batch.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub endpoints: Endpoints,
    pub accepted: Vec<AcceptedKind>,
    /// Deadline for each phase call. `None` waits as long as the transport does.
    pub phase_timeout: Option<Duration>,
}

impl UploaderConfig {
    /// SVG-only uploader talking to the control endpoints under `control_base`.
    pub fn new(control_base: &str) -> Self {
        Self {
            endpoints: Endpoints::from_control_base(control_base),
            accepted: vec![AcceptedKind::svg()],
            phase_timeout: None,
        }
    }

    pub fn with_phase_timeout(mut self, timeout: Duration) -> Self {
        self.phase_timeout = Some(timeout);
        self
    }

    pub fn with_accepted(mut self, accepted: Vec<AcceptedKind>) -> Self {
        self.accepted = accepted;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_trim_trailing_slash() {
        let a = Endpoints::from_control_base("https://site.example/_functions/");
        let b = Endpoints::from_control_base("https://site.example/_functions");
        assert_eq!(a, b);
        assert_eq!(
            a.generate_upload_url,
            "https://site.example/_functions/generateUploadUrl"
        );
        assert_eq!(
            a.complete_upload,
            "https://site.example/_functions/completeUpload"
        );
    }

    #[test]
    fn svg_matching_is_case_insensitive() {
        let svg = AcceptedKind::svg();
        assert!(svg.matches("logo.svg"));
        assert!(svg.matches("LOGO.SVG"));
        assert!(svg.matches("archive.tar.Svg"));
        assert!(svg.matches(".svg"));
        assert!(!svg.matches("logo.svgz"));
        assert!(!svg.matches("logo.png"));
        assert!(!svg.matches("svg"));
    }

    #[test]
    fn default_config_accepts_svg_only() {
        let config = UploaderConfig::new("http://localhost");
        assert_eq!(config.accepted, vec![AcceptedKind::svg()]);
        assert!(config.phase_timeout.is_none());
    }
}
