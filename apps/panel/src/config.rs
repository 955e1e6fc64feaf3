//! Panel configuration.
//!
//! Read from TOML, never written back:
//! - Linux: `~/.config/mediadrop/panel.toml`
//! - Windows: `%APPDATA%/mediadrop/panel.toml`
//!
//! `MEDIADROP_CONTROL_BASE` overrides `control_base`.

use std::path::PathBuf;
use std::time::Duration;

use mediadrop_upload::{AcceptedKind, UploaderConfig};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the control base address.
pub const CONTROL_BASE_ENV: &str = "MEDIADROP_CONTROL_BASE";

/// Panel configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Base address of the control endpoints, e.g. `https://site.example/_functions`.
    #[serde(default = "default_control_base")]
    pub control_base: String,

    /// Deadline per upload phase in seconds (0 = none).
    #[serde(default)]
    pub phase_timeout_secs: u64,

    /// Timeout for a whole HTTP request in seconds (0 = none).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Accepted file kinds.
    #[serde(default = "default_accepted")]
    pub accepted: Vec<AcceptedEntry>,
}

/// One `[[accepted]]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedEntry {
    pub extension: String,
    pub content_type: String,
}

fn default_control_base() -> String {
    "http://localhost:8080/_functions".into()
}

fn default_request_timeout() -> u64 {
    300
}

fn default_accepted() -> Vec<AcceptedEntry> {
    let svg = AcceptedKind::svg();
    vec![AcceptedEntry {
        extension: svg.extension,
        content_type: svg.fallback_content_type,
    }]
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            control_base: default_control_base(),
            phase_timeout_secs: 0,
            request_timeout_secs: default_request_timeout(),
            accepted: default_accepted(),
        }
    }
}

impl PanelConfig {
    /// Loads the config file if present, then applies the environment override.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        let config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            PanelConfig::default()
        };

        Ok(config.with_control_base_override(std::env::var(CONTROL_BASE_ENV).ok()))
    }

    fn with_control_base_override(mut self, value: Option<String>) -> Self {
        if let Some(base) = value.filter(|v| !v.trim().is_empty()) {
            self.control_base = base.trim().to_string();
        }
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        secs(self.request_timeout_secs)
    }

    /// Library configuration derived from this file.
    pub fn uploader_config(&self) -> UploaderConfig {
        let accepted = self
            .accepted
            .iter()
            .map(|e| AcceptedKind::new(e.extension.trim_start_matches('.'), &e.content_type))
            .collect();
        let config = UploaderConfig::new(&self.control_base).with_accepted(accepted);
        match secs(self.phase_timeout_secs) {
            Some(timeout) => config.with_phase_timeout(timeout),
            None => config,
        }
    }
}

fn secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("mediadrop")
            .join("panel.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("mediadrop").join("panel.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/mediadrop/panel.toml"))
    }
}
