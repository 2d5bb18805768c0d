use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::*;

/// Defaults for `recorder record`, stored as JSON. Missing keys fall back to
/// the built-in defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordingSettings {
    pub window: String,
    pub width: u32,
    pub height: u32,
    pub bitrate: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for RecordingSettings {
    fn default() -> Self {
        Self {
            window: "Teamfight Tactics".to_string(),
            width: 1280,
            height: 720,
            bitrate: 4_000_000,
            output_dir: None,
        }
    }
}

impl RecordingSettings {
    const FILE_NAME: &'static str = "recording-settings.json";

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tft-recorder").join(Self::FILE_NAME))
    }

    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read '{}'", path.display()));
            }
        };

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file '{}'", path.display()))
    }
}
