use std::path::{Path, PathBuf};

use thiserror::Error;

/// Largest width or height hardware H.264 encoders reliably accept.
pub const H264_MAX_DIMENSION: u32 = 4096;

/// Parameters of a single capture: which window, how big, how many bits and
/// where the result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub window_title: String,
    pub width: u32,
    pub height: u32,
    pub bitrate: u32,
    pub output_path: PathBuf,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RequestError {
    #[error("Unsupported dimensions {width}x{height}")]
    UnsupportedDimensions { width: u32, height: u32 },
    #[error("Unsupported bitrate {0}")]
    UnsupportedBitrate(u32),
    #[error("Output directory '{}' does not exist", .0.display())]
    OutputDirMissing(PathBuf),
}

impl CaptureRequest {
    pub fn new(
        window_title: impl Into<String>,
        width: u32,
        height: u32,
        bitrate: u32,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            window_title: window_title.into(),
            width,
            height,
            bitrate,
            output_path: output_path.into(),
        }
    }

    /// Rejects requests no engine could satisfy. Window lookup and encoder
    /// setup are left to the backend.
    pub fn validate(&self) -> Result<(), RequestError> {
        let dimension_ok = |v: u32| (1..=H264_MAX_DIMENSION).contains(&v);

        if !dimension_ok(self.width) || !dimension_ok(self.height) {
            return Err(RequestError::UnsupportedDimensions {
                width: self.width,
                height: self.height,
            });
        }

        if self.bitrate == 0 {
            return Err(RequestError::UnsupportedBitrate(self.bitrate));
        }

        let dir = self.output_dir();
        if !dir.is_dir() {
            return Err(RequestError::OutputDirMissing(dir.to_path_buf()));
        }

        Ok(())
    }

    fn output_dir(&self) -> &Path {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}
