use thiserror::Error;

use crate::CaptureRequest;

/// The engine that actually captures a window and encodes it to disk.
///
/// Implementations are driven by [`CaptureSession`](crate::CaptureSession),
/// which guarantees `start` is never called twice without a `stop` in
/// between and that `stop` is only called after a successful `start`.
pub trait CaptureBackend: Send {
    fn start(&mut self, request: &CaptureRequest) -> Result<(), BackendError>;

    /// Stops capturing and finalizes the output file.
    fn stop(&mut self);
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Capture engine unavailable: {0}")]
    Unavailable(&'static str),
    #[error("Window with title '{0}' not found")]
    WindowNotFound(String),
    #[error("Invalid window number")]
    InvalidWindowNumber,
    #[error("Cannot create screen capture input")]
    CannotCreateInput,
    #[error("Cannot add input to capture session")]
    CannotAddInput,
    #[error("Failed to setup video encoder")]
    EncoderSetupFailed,
    /// The engine declined to start without saying why.
    #[error("Capture engine refused to start")]
    StartRefused,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Backend used when no native engine is linked. Every start fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableBackend;

impl CaptureBackend for UnavailableBackend {
    fn start(&mut self, _request: &CaptureRequest) -> Result<(), BackendError> {
        Err(BackendError::Unavailable(
            "no native capture engine is linked into this build",
        ))
    }

    fn stop(&mut self) {}
}

pub fn default_backend() -> Box<dyn CaptureBackend> {
    #[cfg(all(target_os = "macos", feature = "apple-capture"))]
    {
        Box::new(crate::AppleCaptureBackend::new())
    }

    #[cfg(not(all(target_os = "macos", feature = "apple-capture")))]
    {
        Box::new(UnavailableBackend)
    }
}
