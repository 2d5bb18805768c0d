//! Screen recording sessions with a pluggable capture engine.
//!
//! [`CaptureSession`] owns one [`CaptureBackend`] and tracks whether it is
//! running. [`Recorder`] wraps a session in a mutex so it can be shared.

#[cfg(all(target_os = "macos", feature = "apple-capture"))]
mod apple_capture;
mod backend;
mod recorder;
mod request;
mod session;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_backend;

#[cfg(all(target_os = "macos", feature = "apple-capture"))]
pub use apple_capture::AppleCaptureBackend;
pub use backend::{BackendError, CaptureBackend, UnavailableBackend, default_backend};
pub use recorder::Recorder;
pub use request::{CaptureRequest, H264_MAX_DIMENSION, RequestError};
pub use session::{CaptureSession, RecordingError, SessionState};
