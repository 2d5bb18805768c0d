use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    CaptureBackend, CaptureRequest, CaptureSession, RecordingError, SessionState, default_backend,
};

/// Shareable handle to a capture session.
///
/// Clones refer to the same session.
#[derive(Clone)]
pub struct Recorder {
    inner: Arc<Mutex<CaptureSession>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::with_backend(default_backend())
    }

    pub fn with_backend(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CaptureSession::new(backend))),
        }
    }

    pub fn start(
        &self,
        window_title: &str,
        width: u32,
        height: u32,
        bitrate: u32,
        output_path: impl AsRef<Path>,
    ) -> Result<(), RecordingError> {
        self.start_request(CaptureRequest::new(
            window_title,
            width,
            height,
            bitrate,
            output_path.as_ref(),
        ))
    }

    pub fn start_request(&self, request: CaptureRequest) -> Result<(), RecordingError> {
        self.inner.lock().start(request)
    }

    pub fn stop(&self) {
        self.inner.lock().stop();
    }

    pub fn is_recording(&self) -> bool {
        self.inner.lock().is_running()
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state()
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
