use thiserror::Error;
use tracing::*;

use crate::{BackendError, CaptureBackend, CaptureRequest, RequestError, default_backend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Started,
    Stopped,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordingError {
    #[error("Already recording")]
    AlreadyRecording,
    #[error("Invalid request: {0}")]
    Request(#[from] RequestError),
    #[error("Backend: {0}")]
    Backend(#[from] BackendError),
    #[error("Injected failure at '{0}'")]
    Injected(&'static str),
}

/// One capture session driving one backend.
///
/// A failed start leaves the session in the state it was in before, so a
/// stopped session can be started again with a new request.
pub struct CaptureSession {
    backend: Box<dyn CaptureBackend>,
    state: SessionState,
    request: Option<CaptureRequest>,
}

impl CaptureSession {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            state: SessionState::Created,
            request: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Started
    }

    /// The request of the capture that is currently running.
    pub fn active_request(&self) -> Option<&CaptureRequest> {
        self.request.as_ref()
    }

    pub fn start(&mut self, request: CaptureRequest) -> Result<(), RecordingError> {
        if self.is_running() {
            return Err(RecordingError::AlreadyRecording);
        }

        request.validate()?;

        recorder_fail::fail_err!(
            "session::start",
            RecordingError::Injected("recorder-core::session::start")
        );

        if let Err(e) = self.backend.start(&request) {
            warn!(window = %request.window_title, error = %e, "Failed to start capture");
            return Err(e.into());
        }

        info!(
            window = %request.window_title,
            width = request.width,
            height = request.height,
            bitrate = request.bitrate,
            output = %request.output_path.display(),
            "Capture started"
        );

        self.state = SessionState::Started;
        self.request = Some(request);

        Ok(())
    }

    /// No-op unless the session is running.
    pub fn stop(&mut self) {
        if !self.is_running() {
            trace!(state = ?self.state, "Ignoring stop on idle session");
            return;
        }

        self.backend.stop();
        self.state = SessionState::Stopped;

        if let Some(request) = self.request.take() {
            info!(output = %request.output_path.display(), "Capture stopped");
        }
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new(default_backend())
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_backend::TestBackend;
    use crate::UnavailableBackend;

    fn request(dir: &tempfile::TempDir) -> CaptureRequest {
        CaptureRequest::new("Finder", 640, 360, 1_000_000, dir.path().join("out.mp4"))
    }

    #[test]
    fn new_session_is_created() {
        let session = CaptureSession::new(Box::new(UnavailableBackend));
        assert_eq!(session.state(), SessionState::Created);
        assert!(!session.is_running());
        assert!(session.active_request().is_none());
    }

    #[test]
    fn unavailable_backend_keeps_session_idle() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = CaptureSession::new(Box::new(UnavailableBackend));

        let res = session.start(request(&dir));

        assert!(matches!(
            res,
            Err(RecordingError::Backend(BackendError::Unavailable(_)))
        ));
        assert_eq!(session.state(), SessionState::Created);
    }

    #[test]
    fn start_stop_restart() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        session.start(request(&dir)).unwrap();
        assert_eq!(session.state(), SessionState::Started);
        assert_eq!(
            session.active_request().map(|r| r.window_title.as_str()),
            Some("Finder")
        );

        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.active_request().is_none());

        session.start(request(&dir)).unwrap();
        assert_eq!(session.state(), SessionState::Started);

        let calls = calls.lock();
        assert_eq!(calls.starts, 2);
        assert_eq!(calls.stops, 1);
    }

    #[test]
    fn double_start_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        session.start(request(&dir)).unwrap();
        assert_eq!(
            session.start(request(&dir)),
            Err(RecordingError::AlreadyRecording)
        );
        assert!(session.is_running());
        assert_eq!(calls.lock().starts, 1);
    }

    #[test]
    fn invalid_request_never_reaches_backend() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        let mut bad = request(&dir);
        bad.bitrate = 0;

        assert_eq!(
            session.start(bad),
            Err(RecordingError::Request(RequestError::UnsupportedBitrate(0)))
        );
        assert_eq!(calls.lock().starts, 0);
    }

    #[test]
    fn failed_restart_stays_stopped() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        session.start(request(&dir)).unwrap();
        session.stop();

        calls.lock().reject_with = Some(BackendError::EncoderSetupFailed);
        assert_eq!(
            session.start(request(&dir)),
            Err(RecordingError::Backend(BackendError::EncoderSetupFailed))
        );
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn refused_start_is_reported_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            CaptureSession::new(Box::new(TestBackend::rejecting(BackendError::StartRefused)));

        assert_eq!(
            session.start(request(&dir)),
            Err(RecordingError::Backend(BackendError::StartRefused))
        );
        assert_eq!(session.state(), SessionState::Created);
    }

    #[test]
    fn stop_without_start_is_noop() {
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        session.stop();
        session.stop();

        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(calls.lock().stops, 0);
    }

    #[test]
    fn drop_stops_running_capture() {
        let dir = tempfile::tempdir().unwrap();
        let backend = TestBackend::accepting();
        let calls = backend.calls();
        let mut session = CaptureSession::new(Box::new(backend));

        session.start(request(&dir)).unwrap();
        drop(session);

        let calls = calls.lock();
        assert_eq!(calls.stops, 1);
        assert!(calls.dropped);
    }
}
