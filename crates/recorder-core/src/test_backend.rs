//! Scripted backend for exercising sessions without a capture engine.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{BackendError, CaptureBackend, CaptureRequest};

#[derive(Debug, Default)]
pub struct TestBackendCalls {
    pub starts: usize,
    pub stops: usize,
    pub dropped: bool,
    pub last_request: Option<CaptureRequest>,
    /// When set, `start` fails with this error instead of succeeding.
    pub reject_with: Option<BackendError>,
}

pub struct TestBackend {
    calls: Arc<Mutex<TestBackendCalls>>,
}

impl TestBackend {
    pub fn accepting() -> Self {
        Self {
            calls: Arc::default(),
        }
    }

    pub fn rejecting(error: BackendError) -> Self {
        let backend = Self::accepting();
        backend.calls.lock().reject_with = Some(error);
        backend
    }

    /// Shared view of the calls made so far, usable after the backend has
    /// been moved into a session.
    pub fn calls(&self) -> Arc<Mutex<TestBackendCalls>> {
        self.calls.clone()
    }
}

impl CaptureBackend for TestBackend {
    fn start(&mut self, request: &CaptureRequest) -> Result<(), BackendError> {
        let mut calls = self.calls.lock();
        if let Some(error) = calls.reject_with.clone() {
            return Err(error);
        }

        calls.starts += 1;
        calls.last_request = Some(request.clone());
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.lock().stops += 1;
    }
}

impl Drop for TestBackend {
    fn drop(&mut self) {
        self.calls.lock().dropped = true;
    }
}
