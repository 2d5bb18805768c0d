use std::ffi::{CString, c_char, c_void};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use tracing::*;

use crate::{BackendError, CaptureBackend, CaptureRequest};

unsafe extern "C" {
    fn swift_capture_create() -> *mut c_void;
    fn swift_capture_start(
        capture: *mut c_void,
        window_title: *const c_char,
        width: u32,
        height: u32,
        bitrate: u32,
        output_path: *const c_char,
    ) -> bool;
    fn swift_capture_stop(capture: *mut c_void);
    fn swift_capture_destroy(capture: *mut c_void);
}

/// Passes the path bytes through unchanged, so non UTF-8 paths survive.
fn path_to_c_string(path: &Path) -> Result<CString, BackendError> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|e| BackendError::InvalidArgument(e.to_string()))
}

/// AVFoundation/VideoToolbox engine exported by `libAppleCapture`.
///
/// The native session is created lazily on the first start and released
/// when the backend is dropped.
pub struct AppleCaptureBackend {
    native: Option<NonNull<c_void>>,
}

// The native session serializes its work on its own dispatch queue.
unsafe impl Send for AppleCaptureBackend {}

impl AppleCaptureBackend {
    pub fn new() -> Self {
        Self { native: None }
    }

    fn native(&mut self) -> Result<NonNull<c_void>, BackendError> {
        if let Some(native) = self.native {
            return Ok(native);
        }

        let native = NonNull::new(unsafe { swift_capture_create() })
            .ok_or(BackendError::CannotCreateInput)?;
        self.native = Some(native);
        Ok(native)
    }
}

impl Default for AppleCaptureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureBackend for AppleCaptureBackend {
    fn start(&mut self, request: &CaptureRequest) -> Result<(), BackendError> {
        let title = CString::new(request.window_title.as_str())
            .map_err(|e| BackendError::InvalidArgument(e.to_string()))?;
        let path = path_to_c_string(&request.output_path)?;

        let native = self.native()?;

        let started = unsafe {
            swift_capture_start(
                native.as_ptr(),
                title.as_ptr(),
                request.width,
                request.height,
                request.bitrate,
                path.as_ptr(),
            )
        };

        if !started {
            debug!(window = %request.window_title, "AppleCapture refused to start");
            return Err(BackendError::StartRefused);
        }

        Ok(())
    }

    fn stop(&mut self) {
        if let Some(native) = self.native {
            unsafe { swift_capture_stop(native.as_ptr()) };
        }
    }
}

impl Drop for AppleCaptureBackend {
    fn drop(&mut self) {
        if let Some(native) = self.native.take() {
            unsafe { swift_capture_destroy(native.as_ptr()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    #[test]
    fn non_utf8_path_bytes_are_kept() {
        let raw = b"/tmp/caf\xe9.mp4";
        let path = Path::new(OsStr::from_bytes(raw));

        let c_path = path_to_c_string(path).unwrap();

        assert_eq!(c_path.as_bytes(), raw);
    }

    #[test]
    fn interior_nul_is_rejected() {
        let path = Path::new(OsStr::from_bytes(b"/tmp/a\0b.mp4"));

        assert!(matches!(
            path_to_c_string(path),
            Err(BackendError::InvalidArgument(_))
        ));
    }
}
