//! C ABI over [`recorder_core::CaptureSession`].
//!
//! A handle is a boxed session handed to the caller as an opaque pointer by
//! [`capture_create`] and reclaimed by [`capture_destroy`]. See
//! `include/capture.h` for the C declarations.
//!
//! Handles are not thread-safe: callers must not use one handle from several
//! threads at once. Using a handle after destroying it is undefined behavior.

use std::ffi::{CStr, c_char};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;

use recorder_core::{CaptureBackend, CaptureRequest, CaptureSession, default_backend};
use tracing::*;

/// Opaque to C callers.
pub struct CaptureHandle {
    session: CaptureSession,
}

impl CaptureHandle {
    fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            session: CaptureSession::new(backend),
        }
    }

    pub fn session(&self) -> &CaptureSession {
        &self.session
    }
}

/// Like [`capture_create`], for Rust hosts that bring their own engine.
pub fn create_with_backend(backend: Box<dyn CaptureBackend>) -> *mut CaptureHandle {
    Box::into_raw(Box::new(CaptureHandle::new(backend)))
}

fn guarded<T>(on_panic: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        error!("Panic caught at capture boundary");
        on_panic
    })
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string valid for `'a`.
unsafe fn utf8_arg<'a>(ptr: *const c_char, name: &'static str) -> Option<&'a str> {
    if ptr.is_null() {
        warn!(arg = name, "Null string passed to capture_start");
        return None;
    }

    match unsafe { CStr::from_ptr(ptr) }.to_str() {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(arg = name, error = %e, "Non UTF-8 string passed to capture_start");
            None
        }
    }
}

/// Allocates a new idle capture session. Returns null on failure.
#[unsafe(no_mangle)]
pub extern "C" fn capture_create() -> *mut CaptureHandle {
    guarded(ptr::null_mut(), || create_with_backend(default_backend()))
}

/// Starts capturing. Returns `false` on any failure, including when no
/// engine is linked into this build.
///
/// # Safety
///
/// `handle` must be null or a live handle from [`capture_create`].
/// `window_title` and `output_path` must be null or NUL-terminated strings
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn capture_start(
    handle: *mut CaptureHandle,
    window_title: *const c_char,
    width: u32,
    height: u32,
    bitrate: u32,
    output_path: *const c_char,
) -> bool {
    guarded(false, || {
        let Some(handle) = (unsafe { handle.as_mut() }) else {
            warn!("capture_start called with a null handle");
            return false;
        };

        let Some(window_title) = (unsafe { utf8_arg(window_title, "window_title") }) else {
            return false;
        };
        let Some(output_path) = (unsafe { utf8_arg(output_path, "output_path") }) else {
            return false;
        };

        let request = CaptureRequest::new(window_title, width, height, bitrate, output_path);

        match handle.session.start(request) {
            Ok(()) => true,
            Err(e) => {
                debug!(error = %e, "capture_start failed");
                false
            }
        }
    })
}

/// Stops a running capture. No-op on null or idle handles.
///
/// # Safety
///
/// `handle` must be null or a live handle from [`capture_create`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn capture_stop(handle: *mut CaptureHandle) {
    guarded((), || {
        if let Some(handle) = unsafe { handle.as_mut() } {
            handle.session.stop();
        }
    })
}

/// Releases the handle, stopping it first if it is running. No-op on null.
///
/// # Safety
///
/// `handle` must be null or a live handle from [`capture_create`] that has
/// not been destroyed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn capture_destroy(handle: *mut CaptureHandle) {
    if handle.is_null() {
        return;
    }

    let handle = unsafe { Box::from_raw(handle) };
    guarded((), move || drop(handle))
}
