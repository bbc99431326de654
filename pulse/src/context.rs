// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Connection to a sound server.

use std::{ffi::CString, sync::Arc};

use crate::{
    ChannelVolumes, ContextState, Error, MainloopGuard, Result, ThreadedMainloop,
    api::strerror,
    mainloop::signal_from_callback,
};

/// Shared state behind a [`Context`].
pub(crate) struct ContextInner {
    pub(crate) mainloop: ThreadedMainloop,
    pub(crate) ptr: *mut pulse_sys::Context,
}

// Safety: all access to the context pointer goes through the mainloop lock.
unsafe impl Send for ContextInner {}
unsafe impl Sync for ContextInner {}

impl Drop for ContextInner {
    fn drop(&mut self) {
        let guard = (!self.mainloop.in_thread()).then(|| self.mainloop.lock());
        let api = self.mainloop.api();
        unsafe {
            api.context_set_state_callback(self.ptr, None, std::ptr::null_mut());
            api.context_disconnect(self.ptr);
            api.context_unref(self.ptr);
        }
        drop(guard);
    }
}

unsafe extern "C" fn context_state_cb(
    _context: *mut pulse_sys::Context,
    userdata: *mut std::ffi::c_void,
) {
    unsafe { signal_from_callback(userdata) };
}

/// A client connection to a PulseAudio server.
///
/// Clones share the same connection. Streams keep a clone so the context is
/// torn down only after the last stream on it.
#[derive(Clone)]
pub struct Context {
    pub(crate) inner: Arc<ContextInner>,
}

impl Context {
    /// Creates an unconnected context named `name` on `mainloop`.
    ///
    /// The context's state callback signals the mainloop so that
    /// [`Context::wait_ready`] can block on it.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` contains a NUL byte or libpulse cannot
    /// allocate the context.
    pub fn new(mainloop: &ThreadedMainloop, name: &str) -> Result<Self> {
        let name = CString::new(name)?;
        let inner = &mainloop.inner;
        let ptr = unsafe {
            let api = inner.api.threaded_mainloop_get_api(inner.ptr);
            inner.api.context_new(api, name.as_ptr())
        };
        if ptr.is_null() {
            return Err(Error::Other("Failed to allocate context.".to_string()));
        }
        unsafe {
            inner.api.context_set_state_callback(
                ptr,
                Some(context_state_cb),
                inner.as_userdata(),
            );
        }
        Ok(Self {
            inner: Arc::new(ContextInner {
                mainloop: mainloop.clone(),
                ptr,
            }),
        })
    }

    /// Starts connecting to `server`, or to the default server when `None`.
    ///
    /// # Errors
    ///
    /// Returns the library's error if the connection attempt cannot be started.
    pub fn connect(&self, guard: &MainloopGuard<'_>, server: Option<&str>) -> Result<()> {
        self.check_guard(guard);
        let server = server.map(CString::new).transpose()?;
        let ret = unsafe {
            guard.api().context_connect(
                self.inner.ptr,
                server.as_ref().map_or(std::ptr::null(), |s| s.as_ptr()),
                pulse_sys::PA_CONTEXT_NOFLAGS,
                std::ptr::null(),
            )
        };
        if ret < 0 {
            return Err(Error::from_code_or(self.errno(guard), || {
                Error::ContextFailed("connect".to_string())
            }));
        }
        Ok(())
    }

    /// Blocks until the context is ready.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ContextFailed`] with the server's reason if the
    /// context fails or terminates instead.
    pub fn wait_ready(&self, guard: &MainloopGuard<'_>) -> Result<()> {
        self.check_guard(guard);
        let mut last = None;
        loop {
            let state = self.state(guard);
            if last != Some(state) {
                tracing::debug!("Context {state}");
                last = Some(state);
            }
            match state {
                ContextState::Ready => return Ok(()),
                state if !state.is_good() => {
                    let code = self.errno(guard);
                    return Err(Error::ContextFailed(strerror(guard.api(), code)));
                }
                _ => guard.wait(),
            }
        }
    }

    pub fn state(&self, guard: &MainloopGuard<'_>) -> ContextState {
        unsafe { guard.api().context_get_state(self.inner.ptr) }.into()
    }

    /// Last error number recorded on the context.
    pub fn errno(&self, guard: &MainloopGuard<'_>) -> std::os::raw::c_int {
        unsafe { guard.api().context_errno(self.inner.ptr) }
    }

    /// Sets the volume of a sink input (a playback stream by its index).
    ///
    /// The request is not awaited; the server applies it asynchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be issued.
    pub fn set_sink_input_volume(
        &self,
        guard: &MainloopGuard<'_>,
        index: u32,
        volume: &ChannelVolumes,
    ) -> Result<()> {
        self.check_guard(guard);
        let op = unsafe {
            guard.api().context_set_sink_input_volume(
                self.inner.ptr,
                index,
                volume.as_raw(),
                None,
                std::ptr::null_mut(),
            )
        };
        if op.is_null() {
            return Err(Error::from_code_or(self.errno(guard), || {
                Error::OperationFailed("set_sink_input_volume".to_string())
            }));
        }
        unsafe { guard.api().operation_unref(op) };
        Ok(())
    }

    pub fn mainloop(&self) -> &ThreadedMainloop {
        &self.inner.mainloop
    }

    pub(crate) fn check_guard(&self, guard: &MainloopGuard<'_>) {
        debug_assert!(
            guard.locks(&self.inner.mainloop),
            "guard belongs to a different mainloop"
        );
    }
}
