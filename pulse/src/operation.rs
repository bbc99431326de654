// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Pending asynchronous requests.

use std::ffi::c_void;

use crate::{Error, MainloopGuard, OperationState, Result, mainloop::signal_from_callback};

/// An in-flight libpulse request such as a cork, flush or drain.
///
/// Dropping the operation releases the reference without cancelling the
/// request, which makes fire-and-forget calls possible. Use
/// [`Operation::wait`] to block until the server has answered.
pub struct Operation<'a> {
    guard: &'a MainloopGuard<'a>,
    ptr: *mut pulse_sys::Operation,
}

impl<'a> Operation<'a> {
    /// Wraps a pointer returned by libpulse.
    ///
    /// A null pointer means the request could not be issued; `on_null`
    /// produces the error for that case.
    pub(crate) fn from_raw(
        guard: &'a MainloopGuard<'a>,
        ptr: *mut pulse_sys::Operation,
        on_null: impl FnOnce() -> Error,
    ) -> Result<Self> {
        if ptr.is_null() {
            return Err(on_null());
        }
        Ok(Self { guard, ptr })
    }

    pub fn state(&self) -> OperationState {
        unsafe { self.guard.api().operation_get_state(self.ptr) }.into()
    }

    /// Blocks until the operation leaves the running state.
    ///
    /// `label` names the request in the error message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationFailed`] if the operation was cancelled, which
    /// happens when the context or stream died while it was pending.
    pub fn wait(self, label: &str) -> Result<()> {
        loop {
            match self.state() {
                OperationState::Running => self.guard.wait(),
                OperationState::Done => return Ok(()),
                state => {
                    tracing::debug!("{label} operation ended as {state:?}");
                    return Err(Error::OperationFailed(label.to_string()));
                }
            }
        }
    }
}

impl Drop for Operation<'_> {
    fn drop(&mut self) {
        unsafe { self.guard.api().operation_unref(self.ptr) };
    }
}

/// Success callback for stream requests; userdata is the mainloop.
pub(crate) unsafe extern "C" fn stream_success_cb(
    _stream: *mut pulse_sys::Stream,
    _success: std::os::raw::c_int,
    userdata: *mut c_void,
) {
    unsafe { signal_from_callback(userdata) };
}
