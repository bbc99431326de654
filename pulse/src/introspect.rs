// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Server introspection: listing playback sinks.

use std::{
    ffi::{CStr, c_void},
    os::raw::{c_char, c_int},
};

use crate::{Context, Error, MainloopGuard, Operation, Result, mainloop::signal_from_callback};

/// A playback device known to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkInfo {
    pub index: u32,
    /// Unique sink name, usable as a device for new streams.
    pub name: String,
    /// Human readable description; falls back to the name when the server
    /// reports none.
    pub description: String,
}

struct SinkCollector {
    mainloop: *mut c_void,
    sinks: Vec<SinkInfo>,
}

fn owned(ptr: *const c_char) -> Option<String> {
    (!ptr.is_null()).then(|| unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

unsafe extern "C" fn sink_info_cb(
    _context: *mut pulse_sys::Context,
    info: *const pulse_sys::SinkInfo,
    eol: c_int,
    userdata: *mut c_void,
) {
    let collector = unsafe { &mut *(userdata as *mut SinkCollector) };
    if eol != 0 || info.is_null() {
        unsafe { signal_from_callback(collector.mainloop) };
        return;
    }
    let info = unsafe { &*info };
    let Some(name) = owned(info.name) else {
        return;
    };
    let description = owned(info.description).unwrap_or_else(|| name.clone());
    collector.sinks.push(SinkInfo {
        index: info.index,
        name,
        description,
    });
}

impl Context {
    /// Lists the sinks of a ready context, in server order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be issued or is cancelled.
    pub fn sink_info_list(&self, guard: &MainloopGuard<'_>) -> Result<Vec<SinkInfo>> {
        self.check_guard(guard);
        let mut collector = SinkCollector {
            mainloop: self.inner.mainloop.inner.as_userdata(),
            sinks: Vec::new(),
        };
        let ptr = unsafe {
            guard.api().context_get_sink_info_list(
                self.inner.ptr,
                Some(sink_info_cb),
                &mut collector as *mut SinkCollector as *mut c_void,
            )
        };
        let op = Operation::from_raw(guard, ptr, || {
            Error::from_code_or(self.errno(guard), || {
                Error::OperationFailed("get_sink_info_list".to_string())
            })
        })?;
        op.wait("get_sink_info_list")?;
        tracing::trace!("Server reported {} sinks", collector.sinks.len());
        Ok(collector.sinks)
    }
}
