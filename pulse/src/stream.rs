// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Playback streams.
//!
//! A [`Stream`] is created on a [`Context`], connected to a sink and then fed
//! with PCM data. Every method takes a [`MainloopGuard`]; the stream itself
//! holds no lock.

use std::{
    ffi::{CString, c_void},
    ops::BitOr,
    os::raw::c_int,
    time::Duration,
};

use crate::{
    ChannelMap, ChannelVolumes, Context, Error, MainloopGuard, Operation, Result, SampleSpec,
    StreamState, api::strerror, mainloop::signal_from_callback, operation::stream_success_cb,
};

pub use pulse_sys::BufferAttr;

/// Flags for [`Stream::connect_playback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamFlags(pulse_sys::StreamFlags);

impl StreamFlags {
    pub const NONE: StreamFlags = StreamFlags(pulse_sys::PA_STREAM_NOFLAGS);
    /// Connect the stream paused.
    pub const START_CORKED: StreamFlags = StreamFlags(pulse_sys::PA_STREAM_START_CORKED);
    /// Interpolate latency between timing updates.
    pub const INTERPOLATE_TIMING: StreamFlags = StreamFlags(pulse_sys::PA_STREAM_INTERPOLATE_TIMING);
    /// Let the server send timing updates periodically.
    pub const AUTO_TIMING_UPDATE: StreamFlags = StreamFlags(pulse_sys::PA_STREAM_AUTO_TIMING_UPDATE);
    /// Size the server-side buffer from the requested latency.
    pub const ADJUST_LATENCY: StreamFlags = StreamFlags(pulse_sys::PA_STREAM_ADJUST_LATENCY);

    pub fn bits(self) -> pulse_sys::StreamFlags {
        self.0
    }

    pub fn contains(self, other: StreamFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for StreamFlags {
    type Output = StreamFlags;

    fn bitor(self, rhs: StreamFlags) -> StreamFlags {
        StreamFlags(self.0 | rhs.0)
    }
}

unsafe extern "C" fn stream_notify_cb(_stream: *mut pulse_sys::Stream, userdata: *mut c_void) {
    unsafe { signal_from_callback(userdata) };
}

unsafe extern "C" fn stream_request_cb(
    _stream: *mut pulse_sys::Stream,
    _nbytes: usize,
    userdata: *mut c_void,
) {
    unsafe { signal_from_callback(userdata) };
}

/// A playback stream.
///
/// Dropping the stream locks the mainloop, detaches the callbacks and
/// disconnects it from the server.
pub struct Stream {
    context: Context,
    ptr: *mut pulse_sys::Stream,
}

// Safety: the stream pointer is only used with the mainloop lock held, which
// every method enforces through its guard argument.
unsafe impl Send for Stream {}

impl Stream {
    /// Creates an unconnected stream.
    ///
    /// The state, write and latency-update callbacks are registered so that
    /// waits on the mainloop wake up on any of those events.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidSampleSpec`] if libpulse rejects `spec`
    /// - [`Error::InvalidArg`] if `map` does not have one position per channel
    pub fn new(
        guard: &MainloopGuard<'_>,
        context: &Context,
        name: &str,
        spec: &SampleSpec,
        map: &ChannelMap,
    ) -> Result<Self> {
        context.check_guard(guard);
        let api = guard.api();
        let raw_spec = spec.to_raw();
        if !spec.is_valid() || unsafe { api.sample_spec_valid(&raw_spec) } == 0 {
            return Err(Error::InvalidSampleSpec(spec.to_string()));
        }
        if map.len() != spec.channels as usize {
            return Err(Error::InvalidArg);
        }
        let name = CString::new(name)?;
        let raw_map = map.to_raw();
        let ptr = unsafe {
            api.stream_new(context.inner.ptr, name.as_ptr(), &raw_spec, &raw_map)
        };
        if ptr.is_null() {
            return Err(Error::from_code_or(context.errno(guard), || {
                Error::StreamFailed("stream_new".to_string())
            }));
        }
        let userdata = context.inner.mainloop.inner.as_userdata();
        unsafe {
            api.stream_set_state_callback(ptr, Some(stream_notify_cb), userdata);
            api.stream_set_write_callback(ptr, Some(stream_request_cb), userdata);
            api.stream_set_latency_update_callback(ptr, Some(stream_notify_cb), userdata);
        }
        Ok(Self {
            context: context.clone(),
            ptr,
        })
    }

    /// Connects the stream to `device`, or to the server's default sink.
    ///
    /// # Errors
    ///
    /// Returns the library's error if the connection cannot be started.
    pub fn connect_playback(
        &self,
        guard: &MainloopGuard<'_>,
        device: Option<&str>,
        flags: StreamFlags,
        volume: &ChannelVolumes,
    ) -> Result<()> {
        let device = device.map(CString::new).transpose()?;
        let ret = unsafe {
            guard.api().stream_connect_playback(
                self.ptr,
                device.as_ref().map_or(std::ptr::null(), |d| d.as_ptr()),
                std::ptr::null(),
                flags.bits(),
                volume.as_raw(),
                std::ptr::null_mut(),
            )
        };
        if ret < 0 {
            return Err(self.last_error(guard));
        }
        Ok(())
    }

    /// Blocks until the stream is ready.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StreamFailed`] with the server's reason if the stream
    /// fails or terminates instead.
    pub fn wait_ready(&self, guard: &MainloopGuard<'_>) -> Result<()> {
        let mut last = None;
        loop {
            let state = self.state(guard);
            if last != Some(state) {
                tracing::debug!("Stream {state}");
                last = Some(state);
            }
            match state {
                StreamState::Ready => return Ok(()),
                state if !state.is_good() => {
                    let code = self.context.errno(guard);
                    return Err(Error::StreamFailed(strerror(guard.api(), code)));
                }
                _ => guard.wait(),
            }
        }
    }

    pub fn state(&self, guard: &MainloopGuard<'_>) -> StreamState {
        unsafe { guard.api().stream_get_state(self.ptr) }.into()
    }

    /// Server-side index of the stream, used for per-stream volume.
    pub fn index(&self, guard: &MainloopGuard<'_>) -> u32 {
        unsafe { guard.api().stream_get_index(self.ptr) }
    }

    /// Buffer metrics currently in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not connected.
    pub fn buffer_attr(&self, guard: &MainloopGuard<'_>) -> Result<BufferAttr> {
        let attr = unsafe { guard.api().stream_get_buffer_attr(self.ptr) };
        if attr.is_null() {
            return Err(self.last_error(guard));
        }
        Ok(unsafe { *attr })
    }

    /// Requests new buffer metrics.
    pub fn set_buffer_attr<'a>(
        &self,
        guard: &'a MainloopGuard<'a>,
        attr: &BufferAttr,
    ) -> Result<Operation<'a>> {
        let op = unsafe {
            guard.api().stream_set_buffer_attr(
                self.ptr,
                attr,
                Some(stream_success_cb),
                self.userdata(),
            )
        };
        Operation::from_raw(guard, op, || self.last_error(guard))
    }

    /// Bytes the server can accept right now without overrunning its buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not ready.
    pub fn writable_size(&self, guard: &MainloopGuard<'_>) -> Result<usize> {
        let size = unsafe { guard.api().stream_writable_size(self.ptr) };
        if size == usize::MAX {
            return Err(self.last_error(guard));
        }
        Ok(size)
    }

    /// Queues `data` for playback. libpulse copies the data.
    ///
    /// # Errors
    ///
    /// Returns the library's error if the write is rejected.
    pub fn write(&self, guard: &MainloopGuard<'_>, data: &[u8]) -> Result<()> {
        let ret = unsafe {
            guard.api().stream_write(
                self.ptr,
                data.as_ptr() as *const c_void,
                data.len(),
                None,
                0,
                pulse_sys::PA_SEEK_RELATIVE,
            )
        };
        Error::from_code(ret)
    }

    /// Pauses (`true`) or resumes (`false`) playback.
    pub fn cork<'a>(&self, guard: &'a MainloopGuard<'a>, cork: bool) -> Result<Operation<'a>> {
        let op = unsafe {
            guard.api().stream_cork(
                self.ptr,
                c_int::from(cork),
                Some(stream_success_cb),
                self.userdata(),
            )
        };
        Operation::from_raw(guard, op, || self.last_error(guard))
    }

    /// Discards everything queued on the server.
    pub fn flush<'a>(&self, guard: &'a MainloopGuard<'a>) -> Result<Operation<'a>> {
        let op = unsafe {
            guard
                .api()
                .stream_flush(self.ptr, Some(stream_success_cb), self.userdata())
        };
        Operation::from_raw(guard, op, || self.last_error(guard))
    }

    /// Completes once everything queued has been played.
    pub fn drain<'a>(&self, guard: &'a MainloopGuard<'a>) -> Result<Operation<'a>> {
        let op = unsafe {
            guard
                .api()
                .stream_drain(self.ptr, Some(stream_success_cb), self.userdata())
        };
        Operation::from_raw(guard, op, || self.last_error(guard))
    }

    /// Current playback latency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] until the first timing update has arrived.
    /// Negative latencies are reported as zero.
    pub fn latency(&self, guard: &MainloopGuard<'_>) -> Result<Duration> {
        let mut usec: pulse_sys::Usec = 0;
        let mut negative: c_int = 0;
        let ret = unsafe { guard.api().stream_get_latency(self.ptr, &mut usec, &mut negative) };
        Error::from_code(ret)?;
        if negative != 0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::from_micros(usec))
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn userdata(&self) -> *mut c_void {
        self.context.inner.mainloop.inner.as_userdata()
    }

    fn last_error(&self, guard: &MainloopGuard<'_>) -> Error {
        Error::from_code_or(self.context.errno(guard), || {
            Error::StreamFailed(self.state(guard).to_string())
        })
    }
}

impl Drop for Stream {
    fn drop(&mut self) {
        let mainloop = &self.context.inner.mainloop;
        let guard = (!mainloop.in_thread()).then(|| mainloop.lock());
        let api = mainloop.api();
        unsafe {
            api.stream_set_state_callback(self.ptr, None, std::ptr::null_mut());
            api.stream_set_write_callback(self.ptr, None, std::ptr::null_mut());
            api.stream_set_latency_update_callback(self.ptr, None, std::ptr::null_mut());
            api.stream_disconnect(self.ptr);
            api.stream_unref(self.ptr);
        }
        drop(guard);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playback_flags_combine() {
        let flags = StreamFlags::INTERPOLATE_TIMING | StreamFlags::AUTO_TIMING_UPDATE;
        assert_eq!(flags.bits(), 0x000a);
        assert!(flags.contains(StreamFlags::AUTO_TIMING_UPDATE));
        assert!(!flags.contains(StreamFlags::START_CORKED));
        assert_eq!(StreamFlags::default(), StreamFlags::NONE);
    }
}
