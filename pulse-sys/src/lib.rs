// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! # pulse-sys: Raw FFI bindings to the PulseAudio client library
//!
//! This crate provides low-level, unsafe Rust bindings to the parts of
//! `libpulse` used by a playback backend: the threaded mainloop, the context,
//! playback streams, operations and sink introspection.
//!
//! ## Overview
//!
//! `pulse-sys` exposes:
//! - Raw C types (`SampleSpec`, `ChannelMap`, `CVolume`, `BufferAttr`, opaque handles)
//! - Raw C functions (prefixed with `pa_` in C, with the prefix stripped in Rust)
//! - Constants for context/stream/operation states, error codes and flags
//!
//! ## Usage
//!
//! **Most users should NOT use this crate directly.** Use the safe [`pulse`]
//! wrapper crate instead, which provides:
//! - RAII ownership of mainloops, contexts, streams and operations
//! - Lock guards enforcing the threaded mainloop locking discipline
//! - Rust-idiomatic error handling with `Result`
//!
//! ## Safety
//!
//! All functions in this crate are `unsafe` and require the caller to uphold
//! libpulse's invariants:
//! - Every call on a context, stream or operation must be made with the owning
//!   threaded mainloop locked (except before the loop is started)
//! - `threaded_mainloop_wait` may only be called with the lock held and never
//!   from the event loop thread
//! - Callbacks run on the event loop thread with the lock held
//!
//! ## Loading
//!
//! The library is not linked at build time. [`LibPulse::new`] opens the shared
//! object with `libloading` and resolves every symbol up front, so a missing
//! symbol surfaces as a load error instead of a crash later on.
//!
//! [`pulse`]: https://docs.rs/pulse

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(clippy::missing_safety_doc)]
#![allow(clippy::too_many_arguments)]

extern crate libloading;

use std::os::raw::{c_char, c_int, c_uint, c_void};

/// Maximum number of channels supported by the library.
pub const PA_CHANNELS_MAX: usize = 32;

/// Maximum sample rate accepted by `sample_spec_valid`.
pub const PA_RATE_MAX: u32 = 48000 * 8;

/// Normal (100%) software volume.
pub const PA_VOLUME_NORM: Volume = 0x10000;

/// Muted volume.
pub const PA_VOLUME_MUTED: Volume = 0;

/// Largest representable volume.
pub const PA_VOLUME_MAX: Volume = u32::MAX / 2;

/// Decibel value treated as minus infinity.
pub const PA_DECIBEL_MININFTY: f64 = -200.0;

pub type Volume = u32;
pub type Usec = u64;

// Sample formats (pa_sample_format_t)
pub type SampleFormat = c_int;
pub const PA_SAMPLE_U8: SampleFormat = 0;
pub const PA_SAMPLE_ALAW: SampleFormat = 1;
pub const PA_SAMPLE_ULAW: SampleFormat = 2;
pub const PA_SAMPLE_S16LE: SampleFormat = 3;
pub const PA_SAMPLE_S16BE: SampleFormat = 4;
pub const PA_SAMPLE_FLOAT32LE: SampleFormat = 5;
pub const PA_SAMPLE_FLOAT32BE: SampleFormat = 6;
pub const PA_SAMPLE_S32LE: SampleFormat = 7;
pub const PA_SAMPLE_S32BE: SampleFormat = 8;
pub const PA_SAMPLE_S24LE: SampleFormat = 9;
pub const PA_SAMPLE_S24BE: SampleFormat = 10;
pub const PA_SAMPLE_S24_32LE: SampleFormat = 11;
pub const PA_SAMPLE_S24_32BE: SampleFormat = 12;
pub const PA_SAMPLE_INVALID: SampleFormat = -1;

// Channel positions (pa_channel_position_t)
pub type ChannelPosition = c_int;
pub const PA_CHANNEL_POSITION_INVALID: ChannelPosition = -1;
pub const PA_CHANNEL_POSITION_MONO: ChannelPosition = 0;
pub const PA_CHANNEL_POSITION_FRONT_LEFT: ChannelPosition = 1;
pub const PA_CHANNEL_POSITION_FRONT_RIGHT: ChannelPosition = 2;
pub const PA_CHANNEL_POSITION_FRONT_CENTER: ChannelPosition = 3;
pub const PA_CHANNEL_POSITION_REAR_CENTER: ChannelPosition = 4;
pub const PA_CHANNEL_POSITION_REAR_LEFT: ChannelPosition = 5;
pub const PA_CHANNEL_POSITION_REAR_RIGHT: ChannelPosition = 6;
pub const PA_CHANNEL_POSITION_LFE: ChannelPosition = 7;
pub const PA_CHANNEL_POSITION_FRONT_LEFT_OF_CENTER: ChannelPosition = 8;
pub const PA_CHANNEL_POSITION_FRONT_RIGHT_OF_CENTER: ChannelPosition = 9;
pub const PA_CHANNEL_POSITION_SIDE_LEFT: ChannelPosition = 10;
pub const PA_CHANNEL_POSITION_SIDE_RIGHT: ChannelPosition = 11;
pub const PA_CHANNEL_POSITION_AUX0: ChannelPosition = 12;
pub const PA_CHANNEL_POSITION_AUX31: ChannelPosition = 43;
pub const PA_CHANNEL_POSITION_TOP_CENTER: ChannelPosition = 44;
pub const PA_CHANNEL_POSITION_TOP_FRONT_LEFT: ChannelPosition = 45;
pub const PA_CHANNEL_POSITION_TOP_FRONT_RIGHT: ChannelPosition = 46;
pub const PA_CHANNEL_POSITION_TOP_FRONT_CENTER: ChannelPosition = 47;
pub const PA_CHANNEL_POSITION_TOP_REAR_LEFT: ChannelPosition = 48;
pub const PA_CHANNEL_POSITION_TOP_REAR_RIGHT: ChannelPosition = 49;
pub const PA_CHANNEL_POSITION_TOP_REAR_CENTER: ChannelPosition = 50;

// Standard channel mappings (pa_channel_map_def_t)
pub type ChannelMapDef = c_int;
pub const PA_CHANNEL_MAP_AIFF: ChannelMapDef = 0;
pub const PA_CHANNEL_MAP_ALSA: ChannelMapDef = 1;
pub const PA_CHANNEL_MAP_AUX: ChannelMapDef = 2;
pub const PA_CHANNEL_MAP_WAVEEX: ChannelMapDef = 3;
pub const PA_CHANNEL_MAP_OSS: ChannelMapDef = 4;
pub const PA_CHANNEL_MAP_DEFAULT: ChannelMapDef = PA_CHANNEL_MAP_AIFF;

// Context states (pa_context_state_t)
pub type ContextState = c_uint;
pub const PA_CONTEXT_UNCONNECTED: ContextState = 0;
pub const PA_CONTEXT_CONNECTING: ContextState = 1;
pub const PA_CONTEXT_AUTHORIZING: ContextState = 2;
pub const PA_CONTEXT_SETTING_NAME: ContextState = 3;
pub const PA_CONTEXT_READY: ContextState = 4;
pub const PA_CONTEXT_FAILED: ContextState = 5;
pub const PA_CONTEXT_TERMINATED: ContextState = 6;

// Stream states (pa_stream_state_t)
pub type StreamState = c_uint;
pub const PA_STREAM_UNCONNECTED: StreamState = 0;
pub const PA_STREAM_CREATING: StreamState = 1;
pub const PA_STREAM_READY: StreamState = 2;
pub const PA_STREAM_FAILED: StreamState = 3;
pub const PA_STREAM_TERMINATED: StreamState = 4;

// Operation states (pa_operation_state_t)
pub type OperationState = c_uint;
pub const PA_OPERATION_RUNNING: OperationState = 0;
pub const PA_OPERATION_DONE: OperationState = 1;
pub const PA_OPERATION_CANCELLED: OperationState = 2;

// Context flags (pa_context_flags_t)
pub type ContextFlags = c_uint;
pub const PA_CONTEXT_NOFLAGS: ContextFlags = 0;
pub const PA_CONTEXT_NOAUTOSPAWN: ContextFlags = 1;
pub const PA_CONTEXT_NOFAIL: ContextFlags = 2;

// Stream flags (pa_stream_flags_t)
pub type StreamFlags = c_uint;
pub const PA_STREAM_NOFLAGS: StreamFlags = 0x0000;
pub const PA_STREAM_START_CORKED: StreamFlags = 0x0001;
pub const PA_STREAM_INTERPOLATE_TIMING: StreamFlags = 0x0002;
pub const PA_STREAM_NOT_MONOTONIC: StreamFlags = 0x0004;
pub const PA_STREAM_AUTO_TIMING_UPDATE: StreamFlags = 0x0008;
pub const PA_STREAM_ADJUST_LATENCY: StreamFlags = 0x2000;

// Seek modes (pa_seek_mode_t)
pub type SeekMode = c_uint;
pub const PA_SEEK_RELATIVE: SeekMode = 0;
pub const PA_SEEK_ABSOLUTE: SeekMode = 1;

// Error codes (pa_error_code_t)
pub const PA_OK: c_int = 0;
pub const PA_ERR_ACCESS: c_int = 1;
pub const PA_ERR_COMMAND: c_int = 2;
pub const PA_ERR_INVALID: c_int = 3;
pub const PA_ERR_EXIST: c_int = 4;
pub const PA_ERR_NOENTITY: c_int = 5;
pub const PA_ERR_CONNECTIONREFUSED: c_int = 6;
pub const PA_ERR_PROTOCOL: c_int = 7;
pub const PA_ERR_TIMEOUT: c_int = 8;
pub const PA_ERR_AUTHKEY: c_int = 9;
pub const PA_ERR_INTERNAL: c_int = 10;
pub const PA_ERR_CONNECTIONTERMINATED: c_int = 11;
pub const PA_ERR_KILLED: c_int = 12;
pub const PA_ERR_INVALIDSERVER: c_int = 13;
pub const PA_ERR_MODINITFAILED: c_int = 14;
pub const PA_ERR_BADSTATE: c_int = 15;
pub const PA_ERR_NODATA: c_int = 16;
pub const PA_ERR_VERSION: c_int = 17;
pub const PA_ERR_TOOLARGE: c_int = 18;
pub const PA_ERR_NOTSUPPORTED: c_int = 19;
pub const PA_ERR_UNKNOWN: c_int = 20;
pub const PA_ERR_NOEXTENSION: c_int = 21;
pub const PA_ERR_OBSOLETE: c_int = 22;
pub const PA_ERR_NOTIMPLEMENTED: c_int = 23;
pub const PA_ERR_FORKED: c_int = 24;
pub const PA_ERR_IO: c_int = 25;
pub const PA_ERR_BUSY: c_int = 26;

/// Sample format, rate and channel count of a stream (`pa_sample_spec`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub format: SampleFormat,
    pub rate: u32,
    pub channels: u8,
}

/// Channel position per stream channel (`pa_channel_map`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelMap {
    pub channels: u8,
    pub map: [ChannelPosition; PA_CHANNELS_MAX],
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self {
            channels: 0,
            map: [PA_CHANNEL_POSITION_INVALID; PA_CHANNELS_MAX],
        }
    }
}

/// Per-channel volume (`pa_cvolume`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CVolume {
    pub channels: u8,
    pub values: [Volume; PA_CHANNELS_MAX],
}

/// Playback buffer metrics (`pa_buffer_attr`).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferAttr {
    pub maxlength: u32,
    pub tlength: u32,
    pub prebuf: u32,
    pub minreq: u32,
    pub fragsize: u32,
}

/// Leading fields of `pa_sink_info`.
///
/// Only ever read through a pointer handed out by the library, so the
/// remaining fields of the C struct are left undeclared.
#[repr(C)]
#[derive(Debug)]
pub struct SinkInfo {
    pub name: *const c_char,
    pub index: u32,
    pub description: *const c_char,
}

#[repr(C)]
#[derive(Debug)]
pub struct ThreadedMainloop {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug)]
pub struct MainloopApi {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug)]
pub struct Context {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug)]
pub struct Stream {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug)]
pub struct Operation {
    _unused: [u8; 0],
}

#[repr(C)]
#[derive(Debug)]
pub struct SpawnApi {
    _unused: [u8; 0],
}

pub type ContextNotifyCb = Option<unsafe extern "C" fn(c: *mut Context, userdata: *mut c_void)>;
pub type ContextSuccessCb =
    Option<unsafe extern "C" fn(c: *mut Context, success: c_int, userdata: *mut c_void)>;
pub type StreamNotifyCb = Option<unsafe extern "C" fn(s: *mut Stream, userdata: *mut c_void)>;
pub type StreamRequestCb =
    Option<unsafe extern "C" fn(s: *mut Stream, nbytes: usize, userdata: *mut c_void)>;
pub type StreamSuccessCb =
    Option<unsafe extern "C" fn(s: *mut Stream, success: c_int, userdata: *mut c_void)>;
pub type SinkInfoCb = Option<
    unsafe extern "C" fn(c: *mut Context, i: *const SinkInfo, eol: c_int, userdata: *mut c_void),
>;
pub type FreeCb = Option<unsafe extern "C" fn(p: *mut c_void)>;

/// Declares the dynamically loaded function table.
///
/// Each entry becomes a public function-pointer field plus an `unsafe` method
/// of the same name forwarding to it.
macro_rules! dynamic_library {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $field:ident = $symbol:literal : fn($($arg:ident: $ty:ty),* $(,)?) $(-> $ret:ty)?; )*
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            __library: ::libloading::Library,
            $( pub $field: unsafe extern "C" fn($($ty),*) $(-> $ret)?, )*
        }

        impl $name {
            /// Opens the shared object at `path` and resolves all symbols.
            pub unsafe fn new<P>(path: P) -> Result<Self, ::libloading::Error>
            where
                P: AsRef<::std::ffi::OsStr>,
            {
                let library = unsafe { ::libloading::Library::new(path)? };
                unsafe { Self::from_library(library) }
            }

            /// Resolves all symbols from an already opened library.
            pub unsafe fn from_library<L>(library: L) -> Result<Self, ::libloading::Error>
            where
                L: Into<::libloading::Library>,
            {
                let __library = library.into();
                $(
                    let $field = unsafe {
                        __library
                            .get::<unsafe extern "C" fn($($ty),*) $(-> $ret)?>($symbol)
                            .map(|sym| *sym)?
                    };
                )*
                Ok(Self { __library, $($field),* })
            }

            $(
                pub unsafe fn $field(&self, $($arg: $ty),*) $(-> $ret)? {
                    unsafe { (self.$field)($($arg),*) }
                }
            )*
        }
    };
}

dynamic_library! {
    /// Function table of `libpulse.so.0`.
    pub struct LibPulse {
        get_library_version = b"pa_get_library_version\0": fn() -> *const c_char;
        strerror = b"pa_strerror\0": fn(error: c_int) -> *const c_char;
        sample_spec_valid = b"pa_sample_spec_valid\0": fn(spec: *const SampleSpec) -> c_int;

        // pa_cvolume_reset and pa_cvolume_mute are header macros over cvolume_set.
        sw_volume_from_db = b"pa_sw_volume_from_dB\0": fn(db: f64) -> Volume;
        cvolume_set = b"pa_cvolume_set\0": fn(a: *mut CVolume, channels: c_uint, v: Volume) -> *mut CVolume;
        channel_map_init_auto = b"pa_channel_map_init_auto\0": fn(m: *mut ChannelMap, channels: c_uint, def: ChannelMapDef) -> *mut ChannelMap;

        threaded_mainloop_new = b"pa_threaded_mainloop_new\0": fn() -> *mut ThreadedMainloop;
        threaded_mainloop_free = b"pa_threaded_mainloop_free\0": fn(m: *mut ThreadedMainloop);
        threaded_mainloop_start = b"pa_threaded_mainloop_start\0": fn(m: *mut ThreadedMainloop) -> c_int;
        threaded_mainloop_stop = b"pa_threaded_mainloop_stop\0": fn(m: *mut ThreadedMainloop);
        threaded_mainloop_lock = b"pa_threaded_mainloop_lock\0": fn(m: *mut ThreadedMainloop);
        threaded_mainloop_unlock = b"pa_threaded_mainloop_unlock\0": fn(m: *mut ThreadedMainloop);
        threaded_mainloop_wait = b"pa_threaded_mainloop_wait\0": fn(m: *mut ThreadedMainloop);
        threaded_mainloop_signal = b"pa_threaded_mainloop_signal\0": fn(m: *mut ThreadedMainloop, wait_for_accept: c_int);
        threaded_mainloop_get_api = b"pa_threaded_mainloop_get_api\0": fn(m: *mut ThreadedMainloop) -> *mut MainloopApi;
        threaded_mainloop_in_thread = b"pa_threaded_mainloop_in_thread\0": fn(m: *mut ThreadedMainloop) -> c_int;

        context_new = b"pa_context_new\0": fn(api: *mut MainloopApi, name: *const c_char) -> *mut Context;
        context_unref = b"pa_context_unref\0": fn(c: *mut Context);
        context_connect = b"pa_context_connect\0": fn(c: *mut Context, server: *const c_char, flags: ContextFlags, api: *const SpawnApi) -> c_int;
        context_disconnect = b"pa_context_disconnect\0": fn(c: *mut Context);
        context_get_state = b"pa_context_get_state\0": fn(c: *const Context) -> ContextState;
        context_errno = b"pa_context_errno\0": fn(c: *const Context) -> c_int;
        context_set_state_callback = b"pa_context_set_state_callback\0": fn(c: *mut Context, cb: ContextNotifyCb, userdata: *mut c_void);
        context_set_sink_input_volume = b"pa_context_set_sink_input_volume\0": fn(c: *mut Context, idx: u32, volume: *const CVolume, cb: ContextSuccessCb, userdata: *mut c_void) -> *mut Operation;
        context_get_sink_info_list = b"pa_context_get_sink_info_list\0": fn(c: *mut Context, cb: SinkInfoCb, userdata: *mut c_void) -> *mut Operation;

        stream_new = b"pa_stream_new\0": fn(c: *mut Context, name: *const c_char, spec: *const SampleSpec, map: *const ChannelMap) -> *mut Stream;
        stream_unref = b"pa_stream_unref\0": fn(s: *mut Stream);
        stream_connect_playback = b"pa_stream_connect_playback\0": fn(s: *mut Stream, dev: *const c_char, attr: *const BufferAttr, flags: StreamFlags, volume: *const CVolume, sync_stream: *mut Stream) -> c_int;
        stream_disconnect = b"pa_stream_disconnect\0": fn(s: *mut Stream) -> c_int;
        stream_get_state = b"pa_stream_get_state\0": fn(s: *const Stream) -> StreamState;
        stream_get_index = b"pa_stream_get_index\0": fn(s: *const Stream) -> u32;
        stream_set_state_callback = b"pa_stream_set_state_callback\0": fn(s: *mut Stream, cb: StreamNotifyCb, userdata: *mut c_void);
        stream_set_write_callback = b"pa_stream_set_write_callback\0": fn(s: *mut Stream, cb: StreamRequestCb, userdata: *mut c_void);
        stream_set_latency_update_callback = b"pa_stream_set_latency_update_callback\0": fn(s: *mut Stream, cb: StreamNotifyCb, userdata: *mut c_void);
        stream_get_buffer_attr = b"pa_stream_get_buffer_attr\0": fn(s: *const Stream) -> *const BufferAttr;
        stream_set_buffer_attr = b"pa_stream_set_buffer_attr\0": fn(s: *mut Stream, attr: *const BufferAttr, cb: StreamSuccessCb, userdata: *mut c_void) -> *mut Operation;
        stream_writable_size = b"pa_stream_writable_size\0": fn(s: *const Stream) -> usize;
        stream_write = b"pa_stream_write\0": fn(s: *mut Stream, data: *const c_void, nbytes: usize, free_cb: FreeCb, offset: i64, seek: SeekMode) -> c_int;
        stream_cork = b"pa_stream_cork\0": fn(s: *mut Stream, b: c_int, cb: StreamSuccessCb, userdata: *mut c_void) -> *mut Operation;
        stream_flush = b"pa_stream_flush\0": fn(s: *mut Stream, cb: StreamSuccessCb, userdata: *mut c_void) -> *mut Operation;
        stream_drain = b"pa_stream_drain\0": fn(s: *mut Stream, cb: StreamSuccessCb, userdata: *mut c_void) -> *mut Operation;
        stream_get_latency = b"pa_stream_get_latency\0": fn(s: *mut Stream, r_usec: *mut Usec, negative: *mut c_int) -> c_int;

        operation_get_state = b"pa_operation_get_state\0": fn(o: *const Operation) -> OperationState;
        operation_unref = b"pa_operation_unref\0": fn(o: *mut Operation);
    }
}

// Safety: the function table is immutable after loading, and libpulse itself
// serializes access to its objects through the threaded mainloop lock.
unsafe impl Send for LibPulse {}
unsafe impl Sync for LibPulse {}
