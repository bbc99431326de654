// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! The boundary between the sink logic and the sound server.
//!
//! [`crate::DirectSoundSink`] only talks to a [`SoundServer`] and the
//! [`PlaybackStream`] it opens. [`crate::PulseServer`] implements both on top
//! of libpulse; tests substitute an in-memory server.

use std::time::Duration;

use pulse::{BufferAttr, ChannelMap, SampleSpec, SinkInfo, StreamFlags};

/// Everything needed to open a playback stream.
#[derive(Debug, Clone)]
pub struct PlaybackRequest {
    /// Server address, `None` for the session default.
    pub server: Option<String>,
    /// Sink name, `None` for the server's default sink.
    pub sink: Option<String>,
    pub stream_name: String,
    pub spec: SampleSpec,
    /// Explicit layout, `None` for the library's default for the channel count.
    pub channel_map: Option<ChannelMap>,
    pub flags: StreamFlags,
}

/// Volume applied to every channel of a playback stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamVolume {
    Muted,
    Decibels(f64),
}

/// A source of playback streams and sink listings.
pub trait SoundServer {
    type Playback: PlaybackStream;

    /// Connects to the server and opens a ready playback stream.
    fn open_playback(&self, request: &PlaybackRequest) -> pulse::Result<Self::Playback>;

    /// Lists the sinks of the default server.
    fn list_sinks(&self) -> pulse::Result<Vec<SinkInfo>>;
}

/// A connected playback stream.
///
/// Each call is one locked round trip to the server. Blocking calls
/// (`set_buffer_attr`, `cork`, `flush`, `drain`) return once the server has
/// acknowledged the request.
pub trait PlaybackStream: Send {
    fn buffer_attr(&self) -> pulse::Result<BufferAttr>;

    fn set_buffer_attr(&mut self, attr: &BufferAttr) -> pulse::Result<()>;

    /// Bytes that can be written without overrunning the server buffer.
    fn writable_size(&self) -> pulse::Result<usize>;

    fn write(&mut self, data: &[u8]) -> pulse::Result<()>;

    fn cork(&mut self, cork: bool) -> pulse::Result<()>;

    fn flush(&mut self) -> pulse::Result<()>;

    fn drain(&mut self) -> pulse::Result<()>;

    /// Playback latency; [`pulse::Error::NoData`] until timing information
    /// has arrived.
    fn latency(&self) -> pulse::Result<Duration>;

    /// Blocks until the server sends new timing information. Fails if the
    /// stream is no longer playing.
    fn wait_timing_update(&self) -> pulse::Result<()>;

    /// Applies a volume to the stream without waiting for the server.
    fn set_volume(&mut self, volume: StreamVolume) -> pulse::Result<()>;
}
