// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! The player-side audio output contract.
//!
//! A player drives one [`AudioSink`] from its audio thread: it initializes
//! the sink for a format, polls [`AudioSink::space`], pushes PCM with
//! [`AudioSink::add_packets`] and uses [`AudioSink::delay`] for A/V sync.

use serde::Serialize;

use crate::{Result, remap::PcmChannel};

/// Lowest volume in millibels; this value and anything below it mutes.
pub const VOLUME_MINIMUM: i32 = -6000;

/// Highest volume in millibels (unity gain).
pub const VOLUME_MAXIMUM: i32 = 0;

/// Observer of the audio a sink plays, typically a visualisation.
pub trait AudioCallback: Send {
    /// Called once the sink is ready to play the given format.
    fn on_initialize(&mut self, channels: u32, samples_per_sec: u32, bits_per_sample: u32);

    /// Called with each block of PCM accepted by the sink, in the player's layout.
    fn on_audio_data(&mut self, data: &[u8]);
}

/// Format and options for [`AudioSink::initialize`].
pub struct SinkParams {
    pub callback: Option<Box<dyn AudioCallback>>,
    /// Output device, as listed by sink enumeration.
    pub device: String,
    pub channels: u32,
    /// Speaker position of each input channel.
    pub channel_layout: Option<Vec<PcmChannel>>,
    pub samples_per_sec: u32,
    pub bits_per_sample: u32,
    pub resample: bool,
    pub is_music: bool,
    /// Compressed (bitstream) output instead of PCM.
    pub passthrough: bool,
}

impl SinkParams {
    /// PCM parameters with no layout, callback or flags set.
    pub fn pcm(
        device: impl Into<String>,
        channels: u32,
        samples_per_sec: u32,
        bits_per_sample: u32,
    ) -> Self {
        Self {
            callback: None,
            device: device.into(),
            channels,
            channel_layout: None,
            samples_per_sec,
            bits_per_sample,
            resample: false,
            is_music: false,
            passthrough: false,
        }
    }

    pub fn with_layout(mut self, layout: Vec<PcmChannel>) -> Self {
        self.channel_layout = Some(layout);
        self
    }
}

/// One selectable output device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioSinkEntry {
    pub description: String,
    pub device: String,
}

/// A PCM output device driven by the player.
///
/// Until [`AudioSink::initialize`] succeeds every call is a harmless no-op:
/// space is zero, packets are reported as consumed and state changes fail.
pub trait AudioSink {
    /// Opens the device for the given format.
    fn initialize(&mut self, params: SinkParams) -> Result<()>;

    /// Plays out what is queued and releases the device.
    fn deinitialize(&mut self) -> bool;

    fn pause(&mut self) -> bool;

    fn resume(&mut self) -> bool;

    /// Drops everything queued.
    fn stop(&mut self) -> bool;

    fn flush(&mut self);

    /// Queues as much of `data` as fits; returns the bytes consumed.
    fn add_packets(&mut self, data: &[u8]) -> usize;

    /// Bytes [`AudioSink::add_packets`] accepts right now.
    fn space(&self) -> usize;

    /// Seconds until a sample queued now is heard.
    fn delay(&self) -> f32;

    /// Seconds of audio queued.
    fn cache_time(&self) -> f32;

    /// Seconds of audio the device buffer holds when full.
    fn cache_total(&self) -> f32;

    /// Preferred size of one write in bytes.
    fn chunk_len(&self) -> usize;

    /// Volume in millibels.
    fn current_volume(&self) -> i32;

    fn set_current_volume(&mut self, millibels: i32) -> bool;

    fn mute(&mut self, mute: bool);

    fn set_play_speed(&mut self, speed: i32) -> i32;

    fn register_callback(&mut self, callback: Box<dyn AudioCallback>);

    fn unregister_callback(&mut self);

    /// Blocks until everything queued has been played.
    fn wait_completion(&mut self);

    fn switch_channels(&mut self, audio_stream: i32, audio_on_all_speakers: bool);
}
