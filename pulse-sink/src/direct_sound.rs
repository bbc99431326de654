// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! The direct-sound playback sink.
//!
//! [`DirectSoundSink`] adapts the player's [`AudioSink`] contract onto one
//! playback stream of a [`SoundServer`]. It keeps the small amount of state
//! the server does not track for it:
//!
//! - whether the stream is corked (`paused`)
//! - whether the server buffer was flushed since the last write
//!   (`recently_flushed`); resuming such a stream is deferred until data
//!   arrives, so playback does not restart on an empty buffer
//! - the volume level chosen by the player, kept across mute
//!
//! Byte counts at the contract boundary are in the player's layout. When the
//! stream is opened with a different channel count (mono widened to stereo,
//! unused positions dropped), sizes are scaled between the two layouts.

use tracing::{debug, error, warn};

use pulse::{BufferAttr, ChannelMap, SampleFormat, SampleSpec, StreamFlags};

use crate::{
    AudioCallback, AudioSink, AudioSinkEntry, DeviceString, Result, SinkError, SinkParams,
    SinkSettings,
    audio_sink::VOLUME_MINIMUM,
    backend::{PlaybackRequest, PlaybackStream, SoundServer, StreamVolume},
    remap::ChannelRemapper,
};

/// Frames per packet until the server reports its minimum request size.
const DEFAULT_PACKET_FRAMES: usize = 512;

/// Converts a player volume to a stream volume.
///
/// The player's millibel range maps onto `-45 dB ..= 0 dB`; the minimum and
/// anything below it is silence.
pub fn millibels_to_volume(millibels: i32) -> StreamVolume {
    if millibels <= VOLUME_MINIMUM {
        return StreamVolume::Muted;
    }
    StreamVolume::Decibels(f64::from(millibels) * 1.5 / 200.0)
}

/// Lists the sinks of `server` as selectable devices.
///
/// The first entry always selects the server's default sink. Passthrough
/// output is not supported, so that list is empty.
pub fn enumerate_sinks<S: SoundServer>(
    server: &S,
    default_label: &str,
    passthrough: bool,
) -> Vec<AudioSinkEntry> {
    if passthrough {
        return Vec::new();
    }
    let sinks = match server.list_sinks() {
        Ok(sinks) => sinks,
        Err(e) => {
            error!("PulseAudio: Failed to list sinks: {e}");
            return Vec::new();
        }
    };
    let default = AudioSinkEntry {
        description: default_label.to_string(),
        device: DeviceString::default().to_string(),
    };
    std::iter::once(default)
        .chain(sinks.into_iter().filter_map(|sink| {
            let device = DeviceString::for_sink(&sink.name);
            if !device.round_trips() {
                debug!(
                    "PulseAudio: Skipping {}, sink name {:?} has no device string of its own",
                    sink.description, sink.name
                );
                return None;
            }
            let device = device.to_string();
            debug!(
                "PulseAudio: Found {} with devicestring {device}",
                sink.description
            );
            Some(AudioSinkEntry {
                description: sink.description,
                device,
            })
        }))
        .collect()
}

/// An open stream and the bookkeeping around it.
struct Playback<P> {
    stream: P,
    /// Channels in the player's data.
    data_channels: usize,
    /// Channels the stream was opened with.
    channels: usize,
    bytes_per_sample: usize,
    bytes_per_second: usize,
    packet_size: usize,
    buffer_size: usize,
    paused: bool,
    recently_flushed: bool,
    auto_resume: bool,
    scratch: Vec<u8>,
}

impl<P: PlaybackStream> Playback<P> {
    /// Raises the prebuffer to `prebuf_factor` minimum requests and adopts
    /// the buffer metrics the server settles on.
    fn negotiate_buffer(&mut self, prebuf_factor: u32) {
        let attr = match self.stream.buffer_attr() {
            Ok(attr) => attr,
            Err(e) => {
                error!("PulseAudio: {e}");
                return;
            }
        };
        self.packet_size = attr.minreq as usize;
        self.buffer_size = attr.tlength as usize;
        debug!(
            "PulseAudio: Default buffer attributes, maxlength={}, tlength={}, prebuf={}, minreq={}",
            attr.maxlength, attr.tlength, attr.prebuf, attr.minreq
        );

        let requested = BufferAttr {
            prebuf: attr.minreq.saturating_mul(prebuf_factor),
            ..attr
        };
        if let Err(e) = self.stream.set_buffer_attr(&requested) {
            error!("PulseAudio: {e}");
        }

        match self.stream.buffer_attr() {
            Ok(attr) => {
                self.packet_size = attr.minreq as usize;
                self.buffer_size = attr.tlength as usize;
                debug!(
                    "PulseAudio: Chosen buffer attributes, maxlength={}, tlength={}, prebuf={}, minreq={}",
                    attr.maxlength, attr.tlength, attr.prebuf, attr.minreq
                );
            }
            Err(e) => error!("PulseAudio: {e}"),
        }
    }

    /// Corks or uncorks; returns the resulting cork state.
    fn cork(&mut self, cork: bool) -> bool {
        match self.stream.cork(cork) {
            Ok(()) => cork,
            Err(e) => {
                error!("PulseAudio: {e}");
                !cork
            }
        }
    }

    /// Plays out what is queued. A corked stream never finishes draining,
    /// so its queue is left to be dropped with the stream.
    fn drain(&mut self) {
        if self.paused {
            debug!("PulseAudio: Not draining a paused stream");
            return;
        }
        if let Err(e) = self.stream.drain() {
            error!("PulseAudio: {e}");
        }
    }

    fn writable(&self) -> usize {
        self.stream.writable_size().unwrap_or_else(|e| {
            error!("PulseAudio: {e}");
            0
        })
    }

    /// Converts a size in stream bytes to player bytes.
    fn to_data_bytes(&self, bytes: usize) -> usize {
        (bytes / self.channels) * self.data_channels
    }
}

/// PulseAudio playback sink for the player's PCM output.
///
/// # Examples
///
/// ```no_run
/// use pulse_sink::{AudioSink, DirectSoundSink, PulseServer, SinkParams, SinkSettings};
///
/// # fn main() -> Result<(), pulse_sink::SinkError> {
/// let settings = SinkSettings::default();
/// let server = PulseServer::from_settings(&settings)?;
/// let mut sink = DirectSoundSink::new(server, settings);
///
/// sink.initialize(SinkParams::pcm("pulse:default@default", 2, 48000, 16))?;
/// let silence = vec![0u8; sink.chunk_len()];
/// let written = sink.add_packets(&silence);
/// assert!(written <= silence.len());
/// sink.deinitialize();
/// # Ok(())
/// # }
/// ```
pub struct DirectSoundSink<S: SoundServer> {
    server: S,
    settings: SinkSettings,
    callback: Option<Box<dyn AudioCallback>>,
    remap: ChannelRemapper,
    playback: Option<Playback<S::Playback>>,
    /// Player volume in millibels, kept while muted.
    current_volume: i32,
}

impl<S: SoundServer> DirectSoundSink<S> {
    pub fn new(server: S, settings: SinkSettings) -> Self {
        Self {
            current_volume: settings.volume_level,
            server,
            settings,
            callback: None,
            remap: ChannelRemapper::new(),
            playback: None,
        }
    }

    /// `true` between a successful initialize and deinitialize.
    pub fn is_allocated(&self) -> bool {
        self.playback.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.playback.as_ref().is_some_and(|p| p.paused)
    }

    /// Channel count the stream was opened with.
    pub fn output_channels(&self) -> Option<usize> {
        self.playback.as_ref().map(|p| p.channels)
    }

    pub fn settings(&self) -> &SinkSettings {
        &self.settings
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    /// Lists the devices this sink can play to.
    pub fn enumerate_sinks(&self, passthrough: bool) -> Vec<AudioSinkEntry> {
        enumerate_sinks(&self.server, &self.settings.default_sink_label, passthrough)
    }

    fn apply_volume(&mut self, millibels: i32) -> bool {
        let Some(p) = self.playback.as_mut() else {
            return false;
        };
        match p.stream.set_volume(millibels_to_volume(millibels)) {
            Ok(()) => true,
            Err(e) => {
                error!("PulseAudio: Failed to set volume: {e}");
                false
            }
        }
    }

    fn open(&mut self, params: &SinkParams) -> Result<Playback<S::Playback>> {
        let data_channels = params.channels as usize;
        if data_channels == 0 {
            return Err(SinkError::InvalidFormat("no channels".to_string()));
        }
        let bytes_per_sample = (params.bits_per_sample / 8) as usize;

        let mut out_layout = Vec::new();
        if !params.passthrough
            && let Some(layout) = params.channel_layout.as_deref()
        {
            out_layout = self
                .remap
                .set_input_format(data_channels, layout, bytes_per_sample)
                .to_vec();
        }
        let channels = if out_layout.is_empty() {
            data_channels
        } else {
            out_layout.len()
        };
        if channels != data_channels {
            debug!("PulseAudio: Requested channels changed from {data_channels} to {channels}");
        }

        if params.passthrough {
            warn!("PulseAudio: Does not support passthrough");
            return Err(SinkError::PassthroughUnsupported);
        }

        let format = SampleFormat::native_for_bits(params.bits_per_sample).ok_or_else(|| {
            SinkError::InvalidFormat(format!("{} bits per sample", params.bits_per_sample))
        })?;
        let spec = SampleSpec {
            format,
            rate: params.samples_per_sec,
            channels: u8::try_from(channels).unwrap_or(u8::MAX),
        };
        if !spec.is_valid() {
            error!("PulseAudio: Invalid sample spec");
            return Err(SinkError::InvalidFormat(spec.to_string()));
        }

        let channel_map = if out_layout.is_empty() {
            None
        } else {
            Some(ChannelMap::new(
                out_layout.iter().filter_map(|c| c.position()).collect(),
            )?)
        };

        let device = DeviceString::parse(&params.device);
        let request = PlaybackRequest {
            server: device.server,
            sink: device.sink,
            stream_name: self.settings.stream_name.clone(),
            spec,
            channel_map,
            flags: StreamFlags::INTERPOLATE_TIMING | StreamFlags::AUTO_TIMING_UPDATE,
        };
        let stream = self.server.open_playback(&request).inspect_err(|e| {
            error!("PulseAudio: Failed to open stream: {e}");
        })?;

        let mut playback = Playback {
            stream,
            data_channels,
            channels,
            bytes_per_sample,
            bytes_per_second: spec.bytes_per_second(),
            packet_size: channels * bytes_per_sample * DEFAULT_PACKET_FRAMES,
            buffer_size: 0,
            paused: false,
            recently_flushed: true,
            auto_resume: false,
            scratch: Vec::new(),
        };
        playback.negotiate_buffer(self.settings.prebuf_factor);
        Ok(playback)
    }
}

impl<S: SoundServer> AudioSink for DirectSoundSink<S> {
    fn initialize(&mut self, mut params: SinkParams) -> Result<()> {
        if self.playback.is_some() {
            self.deinitialize();
        }
        self.remap.reset();
        if let Some(callback) = params.callback.take() {
            self.callback = Some(callback);
        }

        let playback = self.open(&params)?;
        self.playback = Some(playback);

        self.apply_volume(self.current_volume);
        self.resume();

        if let Some(callback) = self.callback.as_mut() {
            callback.on_initialize(
                params.channels,
                params.samples_per_sec,
                params.bits_per_sample,
            );
        }
        Ok(())
    }

    fn deinitialize(&mut self) -> bool {
        if let Some(mut playback) = self.playback.take() {
            playback.drain();
            debug!("PulseAudio: Released stream");
        }
        true
    }

    fn pause(&mut self) -> bool {
        let Some(p) = self.playback.as_mut() else {
            return false;
        };
        if p.paused {
            return true;
        }
        p.paused = p.cork(true);
        p.paused
    }

    fn resume(&mut self) -> bool {
        let Some(p) = self.playback.as_mut() else {
            return false;
        };
        if p.paused && !p.recently_flushed {
            p.paused = p.cork(false);
            !p.paused
        } else if p.paused {
            // Nothing to play yet; uncork on the next write.
            p.auto_resume = true;
            true
        } else {
            false
        }
    }

    fn stop(&mut self) -> bool {
        if self.playback.is_none() {
            return false;
        }
        self.flush();
        true
    }

    fn flush(&mut self) {
        if self.playback.is_none() {
            return;
        }
        self.pause();
        if let Some(p) = self.playback.as_mut() {
            if let Err(e) = p.stream.flush() {
                error!("PulseAudio: {e}");
            }
            p.recently_flushed = true;
        }
    }

    fn add_packets(&mut self, data: &[u8]) -> usize {
        let Some(p) = self.playback.as_mut() else {
            return data.len();
        };

        let in_frame = p.data_channels * p.bytes_per_sample;
        let out_frame = p.channels * p.bytes_per_sample;
        if in_frame == 0 {
            return data.len();
        }
        let wanted = (data.len() / p.data_channels) * p.channels;
        let frames = wanted.min(p.writable()) / out_frame;
        if frames == 0 {
            return 0;
        }
        let consumed = &data[..frames * in_frame];

        let written = if self.remap.can_remap() {
            p.scratch.resize(frames * out_frame, 0);
            self.remap.remap(consumed, &mut p.scratch, frames);
            p.stream.write(&p.scratch)
        } else {
            p.stream.write(consumed)
        };
        if let Err(e) = written {
            error!("PulseAudio: Stream write failed: {e}");
        }

        p.recently_flushed = false;
        let auto_resume = p.auto_resume;

        if let Some(callback) = self.callback.as_mut() {
            callback.on_audio_data(consumed);
        }
        if auto_resume {
            let resumed = self.resume();
            if let Some(p) = self.playback.as_mut() {
                p.auto_resume = !resumed;
            }
        }
        consumed.len()
    }

    fn space(&self) -> usize {
        self.playback
            .as_ref()
            .map_or(0, |p| p.to_data_bytes(p.writable()))
    }

    fn delay(&self) -> f32 {
        let Some(p) = self.playback.as_ref() else {
            return 0.0;
        };
        let latency = loop {
            match p.stream.latency() {
                Err(pulse::Error::NoData) => {
                    if let Err(e) = p.stream.wait_timing_update() {
                        break Err(e);
                    }
                }
                result => break result,
            }
        };
        match latency {
            Ok(latency) => latency.as_secs_f32(),
            Err(e) => {
                error!("PulseAudio: Failed to get latency: {e}");
                0.0
            }
        }
    }

    fn cache_time(&self) -> f32 {
        let Some(p) = self.playback.as_ref() else {
            return 0.0;
        };
        if p.bytes_per_second == 0 {
            return 0.0;
        }
        p.buffer_size.saturating_sub(p.writable()) as f32 / p.bytes_per_second as f32
    }

    fn cache_total(&self) -> f32 {
        let Some(p) = self.playback.as_ref() else {
            return 0.0;
        };
        if p.bytes_per_second == 0 {
            return 0.0;
        }
        p.buffer_size as f32 / p.bytes_per_second as f32
    }

    fn chunk_len(&self) -> usize {
        self.playback
            .as_ref()
            .map_or(0, |p| p.to_data_bytes(p.packet_size))
    }

    fn current_volume(&self) -> i32 {
        self.current_volume
    }

    fn set_current_volume(&mut self, millibels: i32) -> bool {
        self.current_volume = millibels;
        self.apply_volume(millibels)
    }

    fn mute(&mut self, mute: bool) {
        if self.playback.is_none() {
            return;
        }
        if mute {
            self.apply_volume(VOLUME_MINIMUM);
        } else {
            self.apply_volume(self.current_volume);
        }
    }

    fn set_play_speed(&mut self, _speed: i32) -> i32 {
        0
    }

    fn register_callback(&mut self, callback: Box<dyn AudioCallback>) {
        self.callback = Some(callback);
    }

    fn unregister_callback(&mut self) {
        self.callback = None;
    }

    fn wait_completion(&mut self) {
        if let Some(p) = self.playback.as_mut() {
            p.drain();
        }
    }

    fn switch_channels(&mut self, _audio_stream: i32, _audio_on_all_speakers: bool) {}
}

impl<S: SoundServer> Drop for DirectSoundSink<S> {
    fn drop(&mut self) {
        self.deinitialize();
    }
}
