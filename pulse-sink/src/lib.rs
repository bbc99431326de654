// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! # pulse-sink - PulseAudio direct-sound playback backend
//!
//! Plays a media player's PCM output through a PulseAudio server.
//!
//! ## Overview
//!
//! - [`AudioSink`] is the contract the player drives: initialize for a format,
//!   push packets while there is space, pause, flush, query delay and volume.
//! - [`DirectSoundSink`] implements it on top of a [`SoundServer`], which
//!   opens playback streams and lists sinks.
//! - [`PulseServer`] is the [`SoundServer`] backed by libpulse.
//!
//! ```text
//! player ──► AudioSink (DirectSoundSink)
//!                 │  remap, volume, pause/flush state
//!                 ▼
//!            SoundServer ──► PlaybackStream   (PulseServer / PulsePlayback)
//!                 │
//!                 ▼
//!            pulse::Session ──► pulse::Stream
//! ```
//!
//! ## Devices
//!
//! Devices are written `pulse:<sink>@<server>`; `default` in either part
//! selects the library default. [`DirectSoundSink::enumerate_sinks`] lists
//! the default device first, then one entry per server sink.
//!
//! ## Examples
//!
//! ```no_run
//! use pulse_sink::{DirectSoundSink, PulseServer, SinkSettings};
//!
//! # fn main() -> Result<(), pulse_sink::SinkError> {
//! let settings = SinkSettings::default();
//! let sink = DirectSoundSink::new(PulseServer::from_settings(&settings)?, settings);
//! for entry in sink.enumerate_sinks(false) {
//!     println!("{} -> {}", entry.description, entry.device);
//! }
//! # Ok(())
//! # }
//! ```

mod audio_sink;
mod backend;
mod device;
mod direct_sound;
mod error;
mod pulse_backend;
mod settings;

pub mod remap;

pub use audio_sink::{
    AudioCallback, AudioSink, AudioSinkEntry, SinkParams, VOLUME_MAXIMUM, VOLUME_MINIMUM,
};
pub use backend::{PlaybackRequest, PlaybackStream, SoundServer, StreamVolume};
pub use device::DeviceString;
pub use direct_sound::{DirectSoundSink, enumerate_sinks, millibels_to_volume};
pub use error::{Result, SinkError};
pub use pulse_backend::{PulsePlayback, PulseServer};
pub use settings::SinkSettings;
