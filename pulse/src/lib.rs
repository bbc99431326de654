// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! # pulse - PulseAudio client bindings
//!
//! Safe Rust wrappers over the asynchronous PulseAudio client library,
//! loaded at runtime through [`pulse_sys`].
//!
//! ## Overview
//!
//! libpulse runs an event loop on its own thread. Clients create a
//! **context** (a connection to the server) on that loop, then **streams**
//! on the context. All calls happen with the loop locked, and blocking for a
//! state change means waiting on the loop until one of its callbacks signals.
//!
//! ```text
//! ┌──────────────────┐
//! │ ThreadedMainloop │  (event loop thread + lock)
//! └────────┬─────────┘
//!          │ lock() ─► MainloopGuard
//!          │
//!          └─► Context ──► Stream ──► Operation (cork/flush/drain/...)
//!                     └─► SinkInfo list
//! ```
//!
//! The [`Session`] type bundles a started mainloop with a ready context.
//!
//! ## Examples
//!
//! ### Playing a buffer of silence
//!
//! ```no_run
//! use pulse::{
//!     ChannelMap, ChannelVolumes, SampleFormat, SampleSpec, Session, Stream, StreamFlags,
//!     config::pulse_library_path, load_api,
//! };
//!
//! # fn main() -> Result<(), pulse::Error> {
//! let api = load_api(pulse_library_path())?;
//! let session = Session::connect(api, "example", None)?;
//!
//! let spec = SampleSpec { format: SampleFormat::S16NE, rate: 48000, channels: 2 };
//! let guard = session.lock();
//! let map = ChannelMap::default_for(session.api(), 2)?;
//! let volume = ChannelVolumes::reset(session.api(), 2)?;
//! let stream = Stream::new(&guard, session.context(), "silence", &spec, &map)?;
//! stream.connect_playback(&guard, None, StreamFlags::NONE, &volume)?;
//! stream.wait_ready(&guard)?;
//!
//! let silence = vec![0u8; stream.writable_size(&guard)?];
//! stream.write(&guard, &silence)?;
//! stream.drain(&guard)?.wait("drain")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Thread Safety
//!
//! - [`ThreadedMainloop`], [`Context`] and [`Session`] are `Send + Sync`
//! - [`Stream`] is `Send`; every call on it requires a [`MainloopGuard`]
//! - [`MainloopGuard`] is neither; the lock is released on the thread that took it

mod api;
mod channel_map;
mod context;
mod error;
mod introspect;
mod mainloop;
mod operation;
mod sample;
mod session;
mod state;
mod stream;
mod volume;

pub mod config;

pub use api::{PulseApi, PulseApiHandle, library_version, load_api, strerror};
pub use channel_map::{ChannelMap, ChannelPosition};
pub use context::Context;
pub use error::{Error, Result};
pub use introspect::SinkInfo;
pub use mainloop::{MainloopGuard, ThreadedMainloop};
pub use operation::Operation;
pub use sample::{SampleFormat, SampleSpec};
pub use session::Session;
pub use state::{ContextState, OperationState, StreamState};
pub use stream::{BufferAttr, Stream, StreamFlags};
pub use volume::{ChannelVolumes, Volume};
