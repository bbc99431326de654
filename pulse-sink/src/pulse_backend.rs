// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! [`SoundServer`] implementation on libpulse.

use std::time::Duration;

use pulse::{
    BufferAttr, ChannelMap, ChannelVolumes, PulseApiHandle, Session, SinkInfo, Stream, Volume,
    load_api,
};

use crate::{
    SinkSettings,
    backend::{PlaybackRequest, PlaybackStream, SoundServer, StreamVolume},
};

/// A PulseAudio server reached through the loaded client library.
///
/// Each playback stream gets a session (mainloop and context) of its own, so
/// streams can be opened on different servers.
#[derive(Clone)]
pub struct PulseServer {
    api: PulseApiHandle,
    client_name: String,
}

impl PulseServer {
    pub fn new(api: PulseApiHandle, client_name: impl Into<String>) -> Self {
        Self {
            api,
            client_name: client_name.into(),
        }
    }

    /// Loads libpulse as configured by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`pulse::Error::LibLoading`] if the library cannot be loaded.
    pub fn from_settings(settings: &SinkSettings) -> pulse::Result<Self> {
        let api = load_api(settings.library_path())?;
        Ok(Self::new(api, settings.client_name.clone()))
    }
}

impl SoundServer for PulseServer {
    type Playback = PulsePlayback;

    fn open_playback(&self, request: &PlaybackRequest) -> pulse::Result<PulsePlayback> {
        let session = Session::connect(
            self.api.clone(),
            &self.client_name,
            request.server.as_deref(),
        )?;
        let channels = request.spec.channels;
        let channel_map = match &request.channel_map {
            Some(map) => map.clone(),
            None => ChannelMap::default_for(&self.api, channels)?,
        };
        let volume = ChannelVolumes::reset(&self.api, channels)?;
        let stream = {
            let guard = session.lock();
            let stream = Stream::new(
                &guard,
                session.context(),
                &request.stream_name,
                &request.spec,
                &channel_map,
            )?;
            stream.connect_playback(&guard, request.sink.as_deref(), request.flags, &volume)?;
            stream.wait_ready(&guard)?;
            stream
        };
        tracing::debug!(
            "Opened {} on {}",
            request.spec,
            request.sink.as_deref().unwrap_or("default sink")
        );
        Ok(PulsePlayback {
            stream,
            session,
            channels,
        })
    }

    fn list_sinks(&self) -> pulse::Result<Vec<SinkInfo>> {
        Session::connect(self.api.clone(), &self.client_name, None)?.sinks()
    }
}

/// A ready libpulse playback stream together with its session.
pub struct PulsePlayback {
    // Dropped before the session it runs on.
    stream: Stream,
    session: Session,
    channels: u8,
}

impl PlaybackStream for PulsePlayback {
    fn buffer_attr(&self) -> pulse::Result<BufferAttr> {
        let guard = self.session.lock();
        self.stream.buffer_attr(&guard)
    }

    fn set_buffer_attr(&mut self, attr: &BufferAttr) -> pulse::Result<()> {
        let guard = self.session.lock();
        self.stream.set_buffer_attr(&guard, attr)?.wait("SetBuffer")
    }

    fn writable_size(&self) -> pulse::Result<usize> {
        let guard = self.session.lock();
        self.stream.writable_size(&guard)
    }

    fn write(&mut self, data: &[u8]) -> pulse::Result<()> {
        let guard = self.session.lock();
        self.stream.write(&guard, data)
    }

    fn cork(&mut self, cork: bool) -> pulse::Result<()> {
        let guard = self.session.lock();
        let label = if cork { "Pause" } else { "Resume" };
        self.stream.cork(&guard, cork)?.wait(label)
    }

    fn flush(&mut self) -> pulse::Result<()> {
        let guard = self.session.lock();
        self.stream.flush(&guard)?.wait("Flush")
    }

    fn drain(&mut self) -> pulse::Result<()> {
        let guard = self.session.lock();
        self.stream.drain(&guard)?.wait("Drain")
    }

    fn latency(&self) -> pulse::Result<Duration> {
        let guard = self.session.lock();
        self.stream.latency(&guard)
    }

    fn wait_timing_update(&self) -> pulse::Result<()> {
        let guard = self.session.lock();
        if !self.stream.state(&guard).is_good() {
            return Err(pulse::Error::BadState);
        }
        // Auto timing updates keep arriving, so an update that landed before
        // the lock was retaken only delays this wake-up by one interval.
        guard.wait();
        Ok(())
    }

    fn set_volume(&mut self, volume: StreamVolume) -> pulse::Result<()> {
        let api = self.session.api();
        let guard = self.session.lock();
        let volumes = match volume {
            StreamVolume::Muted => ChannelVolumes::mute(api, self.channels)?,
            StreamVolume::Decibels(db) => {
                ChannelVolumes::set(api, self.channels, Volume::from_db(api, db))?
            }
        };
        let index = self.stream.index(&guard);
        self.session
            .context()
            .set_sink_input_volume(&guard, index, &volumes)
    }
}
