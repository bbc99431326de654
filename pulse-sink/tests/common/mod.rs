// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! In-memory sound server shared by the integration tests.

#![allow(dead_code)]

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use pulse::{BufferAttr, SinkInfo};
use pulse_sink::{PlaybackRequest, PlaybackStream, SoundServer, StreamVolume};

/// Everything the mock server saw, plus knobs to make it misbehave.
#[derive(Debug)]
pub struct MockState {
    pub requests: Vec<PlaybackRequest>,
    pub attr: BufferAttr,
    pub attr_requests: Vec<BufferAttr>,
    pub writable: usize,
    pub written: Vec<u8>,
    pub corked: bool,
    pub cork_calls: Vec<bool>,
    pub flushes: usize,
    pub drains: usize,
    pub volumes: Vec<StreamVolume>,
    pub latency: Duration,
    /// Latency queries answered with `NoData` before timing info "arrives".
    pub latency_no_data: usize,
    pub timing_waits: usize,
    /// The stream died; waiting for timing updates fails.
    pub stream_dead: bool,
    pub sinks: Vec<SinkInfo>,
    pub fail_attr: bool,
    pub fail_cork: bool,
    pub fail_latency: bool,
    pub offline: bool,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            attr: BufferAttr {
                maxlength: 4 * 65536,
                tlength: 16384,
                prebuf: 14336,
                minreq: 2048,
                fragsize: u32::MAX,
            },
            attr_requests: Vec::new(),
            writable: 8192,
            written: Vec::new(),
            corked: false,
            cork_calls: Vec::new(),
            flushes: 0,
            drains: 0,
            volumes: Vec::new(),
            latency: Duration::from_millis(50),
            latency_no_data: 0,
            timing_waits: 0,
            stream_dead: false,
            sinks: Vec::new(),
            fail_attr: false,
            fail_cork: false,
            fail_latency: false,
            offline: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockServer {
    pub state: Arc<Mutex<MockState>>,
}

impl MockServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

pub struct MockPlayback {
    state: Arc<Mutex<MockState>>,
}

impl MockPlayback {
    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }
}

impl SoundServer for MockServer {
    type Playback = MockPlayback;

    fn open_playback(&self, request: &PlaybackRequest) -> pulse::Result<MockPlayback> {
        let mut state = self.state();
        if state.offline {
            return Err(pulse::Error::ConnectionRefused);
        }
        state.requests.push(request.clone());
        state.corked = request.flags.contains(pulse::StreamFlags::START_CORKED);
        Ok(MockPlayback {
            state: self.state.clone(),
        })
    }

    fn list_sinks(&self) -> pulse::Result<Vec<SinkInfo>> {
        let state = self.state();
        if state.offline {
            return Err(pulse::Error::ConnectionRefused);
        }
        Ok(state.sinks.clone())
    }
}

impl PlaybackStream for MockPlayback {
    fn buffer_attr(&self) -> pulse::Result<BufferAttr> {
        let state = self.state();
        if state.fail_attr {
            return Err(pulse::Error::BadState);
        }
        Ok(state.attr)
    }

    fn set_buffer_attr(&mut self, attr: &BufferAttr) -> pulse::Result<()> {
        let mut state = self.state();
        state.attr_requests.push(*attr);
        state.attr = *attr;
        Ok(())
    }

    fn writable_size(&self) -> pulse::Result<usize> {
        Ok(self.state().writable)
    }

    fn write(&mut self, data: &[u8]) -> pulse::Result<()> {
        let mut state = self.state();
        assert!(
            data.len() <= state.writable,
            "wrote {} bytes with {} writable",
            data.len(),
            state.writable
        );
        state.writable -= data.len();
        state.written.extend_from_slice(data);
        Ok(())
    }

    fn cork(&mut self, cork: bool) -> pulse::Result<()> {
        let mut state = self.state();
        if state.fail_cork {
            return Err(pulse::Error::OperationFailed(
                if cork { "Pause" } else { "Resume" }.to_string(),
            ));
        }
        state.cork_calls.push(cork);
        state.corked = cork;
        Ok(())
    }

    fn flush(&mut self) -> pulse::Result<()> {
        self.state().flushes += 1;
        Ok(())
    }

    fn drain(&mut self) -> pulse::Result<()> {
        let mut state = self.state();
        // The server never acknowledges draining a corked stream.
        assert!(!state.corked, "drain on a corked stream would block forever");
        state.drains += 1;
        Ok(())
    }

    fn latency(&self) -> pulse::Result<Duration> {
        let state = self.state();
        if state.fail_latency {
            return Err(pulse::Error::Timeout);
        }
        if state.latency_no_data > 0 {
            return Err(pulse::Error::NoData);
        }
        Ok(state.latency)
    }

    fn wait_timing_update(&self) -> pulse::Result<()> {
        let mut state = self.state();
        if state.stream_dead {
            return Err(pulse::Error::BadState);
        }
        state.timing_waits += 1;
        state.latency_no_data = state.latency_no_data.saturating_sub(1);
        Ok(())
    }

    fn set_volume(&mut self, volume: StreamVolume) -> pulse::Result<()> {
        self.state().volumes.push(volume);
        Ok(())
    }
}
