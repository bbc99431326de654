// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Context, stream and operation states mirrored from the library.
//!
//! The library owns these state machines; the enums here only give the raw
//! values names so callers can match on them and log them.

use std::fmt;

/// State of a connection to the sound server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Unconnected,
    Connecting,
    Authorizing,
    SettingName,
    Ready,
    Failed,
    Terminated,
    /// A value this crate does not know about.
    Unknown(u32),
}

impl ContextState {
    /// Returns `true` unless the context has failed or terminated.
    pub fn is_good(self) -> bool {
        !matches!(self, ContextState::Failed | ContextState::Terminated)
    }
}

impl From<pulse_sys::ContextState> for ContextState {
    fn from(value: pulse_sys::ContextState) -> Self {
        match value {
            pulse_sys::PA_CONTEXT_UNCONNECTED => ContextState::Unconnected,
            pulse_sys::PA_CONTEXT_CONNECTING => ContextState::Connecting,
            pulse_sys::PA_CONTEXT_AUTHORIZING => ContextState::Authorizing,
            pulse_sys::PA_CONTEXT_SETTING_NAME => ContextState::SettingName,
            pulse_sys::PA_CONTEXT_READY => ContextState::Ready,
            pulse_sys::PA_CONTEXT_FAILED => ContextState::Failed,
            pulse_sys::PA_CONTEXT_TERMINATED => ContextState::Terminated,
            other => ContextState::Unknown(other),
        }
    }
}

impl fmt::Display for ContextState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContextState::Unconnected => "unconnected",
            ContextState::Connecting => "connecting",
            ContextState::Authorizing => "authorizing",
            ContextState::SettingName => "setting name",
            ContextState::Ready => "ready",
            ContextState::Failed => "failed",
            ContextState::Terminated => "terminated",
            ContextState::Unknown(_) => "none",
        })
    }
}

/// State of a playback stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unconnected,
    Creating,
    Ready,
    Failed,
    Terminated,
    /// A value this crate does not know about.
    Unknown(u32),
}

impl StreamState {
    /// Returns `true` unless the stream has failed or terminated.
    pub fn is_good(self) -> bool {
        !matches!(self, StreamState::Failed | StreamState::Terminated)
    }
}

impl From<pulse_sys::StreamState> for StreamState {
    fn from(value: pulse_sys::StreamState) -> Self {
        match value {
            pulse_sys::PA_STREAM_UNCONNECTED => StreamState::Unconnected,
            pulse_sys::PA_STREAM_CREATING => StreamState::Creating,
            pulse_sys::PA_STREAM_READY => StreamState::Ready,
            pulse_sys::PA_STREAM_FAILED => StreamState::Failed,
            pulse_sys::PA_STREAM_TERMINATED => StreamState::Terminated,
            other => StreamState::Unknown(other),
        }
    }
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamState::Unconnected => "unconnected",
            StreamState::Creating => "creating",
            StreamState::Ready => "ready",
            StreamState::Failed => "failed",
            StreamState::Terminated => "terminated",
            StreamState::Unknown(_) => "none",
        })
    }
}

/// State of an asynchronous operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Running,
    Done,
    Cancelled,
    Unknown(u32),
}

impl From<pulse_sys::OperationState> for OperationState {
    fn from(value: pulse_sys::OperationState) -> Self {
        match value {
            pulse_sys::PA_OPERATION_RUNNING => OperationState::Running,
            pulse_sys::PA_OPERATION_DONE => OperationState::Done,
            pulse_sys::PA_OPERATION_CANCELLED => OperationState::Cancelled,
            other => OperationState::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_states_display_like_the_server_log() {
        assert_eq!(
            ContextState::from(pulse_sys::PA_CONTEXT_SETTING_NAME).to_string(),
            "setting name"
        );
        assert_eq!(ContextState::from(42).to_string(), "none");
    }

    #[test]
    fn failed_and_terminated_are_not_good() {
        assert!(ContextState::Connecting.is_good());
        assert!(!ContextState::Failed.is_good());
        assert!(!ContextState::Terminated.is_good());
        assert!(StreamState::Creating.is_good());
        assert!(!StreamState::from(pulse_sys::PA_STREAM_FAILED).is_good());
    }

    #[test]
    fn operation_state_roundtrip() {
        assert_eq!(
            OperationState::from(pulse_sys::PA_OPERATION_DONE),
            OperationState::Done
        );
        assert_eq!(OperationState::from(7), OperationState::Unknown(7));
    }
}
