// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Errors reported by the playback backend.

/// Convenience result type using [`SinkError`] as the error variant.
pub type Result<T> = core::result::Result<T, SinkError>;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Compressed passthrough output is not supported by this backend.
    #[error("Passthrough is not supported")]
    PassthroughUnsupported,

    /// The requested channel count, rate or sample width cannot be played.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The stream accepted no data for this long.
    #[error("Output stalled for {0:?}")]
    Stalled(std::time::Duration),

    #[error("Sound server: {0}")]
    Pulse(#[from] pulse::Error),

    #[error("Reading settings: {0}")]
    SettingsIo(#[from] std::io::Error),

    #[error("Parsing settings: {0}")]
    SettingsJson(#[from] serde_json::Error),
}
