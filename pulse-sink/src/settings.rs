// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! User-configurable settings of the playback backend.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Client name announced to the sound server.
pub const DEFAULT_CLIENT_NAME: &str = "pulse-sink";

/// Name of the playback stream as shown in mixers.
pub const DEFAULT_STREAM_NAME: &str = "audio stream";

/// Description of the "server default sink" enumeration entry.
pub const DEFAULT_SINK_LABEL: &str = "Default";

/// Requested prebuffer, in multiples of the server's minimum request size.
pub const DEFAULT_PREBUF_FACTOR: u32 = 10;

/// Settings read by [`crate::DirectSoundSink`].
///
/// Every field is optional in the JSON file; missing fields take the
/// defaults above.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub client_name: String,
    pub stream_name: String,
    pub default_sink_label: String,
    /// Initial volume in millibels (`-6000..=0`).
    pub volume_level: i32,
    pub prebuf_factor: u32,
    /// Overrides the libpulse location (see [`pulse::config::pulse_library_path`]).
    pub library_path: Option<PathBuf>,
}

impl Default for SinkSettings {
    fn default() -> Self {
        SinkSettings {
            client_name: DEFAULT_CLIENT_NAME.to_owned(),
            stream_name: DEFAULT_STREAM_NAME.to_owned(),
            default_sink_label: DEFAULT_SINK_LABEL.to_owned(),
            volume_level: 0,
            prebuf_factor: DEFAULT_PREBUF_FACTOR,
            library_path: None,
        }
    }
}

impl SinkSettings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SinkError::SettingsIo`] if the file cannot be read and
    /// [`crate::SinkError::SettingsJson`] if it is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let settings = serde_json::from_str(&text)?;
        tracing::debug!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Library path to load, honouring the override.
    pub fn library_path(&self) -> PathBuf {
        self.library_path
            .clone()
            .unwrap_or_else(pulse::config::pulse_library_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let settings: SinkSettings =
            serde_json::from_str(r#"{ "client_name": "htpc", "volume_level": -1500 }"#).unwrap();
        assert_eq!(settings.client_name, "htpc");
        assert_eq!(settings.volume_level, -1500);
        assert_eq!(settings.stream_name, DEFAULT_STREAM_NAME);
        assert_eq!(settings.prebuf_factor, 10);
        assert_eq!(settings.library_path, None);
    }

    #[test]
    fn library_override_wins() {
        let settings = SinkSettings {
            library_path: Some("/opt/lib/libpulse.so.0".into()),
            ..Default::default()
        };
        assert_eq!(settings.library_path(), PathBuf::from("/opt/lib/libpulse.so.0"));
    }

    #[test]
    fn unreadable_file_is_an_error() {
        let error = SinkSettings::from_json_file("/nonexistent/pulse-sink.json").unwrap_err();
        assert!(matches!(error, crate::SinkError::SettingsIo(_)));
    }
}
