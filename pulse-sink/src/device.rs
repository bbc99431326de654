// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Device strings of the form `[pulse:]<sink>@<server>`.

use std::fmt;

/// Device prefix used by the player's output selection.
pub const DEVICE_PREFIX: &str = "pulse:";

/// Placeholder meaning "let the library choose".
pub const DEFAULT_NAME: &str = "default";

/// A parsed output device.
///
/// `None` in either field means the library default: the server's default
/// sink, or the default server of the user session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceString {
    pub sink: Option<String>,
    pub server: Option<String>,
}

fn named(part: Option<&str>) -> Option<String> {
    part.filter(|p| !p.is_empty() && *p != DEFAULT_NAME)
        .map(str::to_string)
}

impl DeviceString {
    /// Parses a device string. Parsing never fails: unknown or missing parts
    /// fall back to the defaults.
    pub fn parse(device: &str) -> Self {
        let device = device.strip_prefix(DEVICE_PREFIX).unwrap_or(device);
        let mut parts = device.splitn(2, '@');
        Self {
            sink: named(parts.next()),
            server: named(parts.next()),
        }
    }

    /// Device string for a named sink on the default server.
    pub fn for_sink(sink: &str) -> Self {
        Self {
            sink: Some(sink.to_string()),
            server: None,
        }
    }

    /// Whether this device string parses back to itself. A sink named
    /// `default` cannot be told apart from the default sink.
    pub fn round_trips(&self) -> bool {
        Self::parse(&self.to_string()) == *self
    }
}

impl fmt::Display for DeviceString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DEVICE_PREFIX}{}@{}",
            self.sink.as_deref().unwrap_or(DEFAULT_NAME),
            self.server.as_deref().unwrap_or(DEFAULT_NAME)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parts_resolve_to_none() {
        assert_eq!(DeviceString::parse("pulse:default@default"), DeviceString::default());
        assert_eq!(DeviceString::parse(""), DeviceString::default());
        assert_eq!(DeviceString::parse("default"), DeviceString::default());
    }

    #[test]
    fn sink_and_server() {
        let device = DeviceString::parse("pulse:alsa_output.pci.analog-stereo@tcp:htpc");
        assert_eq!(device.sink.as_deref(), Some("alsa_output.pci.analog-stereo"));
        assert_eq!(device.server.as_deref(), Some("tcp:htpc"));
    }

    #[test]
    fn prefix_is_optional_and_server_may_be_missing() {
        let device = DeviceString::parse("hdmi");
        assert_eq!(device.sink.as_deref(), Some("hdmi"));
        assert_eq!(device.server, None);

        let device = DeviceString::parse("@unix:/run/pulse/native");
        assert_eq!(device.sink, None);
        assert_eq!(device.server.as_deref(), Some("unix:/run/pulse/native"));
    }

    #[test]
    fn names_are_kept_verbatim() {
        let device = DeviceString::parse("pulse: hdmi @default");
        assert_eq!(device.sink.as_deref(), Some(" hdmi "));
        assert_eq!(device.server, None);

        let device = DeviceString::for_sink(" spaced ");
        assert_eq!(device.sink.as_deref(), Some(" spaced "));
        assert!(device.round_trips());
    }

    #[test]
    fn sink_named_default_does_not_round_trip() {
        let device = DeviceString::for_sink(DEFAULT_NAME);
        assert_eq!(device.to_string(), "pulse:default@default");
        assert!(!device.round_trips());
        assert!(DeviceString::default().round_trips());
    }

    #[test]
    fn displays_as_enumerated_device() {
        assert_eq!(DeviceString::default().to_string(), "pulse:default@default");
        assert_eq!(DeviceString::for_sink("hdmi").to_string(), "pulse:hdmi@default");
    }
}
