// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Runtime location of the libpulse shared library.

use std::path::PathBuf;

/// Environment variable overriding the library location.
pub const PULSE_LIBRARY_ENV: &str = "PULSE_LIBRARY_PATH";

/// Soname of the PulseAudio client library.
pub const DEFAULT_PULSE_LIBRARY: &str = "libpulse.so.0";

/// Returns the path to the libpulse shared library.
///
/// Uses `PULSE_LIBRARY_PATH` when set and non-empty, otherwise the soname so
/// the dynamic loader searches its default paths.
///
/// # Examples
///
/// ```no_run
/// use pulse::{config::pulse_library_path, load_api};
///
/// # fn main() -> Result<(), pulse::Error> {
/// let api = load_api(pulse_library_path())?;
/// # Ok(())
/// # }
/// ```
pub fn pulse_library_path() -> PathBuf {
    library_path_from(std::env::var_os(PULSE_LIBRARY_ENV))
}

fn library_path_from(value: Option<std::ffi::OsString>) -> PathBuf {
    match value {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => PathBuf::from(DEFAULT_PULSE_LIBRARY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_soname() {
        assert_eq!(library_path_from(None), PathBuf::from("libpulse.so.0"));
        assert_eq!(
            library_path_from(Some("".into())),
            PathBuf::from("libpulse.so.0")
        );
    }

    #[test]
    fn override_is_used_verbatim() {
        assert_eq!(
            library_path_from(Some("/opt/pulse/lib/libpulse.so.0".into())),
            PathBuf::from("/opt/pulse/lib/libpulse.so.0")
        );
    }
}
