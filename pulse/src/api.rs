// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Loading of the libpulse shared library.

use std::{
    ffi::{CStr, OsStr},
    os::raw::c_int,
    sync::Arc,
};

use crate::Result;

/// Function table of the loaded libpulse library.
pub type PulseApi = pulse_sys::LibPulse;

/// Shared handle to the loaded library.
///
/// Every mainloop, context and stream keeps a clone so the library stays
/// mapped for as long as any object created from it is alive.
pub type PulseApiHandle = Arc<PulseApi>;

/// Loads libpulse from `path` and resolves all required symbols.
///
/// # Errors
///
/// Returns [`crate::Error::LibLoading`] if the library cannot be opened or a
/// symbol is missing.
///
/// # Examples
///
/// ```no_run
/// use pulse::{config::pulse_library_path, load_api};
///
/// # fn main() -> Result<(), pulse::Error> {
/// let api = load_api(pulse_library_path())?;
/// println!("libpulse {}", pulse::library_version(&api));
/// # Ok(())
/// # }
/// ```
pub fn load_api(path: impl AsRef<OsStr>) -> Result<PulseApiHandle> {
    let path = path.as_ref();
    let api = unsafe { PulseApi::new(path)? };
    tracing::debug!(
        "Loaded {} (libpulse {})",
        path.to_string_lossy(),
        library_version(&api)
    );
    Ok(Arc::new(api))
}

/// Returns the version string reported by the loaded library.
pub fn library_version(api: &PulseApi) -> String {
    let version = unsafe { api.get_library_version() };
    if version.is_null() {
        return "unknown".to_string();
    }
    unsafe { CStr::from_ptr(version) }
        .to_string_lossy()
        .into_owned()
}

/// Returns the library's human readable message for an error code.
pub fn strerror(api: &PulseApi, code: c_int) -> String {
    let message = unsafe { api.strerror(code.saturating_abs()) };
    if message.is_null() {
        return format!("error {code}");
    }
    unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned()
}
