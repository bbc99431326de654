// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Error types for PulseAudio operations.
//!
//! This module maps libpulse error codes to an idiomatic Rust error enum and
//! adds variants for failures that only exist on the Rust side (loading the
//! shared library, string conversion, failed state transitions).

use std::os::raw::c_int;

/// Convenience result type using [`Error`] as the error variant.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur when using the PulseAudio client library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An unknown or unrecognized libpulse error code.
    #[error("Unknown error: {0}")]
    Unknown(c_int),

    /// Access failure (permissions, cookie).
    #[error("Access denied")]
    Access,

    /// The server rejected a command.
    #[error("Unknown command")]
    Command,

    /// An argument passed to a libpulse function was invalid.
    #[error("Invalid argument")]
    InvalidArg,

    /// The requested sink, stream or server does not exist.
    #[error("No such entity")]
    NoEntity,

    /// The sound server refused the connection.
    #[error("Connection refused")]
    ConnectionRefused,

    /// Protocol error between client and server.
    #[error("Protocol error")]
    Protocol,

    /// A request to the server timed out.
    #[error("Timeout")]
    Timeout,

    /// The connection to the server was terminated.
    #[error("Connection terminated")]
    ConnectionTerminated,

    /// The object is in the wrong state for the requested call.
    #[error("Bad state")]
    BadState,

    /// No data is available yet (e.g. latency before the first timing update).
    #[error("No data")]
    NoData,

    /// The requested operation is not supported by the server.
    #[error("Not supported")]
    NotSupported,

    /// The context reached the failed or terminated state.
    #[error("Context failed: {0}")]
    ContextFailed(String),

    /// The stream reached the failed or terminated state.
    #[error("Stream failed: {0}")]
    StreamFailed(String),

    /// An asynchronous operation finished in a state other than done.
    #[error("{0} operation failed")]
    OperationFailed(String),

    /// The sample specification is not accepted by the library.
    #[error("Invalid sample spec: {0}")]
    InvalidSampleSpec(String),

    /// A generic error for Rust-level failures not directly mapped to libpulse errors.
    #[error("Other error: {0}")]
    Other(String),

    /// Failed to convert a Rust string to a C-compatible null-terminated string.
    #[error("Null string: {0}")]
    NulString(#[from] std::ffi::NulError),

    /// Failed to load or resolve symbols from the libpulse shared library.
    #[error("Loading library: {0}")]
    LibLoading(#[from] libloading::Error),
}

impl Error {
    /// Converts a libpulse error code to a Rust [`Result`].
    ///
    /// Accepts both the negative values returned by calls such as
    /// `pa_stream_write` and the positive values of `pa_context_errno`.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if `code == PA_OK`
    /// - `Err(Error::...)` for any error code
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let ret = unsafe { api.stream_write(...) };
    /// Error::from_code(ret)?; // Propagate error if ret != 0
    /// ```
    pub fn from_code(code: c_int) -> Result<()> {
        match code.saturating_abs() {
            pulse_sys::PA_OK => Ok(()),
            pulse_sys::PA_ERR_ACCESS | pulse_sys::PA_ERR_AUTHKEY => Err(Error::Access),
            pulse_sys::PA_ERR_COMMAND => Err(Error::Command),
            pulse_sys::PA_ERR_INVALID => Err(Error::InvalidArg),
            pulse_sys::PA_ERR_NOENTITY => Err(Error::NoEntity),
            pulse_sys::PA_ERR_CONNECTIONREFUSED | pulse_sys::PA_ERR_INVALIDSERVER => {
                Err(Error::ConnectionRefused)
            }
            pulse_sys::PA_ERR_PROTOCOL | pulse_sys::PA_ERR_VERSION => Err(Error::Protocol),
            pulse_sys::PA_ERR_TIMEOUT => Err(Error::Timeout),
            pulse_sys::PA_ERR_CONNECTIONTERMINATED | pulse_sys::PA_ERR_KILLED => {
                Err(Error::ConnectionTerminated)
            }
            pulse_sys::PA_ERR_BADSTATE => Err(Error::BadState),
            pulse_sys::PA_ERR_NODATA => Err(Error::NoData),
            pulse_sys::PA_ERR_NOTSUPPORTED | pulse_sys::PA_ERR_NOTIMPLEMENTED => {
                Err(Error::NotSupported)
            }
            other => Err(Error::Unknown(other)),
        }
    }

    /// Like [`Error::from_code`] but always yields an error, falling back to
    /// `fallback` when the code reports success.
    ///
    /// Used after calls that signal failure through a null pointer, where the
    /// context error number may not have been set.
    pub(crate) fn from_code_or(code: c_int, fallback: impl FnOnce() -> Error) -> Error {
        match Error::from_code(code) {
            Ok(()) => fallback(),
            Err(error) => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_code_is_success() {
        assert!(Error::from_code(pulse_sys::PA_OK).is_ok());
    }

    #[test]
    fn negative_return_values_map_like_errno() {
        assert!(matches!(
            Error::from_code(-pulse_sys::PA_ERR_NODATA),
            Err(Error::NoData)
        ));
        assert!(matches!(
            Error::from_code(pulse_sys::PA_ERR_NODATA),
            Err(Error::NoData)
        ));
        assert!(matches!(
            Error::from_code(-pulse_sys::PA_ERR_CONNECTIONREFUSED),
            Err(Error::ConnectionRefused)
        ));
    }

    #[test]
    fn unmapped_codes_are_kept() {
        assert!(matches!(
            Error::from_code(pulse_sys::PA_ERR_BUSY),
            Err(Error::Unknown(pulse_sys::PA_ERR_BUSY))
        ));
    }

    #[test]
    fn fallback_only_applies_on_success_code() {
        let error = Error::from_code_or(pulse_sys::PA_OK, || Error::Other("stream".into()));
        assert!(matches!(error, Error::Other(_)));
        let error = Error::from_code_or(pulse_sys::PA_ERR_TIMEOUT, || Error::Other("x".into()));
        assert!(matches!(error, Error::Timeout));
    }
}
