// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Sample formats and sample specifications.

use std::fmt;

/// PCM sample encoding understood by the sound server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    U8,
    ALaw,
    ULaw,
    S16Le,
    S16Be,
    F32Le,
    F32Be,
    S32Le,
    S32Be,
    S24Le,
    S24Be,
    S24_32Le,
    S24_32Be,
}

impl SampleFormat {
    /// Native-endian signed 16 bit.
    pub const S16NE: SampleFormat = if cfg!(target_endian = "little") {
        SampleFormat::S16Le
    } else {
        SampleFormat::S16Be
    };

    /// Native-endian packed signed 24 bit.
    pub const S24NE: SampleFormat = if cfg!(target_endian = "little") {
        SampleFormat::S24Le
    } else {
        SampleFormat::S24Be
    };

    /// Native-endian signed 32 bit.
    pub const S32NE: SampleFormat = if cfg!(target_endian = "little") {
        SampleFormat::S32Le
    } else {
        SampleFormat::S32Be
    };

    /// Picks the native-endian integer format for a sample width in bits.
    ///
    /// Returns `None` for widths the backend does not open streams with.
    pub fn native_for_bits(bits: u32) -> Option<SampleFormat> {
        match bits {
            8 => Some(SampleFormat::U8),
            16 => Some(SampleFormat::S16NE),
            24 => Some(SampleFormat::S24NE),
            32 => Some(SampleFormat::S32NE),
            _ => None,
        }
    }

    /// Size of a single sample in bytes.
    pub fn sample_size(self) -> usize {
        match self {
            SampleFormat::U8 | SampleFormat::ALaw | SampleFormat::ULaw => 1,
            SampleFormat::S16Le | SampleFormat::S16Be => 2,
            SampleFormat::S24Le | SampleFormat::S24Be => 3,
            SampleFormat::F32Le
            | SampleFormat::F32Be
            | SampleFormat::S32Le
            | SampleFormat::S32Be
            | SampleFormat::S24_32Le
            | SampleFormat::S24_32Be => 4,
        }
    }

    pub(crate) fn to_raw(self) -> pulse_sys::SampleFormat {
        match self {
            SampleFormat::U8 => pulse_sys::PA_SAMPLE_U8,
            SampleFormat::ALaw => pulse_sys::PA_SAMPLE_ALAW,
            SampleFormat::ULaw => pulse_sys::PA_SAMPLE_ULAW,
            SampleFormat::S16Le => pulse_sys::PA_SAMPLE_S16LE,
            SampleFormat::S16Be => pulse_sys::PA_SAMPLE_S16BE,
            SampleFormat::F32Le => pulse_sys::PA_SAMPLE_FLOAT32LE,
            SampleFormat::F32Be => pulse_sys::PA_SAMPLE_FLOAT32BE,
            SampleFormat::S32Le => pulse_sys::PA_SAMPLE_S32LE,
            SampleFormat::S32Be => pulse_sys::PA_SAMPLE_S32BE,
            SampleFormat::S24Le => pulse_sys::PA_SAMPLE_S24LE,
            SampleFormat::S24Be => pulse_sys::PA_SAMPLE_S24BE,
            SampleFormat::S24_32Le => pulse_sys::PA_SAMPLE_S24_32LE,
            SampleFormat::S24_32Be => pulse_sys::PA_SAMPLE_S24_32BE,
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SampleFormat::U8 => "u8",
            SampleFormat::ALaw => "aLaw",
            SampleFormat::ULaw => "uLaw",
            SampleFormat::S16Le => "s16le",
            SampleFormat::S16Be => "s16be",
            SampleFormat::F32Le => "float32le",
            SampleFormat::F32Be => "float32be",
            SampleFormat::S32Le => "s32le",
            SampleFormat::S32Be => "s32be",
            SampleFormat::S24Le => "s24le",
            SampleFormat::S24Be => "s24be",
            SampleFormat::S24_32Le => "s24-32le",
            SampleFormat::S24_32Be => "s24-32be",
        })
    }
}

/// Format, rate and channel count of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSpec {
    pub format: SampleFormat,
    pub rate: u32,
    pub channels: u8,
}

impl SampleSpec {
    /// Checks the spec against the library's limits.
    pub fn is_valid(&self) -> bool {
        self.rate > 0
            && self.rate <= pulse_sys::PA_RATE_MAX
            && self.channels > 0
            && self.channels as usize <= pulse_sys::PA_CHANNELS_MAX
    }

    /// Bytes per frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.format.sample_size() * self.channels as usize
    }

    pub fn bytes_per_second(&self) -> usize {
        self.frame_size() * self.rate as usize
    }

    pub(crate) fn to_raw(self) -> pulse_sys::SampleSpec {
        pulse_sys::SampleSpec {
            format: self.format.to_raw(),
            rate: self.rate,
            channels: self.channels,
        }
    }
}

impl fmt::Display for SampleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}ch {}Hz", self.format, self.channels, self.rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_quality_sizes() {
        let spec = SampleSpec {
            format: SampleFormat::S16NE,
            rate: 44100,
            channels: 2,
        };
        assert!(spec.is_valid());
        assert_eq!(spec.frame_size(), 4);
        assert_eq!(spec.bytes_per_second(), 176_400);
    }

    #[test]
    fn limits_are_enforced() {
        let mut spec = SampleSpec {
            format: SampleFormat::S16NE,
            rate: 48000,
            channels: 0,
        };
        assert!(!spec.is_valid());
        spec.channels = 33;
        assert!(!spec.is_valid());
        spec.channels = 8;
        spec.rate = 0;
        assert!(!spec.is_valid());
        spec.rate = pulse_sys::PA_RATE_MAX + 1;
        assert!(!spec.is_valid());
    }

    #[test]
    fn bit_widths_pick_native_formats() {
        assert_eq!(SampleFormat::native_for_bits(16), Some(SampleFormat::S16NE));
        assert_eq!(SampleFormat::native_for_bits(24).map(|f| f.sample_size()), Some(3));
        assert_eq!(SampleFormat::native_for_bits(12), None);
    }
}
