// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Software volume values and per-channel volumes.
//!
//! Conversions go through the loaded library so volumes follow its curve.

use std::os::raw::c_uint;

use crate::{Error, Result, api::PulseApi};

/// A software volume, where [`Volume::NORM`] is 100% and [`Volume::MUTED`] is silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume(pub u32);

impl Volume {
    pub const NORM: Volume = Volume(pulse_sys::PA_VOLUME_NORM);
    pub const MUTED: Volume = Volume(pulse_sys::PA_VOLUME_MUTED);
    pub const MAX: Volume = Volume(pulse_sys::PA_VOLUME_MAX);

    /// Converts decibels with `pa_sw_volume_from_dB`; -200 dB and below is muted.
    pub fn from_db(api: &PulseApi, db: f64) -> Volume {
        if db.is_nan() {
            return Volume::MUTED;
        }
        Volume(unsafe { api.sw_volume_from_db(db) })
    }

    pub fn is_muted(self) -> bool {
        self == Volume::MUTED
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume::NORM
    }
}

/// Volume for every channel of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelVolumes(pulse_sys::CVolume);

impl ChannelVolumes {
    /// Every channel at [`Volume::NORM`].
    pub fn reset(api: &PulseApi, channels: u8) -> Result<Self> {
        Self::set(api, channels, Volume::NORM)
    }

    /// Every channel at [`Volume::MUTED`].
    pub fn mute(api: &PulseApi, channels: u8) -> Result<Self> {
        Self::set(api, channels, Volume::MUTED)
    }

    /// Every channel at `volume`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArg`] for zero or more than `PA_CHANNELS_MAX`
    /// channels.
    pub fn set(api: &PulseApi, channels: u8, volume: Volume) -> Result<Self> {
        if channels == 0 || channels as usize > pulse_sys::PA_CHANNELS_MAX {
            return Err(Error::InvalidArg);
        }
        let mut raw = pulse_sys::CVolume::default();
        let set = unsafe { api.cvolume_set(&mut raw, c_uint::from(channels), volume.0) };
        if set.is_null() {
            return Err(Error::InvalidArg);
        }
        Ok(Self(raw))
    }

    pub fn channels(&self) -> u8 {
        self.0.channels
    }

    pub fn values(&self) -> impl Iterator<Item = Volume> + '_ {
        self.0.values[..self.0.channels as usize]
            .iter()
            .map(|v| Volume(*v))
    }

    pub fn is_muted(&self) -> bool {
        self.values().all(Volume::is_muted)
    }

    pub(crate) fn as_raw(&self) -> &pulse_sys::CVolume {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_volume_is_norm() {
        assert_eq!(Volume::default(), Volume::NORM);
        assert!(Volume::MUTED.is_muted());
        assert!(Volume::NORM < Volume::MAX);
    }

    #[test]
    fn empty_channel_volumes_have_no_values() {
        let volumes = ChannelVolumes::default();
        assert_eq!(volumes.channels(), 0);
        assert_eq!(volumes.values().count(), 0);
    }
}
