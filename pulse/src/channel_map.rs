// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Channel positions and channel maps.

use std::os::raw::c_uint;

use crate::{Error, Result, api::PulseApi};

/// Speaker position of one stream channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelPosition {
    Mono,
    FrontLeft,
    FrontRight,
    FrontCenter,
    RearCenter,
    RearLeft,
    RearRight,
    Lfe,
    FrontLeftOfCenter,
    FrontRightOfCenter,
    SideLeft,
    SideRight,
    /// Auxiliary channel `0..=31`.
    Aux(u8),
    TopCenter,
    TopFrontLeft,
    TopFrontRight,
    TopFrontCenter,
    TopRearLeft,
    TopRearRight,
    TopRearCenter,
}

impl ChannelPosition {
    pub(crate) fn to_raw(self) -> pulse_sys::ChannelPosition {
        use ChannelPosition::*;
        match self {
            Mono => pulse_sys::PA_CHANNEL_POSITION_MONO,
            FrontLeft => pulse_sys::PA_CHANNEL_POSITION_FRONT_LEFT,
            FrontRight => pulse_sys::PA_CHANNEL_POSITION_FRONT_RIGHT,
            FrontCenter => pulse_sys::PA_CHANNEL_POSITION_FRONT_CENTER,
            RearCenter => pulse_sys::PA_CHANNEL_POSITION_REAR_CENTER,
            RearLeft => pulse_sys::PA_CHANNEL_POSITION_REAR_LEFT,
            RearRight => pulse_sys::PA_CHANNEL_POSITION_REAR_RIGHT,
            Lfe => pulse_sys::PA_CHANNEL_POSITION_LFE,
            FrontLeftOfCenter => pulse_sys::PA_CHANNEL_POSITION_FRONT_LEFT_OF_CENTER,
            FrontRightOfCenter => pulse_sys::PA_CHANNEL_POSITION_FRONT_RIGHT_OF_CENTER,
            SideLeft => pulse_sys::PA_CHANNEL_POSITION_SIDE_LEFT,
            SideRight => pulse_sys::PA_CHANNEL_POSITION_SIDE_RIGHT,
            Aux(n) => {
                (pulse_sys::PA_CHANNEL_POSITION_AUX0 + n as pulse_sys::ChannelPosition)
                    .min(pulse_sys::PA_CHANNEL_POSITION_AUX31)
            }
            TopCenter => pulse_sys::PA_CHANNEL_POSITION_TOP_CENTER,
            TopFrontLeft => pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_LEFT,
            TopFrontRight => pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_RIGHT,
            TopFrontCenter => pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_CENTER,
            TopRearLeft => pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_LEFT,
            TopRearRight => pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_RIGHT,
            TopRearCenter => pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_CENTER,
        }
    }

    pub(crate) fn from_raw(raw: pulse_sys::ChannelPosition) -> Option<Self> {
        use ChannelPosition::*;
        let position = match raw {
            pulse_sys::PA_CHANNEL_POSITION_MONO => Mono,
            pulse_sys::PA_CHANNEL_POSITION_FRONT_LEFT => FrontLeft,
            pulse_sys::PA_CHANNEL_POSITION_FRONT_RIGHT => FrontRight,
            pulse_sys::PA_CHANNEL_POSITION_FRONT_CENTER => FrontCenter,
            pulse_sys::PA_CHANNEL_POSITION_REAR_CENTER => RearCenter,
            pulse_sys::PA_CHANNEL_POSITION_REAR_LEFT => RearLeft,
            pulse_sys::PA_CHANNEL_POSITION_REAR_RIGHT => RearRight,
            pulse_sys::PA_CHANNEL_POSITION_LFE => Lfe,
            pulse_sys::PA_CHANNEL_POSITION_FRONT_LEFT_OF_CENTER => FrontLeftOfCenter,
            pulse_sys::PA_CHANNEL_POSITION_FRONT_RIGHT_OF_CENTER => FrontRightOfCenter,
            pulse_sys::PA_CHANNEL_POSITION_SIDE_LEFT => SideLeft,
            pulse_sys::PA_CHANNEL_POSITION_SIDE_RIGHT => SideRight,
            n @ pulse_sys::PA_CHANNEL_POSITION_AUX0..=pulse_sys::PA_CHANNEL_POSITION_AUX31 => {
                Aux((n - pulse_sys::PA_CHANNEL_POSITION_AUX0) as u8)
            }
            pulse_sys::PA_CHANNEL_POSITION_TOP_CENTER => TopCenter,
            pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_LEFT => TopFrontLeft,
            pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_RIGHT => TopFrontRight,
            pulse_sys::PA_CHANNEL_POSITION_TOP_FRONT_CENTER => TopFrontCenter,
            pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_LEFT => TopRearLeft,
            pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_RIGHT => TopRearRight,
            pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_CENTER => TopRearCenter,
            _ => return None,
        };
        Some(position)
    }
}

/// Ordered speaker positions of a stream's channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    positions: Vec<ChannelPosition>,
}

impl ChannelMap {
    /// Builds a map from explicit positions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArg`] for an empty map or more than
    /// `PA_CHANNELS_MAX` positions.
    pub fn new(positions: Vec<ChannelPosition>) -> Result<Self> {
        if positions.is_empty() || positions.len() > pulse_sys::PA_CHANNELS_MAX {
            return Err(Error::InvalidArg);
        }
        Ok(Self { positions })
    }

    /// One of the library's standard layouts, from `pa_channel_map_init_auto`.
    ///
    /// Returns `None` when `def` has no layout for `channels`.
    fn standard(api: &PulseApi, channels: u8, def: pulse_sys::ChannelMapDef) -> Option<Self> {
        if channels == 0 || channels as usize > pulse_sys::PA_CHANNELS_MAX {
            return None;
        }
        let mut raw = pulse_sys::ChannelMap::default();
        let init = unsafe { api.channel_map_init_auto(&mut raw, c_uint::from(channels), def) };
        if init.is_null() {
            return None;
        }
        raw.map[..raw.channels as usize]
            .iter()
            .map(|p| ChannelPosition::from_raw(*p))
            .collect::<Option<Vec<_>>>()
            .map(|positions| Self { positions })
    }

    /// The ALSA default layout; only 1, 2, 4, 5, 6 and 8 channels have one.
    pub fn alsa(api: &PulseApi, channels: u8) -> Option<Self> {
        Self::standard(api, channels, pulse_sys::PA_CHANNEL_MAP_ALSA)
    }

    /// ALSA default, falling back to the library's auxiliary layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArg`] for zero or more than `PA_CHANNELS_MAX`
    /// channels.
    pub fn default_for(api: &PulseApi, channels: u8) -> Result<Self> {
        Self::alsa(api, channels)
            .or_else(|| Self::standard(api, channels, pulse_sys::PA_CHANNEL_MAP_AUX))
            .ok_or(Error::InvalidArg)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[ChannelPosition] {
        &self.positions
    }

    pub(crate) fn to_raw(&self) -> pulse_sys::ChannelMap {
        let mut raw = pulse_sys::ChannelMap {
            channels: self.positions.len() as u8,
            ..Default::default()
        };
        for (slot, position) in raw.map.iter_mut().zip(&self.positions) {
            *slot = position.to_raw();
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_map_keeps_positions() {
        use ChannelPosition::*;
        let map = ChannelMap::new(vec![FrontLeft, FrontRight, RearLeft, RearRight, FrontCenter, Lfe])
            .unwrap();
        let raw = map.to_raw();
        assert_eq!(raw.channels, 6);
        assert_eq!(raw.map[2], pulse_sys::PA_CHANNEL_POSITION_REAR_LEFT);
        assert_eq!(raw.map[6], pulse_sys::PA_CHANNEL_POSITION_INVALID);
    }

    #[test]
    fn raw_positions_convert_back() {
        let map = ChannelMap::new((0..32).map(ChannelPosition::Aux).collect()).unwrap();
        let raw = map.to_raw();
        assert_eq!(raw.map[1], pulse_sys::PA_CHANNEL_POSITION_AUX0 + 1);
        let back: Vec<_> = raw.map.iter().filter_map(|p| ChannelPosition::from_raw(*p)).collect();
        assert_eq!(back, map.positions());
        assert_eq!(ChannelPosition::from_raw(pulse_sys::PA_CHANNEL_POSITION_INVALID), None);
        assert_eq!(
            ChannelPosition::from_raw(pulse_sys::PA_CHANNEL_POSITION_TOP_REAR_CENTER),
            Some(ChannelPosition::TopRearCenter)
        );
    }

    #[test]
    fn explicit_map_rejects_bad_sizes() {
        assert!(ChannelMap::new(vec![]).is_err());
        assert!(ChannelMap::new(vec![ChannelPosition::FrontLeft; 33]).is_err());
        assert_eq!(
            ChannelMap::new(vec![ChannelPosition::FrontLeft, ChannelPosition::FrontRight])
                .unwrap()
                .len(),
            2
        );
    }
}
