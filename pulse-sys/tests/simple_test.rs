// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Layout smoke tests for the hand-declared FFI types.

use std::mem::{offset_of, size_of};

/// The C structs passed by pointer must keep libpulse's layout.
#[test]
fn ffi_structs_match_c_layout() {
    assert_eq!(size_of::<pulse_sys::SampleSpec>(), 12);
    assert_eq!(offset_of!(pulse_sys::SampleSpec, rate), 4);
    assert_eq!(offset_of!(pulse_sys::SampleSpec, channels), 8);

    assert_eq!(size_of::<pulse_sys::ChannelMap>(), 4 + 4 * pulse_sys::PA_CHANNELS_MAX);
    assert_eq!(offset_of!(pulse_sys::ChannelMap, map), 4);

    assert_eq!(size_of::<pulse_sys::CVolume>(), 4 + 4 * pulse_sys::PA_CHANNELS_MAX);
    assert_eq!(size_of::<pulse_sys::BufferAttr>(), 20);
    if cfg!(target_pointer_width = "64") {
        assert_eq!(offset_of!(pulse_sys::SinkInfo, description), 16);
    }
}

#[test]
fn default_channel_map_is_invalid() {
    let map = pulse_sys::ChannelMap::default();
    assert_eq!(map.channels, 0);
    assert!(
        map.map
            .iter()
            .all(|p| *p == pulse_sys::PA_CHANNEL_POSITION_INVALID)
    );

    let attr = pulse_sys::BufferAttr {
        tlength: 4096,
        ..Default::default()
    };
    println!("buffer attr: {:?}", attr);
}
