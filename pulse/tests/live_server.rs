// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Tests against a running PulseAudio (or pipewire-pulse) server.
//!
//! These are ignored by default. Run them with `cargo test -- --ignored` on a
//! machine with a user session and libpulse installed; set
//! `PULSE_LIBRARY_PATH` to point at a non-standard library location.

use std::time::Duration;

use pulse::{
    ChannelMap, ChannelPosition, ChannelVolumes, Error, SampleFormat, SampleSpec, Session,
    Stream, StreamFlags, StreamState, Volume, config::pulse_library_path, load_api,
};
use tracing::info;

/// Ensures logging is initialized only once across all tests.
static LOG_ONCE: std::sync::Once = std::sync::Once::new();

fn setup_test() -> Session {
    LOG_ONCE.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::builder()
                    .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .init();
    });

    let api = load_api(pulse_library_path()).expect("libpulse should be loadable");
    Session::connect(api, "pulse-tests", None).expect("server should accept the connection")
}

#[test]
#[ignore = "needs a running sound server"]
fn list_sinks() {
    let session = setup_test();
    let sinks = session.sinks().unwrap();
    for sink in &sinks {
        info!("{} ({}): {}", sink.index, sink.name, sink.description);
    }
}

#[test]
#[ignore = "needs a running sound server"]
fn play_short_silence() {
    let session = setup_test();
    let spec = SampleSpec {
        format: SampleFormat::S16NE,
        rate: 44100,
        channels: 2,
    };
    let guard = session.lock();
    let stream = Stream::new(
        &guard,
        session.context(),
        "silence",
        &spec,
        &ChannelMap::default_for(session.api(), 2).unwrap(),
    )
    .unwrap();
    stream
        .connect_playback(
            &guard,
            None,
            StreamFlags::INTERPOLATE_TIMING | StreamFlags::AUTO_TIMING_UPDATE,
            &ChannelVolumes::reset(session.api(), 2).unwrap(),
        )
        .unwrap();
    stream.wait_ready(&guard).unwrap();
    assert_eq!(stream.state(&guard), StreamState::Ready);

    let attr = stream.buffer_attr(&guard).unwrap();
    info!("Buffer attributes: {attr:?}");
    assert!(attr.tlength > 0);

    let writable = stream.writable_size(&guard).unwrap();
    let frames = writable / spec.frame_size();
    stream
        .write(&guard, &vec![0u8; frames * spec.frame_size()])
        .unwrap();
    stream.drain(&guard).unwrap().wait("drain").unwrap();
    let latency = stream.latency(&guard).unwrap_or(Duration::ZERO);
    info!("Latency after drain: {latency:?}");
}

#[test]
#[ignore = "needs a running sound server"]
fn unknown_sink_fails_to_connect() {
    let session = setup_test();
    let spec = SampleSpec {
        format: SampleFormat::S16NE,
        rate: 48000,
        channels: 1,
    };
    let guard = session.lock();
    let stream = Stream::new(
        &guard,
        session.context(),
        "nowhere",
        &spec,
        &ChannelMap::default_for(session.api(), 1).unwrap(),
    )
    .unwrap();
    let connected = stream
        .connect_playback(
            &guard,
            Some("no-such-sink-for-tests"),
            StreamFlags::NONE,
            &ChannelVolumes::reset(session.api(), 1).unwrap(),
        )
        .and_then(|()| stream.wait_ready(&guard));
    assert!(connected.is_err());
}

#[test]
#[ignore = "needs a running sound server"]
fn latency_right_after_ready() {
    let session = setup_test();
    let spec = SampleSpec {
        format: SampleFormat::S16NE,
        rate: 48000,
        channels: 2,
    };
    let guard = session.lock();
    let stream = Stream::new(
        &guard,
        session.context(),
        "latency",
        &spec,
        &ChannelMap::default_for(session.api(), 2).unwrap(),
    )
    .unwrap();
    stream
        .connect_playback(
            &guard,
            None,
            StreamFlags::INTERPOLATE_TIMING | StreamFlags::AUTO_TIMING_UPDATE,
            &ChannelVolumes::reset(session.api(), 2).unwrap(),
        )
        .unwrap();
    stream.wait_ready(&guard).unwrap();

    // No timing info may have arrived yet; the auto update delivers it.
    let mut updates = 0;
    let latency = loop {
        match stream.latency(&guard) {
            Err(Error::NoData) if updates < 50 => {
                updates += 1;
                guard.wait();
            }
            result => break result,
        }
    };
    let latency = latency.unwrap();
    info!("Latency after {updates} waits: {latency:?}");
    assert!(latency < Duration::from_secs(10));
}

#[test]
#[ignore = "needs libpulse installed"]
fn library_volume_curve() {
    let api = load_api(pulse_library_path()).unwrap();
    assert_eq!(Volume::from_db(&api, 0.0), Volume::NORM);
    assert_eq!(Volume::from_db(&api, -6.0), Volume(52057));
    assert_eq!(Volume::from_db(&api, -20.0), Volume(30419));
    assert_eq!(Volume::from_db(&api, -45.0), Volume(11654));
    assert_eq!(Volume::from_db(&api, 6.0), Volume(82505));
    assert!(Volume::from_db(&api, -200.0).is_muted());
    assert!(Volume::from_db(&api, f64::NEG_INFINITY).is_muted());
    assert!(Volume::from_db(&api, f64::NAN).is_muted());

    let volumes = ChannelVolumes::set(&api, 2, Volume(1234)).unwrap();
    assert_eq!(volumes.channels(), 2);
    assert_eq!(volumes.values().collect::<Vec<_>>(), vec![Volume(1234); 2]);
    assert!(ChannelVolumes::mute(&api, 6).unwrap().is_muted());
    assert!(!ChannelVolumes::reset(&api, 6).unwrap().is_muted());
    assert!(ChannelVolumes::reset(&api, 0).is_err());
}

#[test]
#[ignore = "needs libpulse installed"]
fn library_channel_maps() {
    use ChannelPosition::*;
    let api = load_api(pulse_library_path()).unwrap();
    assert_eq!(ChannelMap::alsa(&api, 1).unwrap().positions(), &[Mono]);
    assert_eq!(
        ChannelMap::alsa(&api, 6).unwrap().positions(),
        &[FrontLeft, FrontRight, RearLeft, RearRight, FrontCenter, Lfe]
    );
    assert_eq!(
        ChannelMap::alsa(&api, 8).unwrap().positions(),
        &[FrontLeft, FrontRight, RearLeft, RearRight, FrontCenter, Lfe, SideLeft, SideRight]
    );
    assert!(ChannelMap::alsa(&api, 3).is_none());
    assert_eq!(
        ChannelMap::default_for(&api, 3).unwrap().positions(),
        &[Aux(0), Aux(1), Aux(2)]
    );
    assert!(ChannelMap::default_for(&api, 0).is_err());
}
