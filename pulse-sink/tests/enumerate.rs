// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Sink enumeration against an in-memory server.

mod common;

use common::MockServer;
use pulse::SinkInfo;
use pulse_sink::{AudioSinkEntry, DeviceString, DirectSoundSink, SinkSettings, enumerate_sinks};

fn sink_info(index: u32, name: &str, description: &str) -> SinkInfo {
    SinkInfo {
        index,
        name: name.to_string(),
        description: description.to_string(),
    }
}

#[test]
fn default_entry_comes_first() {
    let server = MockServer::new();
    server.state().sinks = vec![
        sink_info(0, "alsa_output.pci-0000_00_1b.0.analog-stereo", "Built-in Audio"),
        sink_info(3, "alsa_output.hdmi-stereo", "HDMI"),
    ];

    let entries = enumerate_sinks(&server, "Default", false);
    assert_eq!(
        entries,
        vec![
            AudioSinkEntry {
                description: "Default".to_string(),
                device: "pulse:default@default".to_string(),
            },
            AudioSinkEntry {
                description: "Built-in Audio".to_string(),
                device: "pulse:alsa_output.pci-0000_00_1b.0.analog-stereo@default".to_string(),
            },
            AudioSinkEntry {
                description: "HDMI".to_string(),
                device: "pulse:alsa_output.hdmi-stereo@default".to_string(),
            },
        ]
    );
}

#[test]
fn enumerated_devices_parse_back() {
    let server = MockServer::new();
    server.state().sinks = vec![sink_info(1, "hdmi", "HDMI")];
    let entries = enumerate_sinks(&server, "Default", false);

    assert_eq!(DeviceString::parse(&entries[0].device), DeviceString::default());
    let hdmi = DeviceString::parse(&entries[1].device);
    assert_eq!(hdmi.sink.as_deref(), Some("hdmi"));
    assert_eq!(hdmi.server, None);
}

#[test]
fn sink_named_default_is_not_listed_twice() {
    let server = MockServer::new();
    server.state().sinks = vec![
        sink_info(0, "default", "Loopback"),
        sink_info(1, "hdmi", "HDMI"),
    ];
    let entries = enumerate_sinks(&server, "Default", false);
    let devices: Vec<_> = entries.iter().map(|e| e.device.as_str()).collect();
    assert_eq!(devices, vec!["pulse:default@default", "pulse:hdmi@default"]);
    assert_eq!(entries[0].description, "Default");
}

#[test]
fn passthrough_lists_nothing() {
    let server = MockServer::new();
    server.state().sinks = vec![sink_info(0, "hdmi", "HDMI")];
    assert!(enumerate_sinks(&server, "Default", true).is_empty());
}

#[test]
fn server_without_sinks_still_offers_default() {
    let server = MockServer::new();
    let entries = enumerate_sinks(&server, "Default", false);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].device, "pulse:default@default");
}

#[test]
fn offline_server_lists_nothing() {
    let server = MockServer::new();
    server.state().offline = true;
    assert!(enumerate_sinks(&server, "Default", false).is_empty());
}

#[test]
fn sink_uses_configured_label() {
    let server = MockServer::new();
    let settings = SinkSettings {
        default_sink_label: "System default".to_string(),
        ..Default::default()
    };
    let sink = DirectSoundSink::new(server, settings);
    let entries = sink.enumerate_sinks(false);
    assert_eq!(entries[0].description, "System default");
}

#[test]
fn entries_serialize_for_the_command_line() {
    let entry = AudioSinkEntry {
        description: "HDMI".to_string(),
        device: "pulse:hdmi@default".to_string(),
    };
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "description": "HDMI", "device": "pulse:hdmi@default" })
    );
}
