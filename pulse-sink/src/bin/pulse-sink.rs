// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Command line front end: list sinks or play a test tone.

use std::{
    f64::consts::TAU,
    path::PathBuf,
    process::ExitCode,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use tracing::{error, info};

use pulse_sink::{AudioSink, DirectSoundSink, PulseServer, SinkError, SinkParams, SinkSettings};

/// Full device buffers' worth of time without progress before giving up.
const STALL_BUFFERS: f32 = 4.0;

/// Lower bound on the stall deadline, for when the buffer size is unknown.
const MIN_STALL: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(name = "pulse-sink")]
#[command(about = "PulseAudio direct-sound playback backend")]
#[command(version)]
struct Args {
    /// JSON settings file
    #[arg(long, global = true, env = "PULSE_SINK_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the output devices of the default server
    Sinks {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Play a sine tone
    Tone {
        #[arg(long, default_value = "pulse:default@default")]
        device: String,

        #[arg(long, default_value_t = 2.0)]
        seconds: f64,

        #[arg(long, default_value_t = 440.0)]
        frequency: f64,

        #[arg(long, default_value_t = 2)]
        channels: u32,

        #[arg(long, default_value_t = 48000)]
        rate: u32,
    },
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
}

/// Interleaved signed 16 bit sine, the same sample on every channel.
fn sine_frames(
    frequency: f64,
    rate: u32,
    channels: u32,
    start_frame: u64,
    frames: usize,
) -> Vec<u8> {
    let mut data = Vec::with_capacity(frames * channels as usize * 2);
    for n in 0..frames as u64 {
        let t = (start_frame + n) as f64 / f64::from(rate);
        let sample = ((TAU * frequency * t).sin() * f64::from(i16::MAX) * 0.25) as i16;
        for _ in 0..channels {
            data.extend_from_slice(&sample.to_ne_bytes());
        }
    }
    data
}

/// Tracks when the sink last accepted data.
struct StallWatch {
    limit: Duration,
    last_progress: Instant,
}

impl StallWatch {
    fn new(limit: Duration, now: Instant) -> Self {
        Self {
            limit,
            last_progress: now,
        }
    }

    fn progress(&mut self, written: usize, now: Instant) -> pulse_sink::Result<()> {
        if written > 0 {
            self.last_progress = now;
            return Ok(());
        }
        let stalled = now.saturating_duration_since(self.last_progress);
        if stalled > self.limit {
            return Err(SinkError::Stalled(stalled));
        }
        Ok(())
    }
}

fn play_tone<S: pulse_sink::SoundServer>(
    sink: &mut DirectSoundSink<S>,
    device: String,
    seconds: f64,
    frequency: f64,
    channels: u32,
    rate: u32,
) -> pulse_sink::Result<()> {
    sink.initialize(SinkParams::pcm(device, channels, rate, 16))?;
    info!(
        "Playing {frequency} Hz for {seconds} s, buffer holds {:.3} s",
        sink.cache_total()
    );

    let frame_size = channels as usize * 2;
    let total_frames = (seconds * f64::from(rate)) as u64;
    let stall_limit = Duration::try_from_secs_f32(sink.cache_total() * STALL_BUFFERS)
        .unwrap_or(MIN_STALL)
        .max(MIN_STALL);
    let mut watch = StallWatch::new(stall_limit, Instant::now());
    let mut position = 0u64;
    while position < total_frames {
        let space = sink.space() / frame_size;
        let written = if space == 0 {
            0
        } else {
            let frames = space.min((total_frames - position) as usize);
            let data = sine_frames(frequency, rate, channels, position, frames);
            sink.add_packets(&data) / frame_size
        };
        position += written as u64;
        watch.progress(written, Instant::now())?;
        if written == 0 {
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    info!("Queued, delay {:.3} s", sink.delay());
    sink.wait_completion();
    sink.deinitialize();
    Ok(())
}

fn run(args: Args) -> pulse_sink::Result<()> {
    let settings = match &args.settings {
        Some(path) => SinkSettings::from_json_file(path)?,
        None => SinkSettings::default(),
    };
    let server = PulseServer::from_settings(&settings)?;
    let mut sink = DirectSoundSink::new(server, settings);

    match args.command {
        Command::Sinks { json } => {
            let entries = sink.enumerate_sinks(false);
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{:<40} {}", entry.device, entry.description);
                }
            }
            Ok(())
        }
        Command::Tone {
            device,
            seconds,
            frequency,
            channels,
            rate,
        } => play_tone(&mut sink, device, seconds, frequency, channels, rate),
    }
}

fn main() -> ExitCode {
    setup_logging();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_starts_at_zero_and_fills_every_channel() {
        let data = sine_frames(1000.0, 48000, 2, 0, 4);
        assert_eq!(data.len(), 16);
        assert_eq!(&data[0..4], &[0, 0, 0, 0]);
        assert_eq!(data[4..6], data[6..8]);
    }

    #[test]
    fn stalled_output_gives_up_after_the_limit() {
        let start = Instant::now();
        let mut watch = StallWatch::new(Duration::from_secs(1), start);
        assert!(watch.progress(0, start + Duration::from_millis(900)).is_ok());
        assert!(matches!(
            watch.progress(0, start + Duration::from_millis(1100)),
            Err(SinkError::Stalled(_))
        ));
    }

    #[test]
    fn progress_resets_the_stall_clock() {
        let start = Instant::now();
        let mut watch = StallWatch::new(Duration::from_secs(1), start);
        assert!(watch.progress(64, start + Duration::from_millis(900)).is_ok());
        assert!(watch.progress(0, start + Duration::from_millis(1800)).is_ok());
        assert!(watch.progress(0, start + Duration::from_millis(2000)).is_err());
    }

    #[test]
    fn command_line_parses() {
        let args = Args::try_parse_from([
            "pulse-sink",
            "tone",
            "--device",
            "pulse:hdmi@default",
            "--channels",
            "1",
        ])
        .unwrap();
        match args.command {
            Command::Tone {
                device, channels, ..
            } => {
                assert_eq!(device, "pulse:hdmi@default");
                assert_eq!(channels, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
