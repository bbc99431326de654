// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Channel layout reduction and interleaved sample remapping.
//!
//! The player describes its PCM data with a speaker layout. The remapper
//! derives the layout the stream is opened with (no unused or duplicate
//! positions, mono widened to stereo) and copies each frame into that layout.

use pulse::ChannelPosition;

/// Speaker positions used by the player's PCM layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcmChannel {
    FrontLeft,
    FrontRight,
    FrontCenter,
    LowFrequency,
    BackLeft,
    BackRight,
    FrontLeftOfCenter,
    FrontRightOfCenter,
    BackCenter,
    SideLeft,
    SideRight,
    TopFrontLeft,
    TopFrontRight,
    TopFrontCenter,
    TopCenter,
    TopBackLeft,
    TopBackRight,
    TopBackCenter,
    /// Unused slot; also terminates a layout.
    Invalid,
}

impl PcmChannel {
    /// Server channel position for this speaker.
    pub fn position(self) -> Option<ChannelPosition> {
        use ChannelPosition as P;
        Some(match self {
            PcmChannel::FrontLeft => P::FrontLeft,
            PcmChannel::FrontRight => P::FrontRight,
            PcmChannel::FrontCenter => P::FrontCenter,
            PcmChannel::LowFrequency => P::Lfe,
            PcmChannel::BackLeft => P::RearLeft,
            PcmChannel::BackRight => P::RearRight,
            PcmChannel::FrontLeftOfCenter => P::FrontLeftOfCenter,
            PcmChannel::FrontRightOfCenter => P::FrontRightOfCenter,
            PcmChannel::BackCenter => P::RearCenter,
            PcmChannel::SideLeft => P::SideLeft,
            PcmChannel::SideRight => P::SideRight,
            PcmChannel::TopFrontLeft => P::TopFrontLeft,
            PcmChannel::TopFrontRight => P::TopFrontRight,
            // The player has no separate top-front-center speaker.
            PcmChannel::TopFrontCenter => P::TopCenter,
            PcmChannel::TopCenter => P::TopCenter,
            PcmChannel::TopBackLeft => P::TopRearLeft,
            PcmChannel::TopBackRight => P::TopRearRight,
            PcmChannel::TopBackCenter => P::TopRearCenter,
            PcmChannel::Invalid => return None,
        })
    }
}

/// Maps interleaved frames from the player's layout to the stream's.
#[derive(Debug, Clone, Default)]
pub struct ChannelRemapper {
    in_channels: usize,
    sample_size: usize,
    output: Vec<PcmChannel>,
    /// Input channel feeding each output channel.
    sources: Vec<usize>,
}

impl ChannelRemapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets the configured formats.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Configures the input and returns the output layout to open.
    ///
    /// `layout` lists the position of each of the `channels` input channels;
    /// it may be shorter and may end early with [`PcmChannel::Invalid`].
    /// An empty result means no usable positions were given.
    pub fn set_input_format(
        &mut self,
        channels: usize,
        layout: &[PcmChannel],
        sample_size: usize,
    ) -> &[PcmChannel] {
        self.reset();
        self.in_channels = channels;
        self.sample_size = sample_size;

        for (index, &channel) in layout
            .iter()
            .take(channels)
            .take_while(|c| **c != PcmChannel::Invalid)
            .enumerate()
        {
            if !self.output.contains(&channel) {
                self.output.push(channel);
                self.sources.push(index);
            }
        }

        if let [PcmChannel::FrontCenter | PcmChannel::FrontLeft] = self.output.as_slice() {
            let source = self.sources[0];
            self.output = vec![PcmChannel::FrontLeft, PcmChannel::FrontRight];
            self.sources = vec![source, source];
        }
        &self.output
    }

    /// Output layout from the last [`ChannelRemapper::set_input_format`].
    pub fn output_layout(&self) -> &[PcmChannel] {
        &self.output
    }

    pub fn out_channels(&self) -> usize {
        self.output.len()
    }

    /// `true` when frames must be rewritten before they reach the stream.
    pub fn can_remap(&self) -> bool {
        !self.output.is_empty()
            && (self.sources.len() != self.in_channels
                || self.sources.iter().enumerate().any(|(i, s)| i != *s))
    }

    /// Copies `frames` frames from `input` into `output`.
    ///
    /// Stops early if either buffer holds fewer frames.
    pub fn remap(&self, input: &[u8], output: &mut [u8], frames: usize) {
        let in_frame = self.in_channels * self.sample_size;
        let out_frame = self.sources.len() * self.sample_size;
        if in_frame == 0 || out_frame == 0 {
            return;
        }
        for (src, dst) in input
            .chunks_exact(in_frame)
            .zip(output.chunks_exact_mut(out_frame))
            .take(frames)
        {
            for (sample, &source) in dst.chunks_exact_mut(self.sample_size).zip(&self.sources) {
                let start = source * self.sample_size;
                sample.copy_from_slice(&src[start..start + self.sample_size]);
            }
        }
    }
}
