// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::time::Duration;

pub mod decode;
pub mod encode;
pub mod error;
pub mod silence;

pub use decode::decode_file;
pub use encode::{encoder_for, Encoder, FfmpegEncoder, WavEncoder};
pub use error::AudioError;
pub use silence::{Segmenter, SilenceProfile, SilenceSplitter};

/// A fully decoded audio file held in memory.
/// Samples are interleaved and scaled to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct DecodedAudio {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl DecodedAudio {
    /// Creates a new decoded buffer. The sample count is trimmed to a whole number of frames.
    pub fn new(mut samples: Vec<f32>, channels: u16, sample_rate: u32) -> DecodedAudio {
        let channels = channels.max(1);
        let whole_frames = samples.len() / channels as usize;
        samples.truncate(whole_frames * channels as usize);
        DecodedAudio {
            samples,
            channels,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// The length of the audio in whole milliseconds.
    pub fn len_ms(&self) -> usize {
        if self.sample_rate == 0 {
            return 0;
        }
        (self.frames() as u64 * 1000 / self.sample_rate as u64) as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.len_ms() as u64)
    }

    /// The frame index at the given millisecond offset, clamped to the buffer.
    pub fn frame_at_ms(&self, ms: usize) -> usize {
        let frame = (ms as u64 * self.sample_rate as u64 / 1000) as usize;
        frame.min(self.frames())
    }

    /// Returns the interleaved samples between the two millisecond offsets.
    pub fn slice_ms(&self, start_ms: usize, end_ms: usize) -> &[f32] {
        let channels = self.channels as usize;
        let start = self.frame_at_ms(start_ms) * channels;
        let end = self.frame_at_ms(end_ms.max(start_ms)) * channels;
        &self.samples[start..end]
    }

    /// Returns a segment of this buffer between the two millisecond offsets.
    pub fn segment(&self, start_ms: usize, end_ms: usize) -> AudioSegment<'_> {
        let len_ms = self.len_ms();
        let start_ms = start_ms.min(len_ms);
        let end_ms = end_ms.clamp(start_ms, len_ms);
        AudioSegment {
            start_ms,
            end_ms,
            samples: self.slice_ms(start_ms, end_ms),
            channels: self.channels,
            sample_rate: self.sample_rate,
        }
    }
}

/// A region of a decoded buffer. Segments borrow from the buffer they were cut from.
#[derive(Clone, Copy, Debug)]
pub struct AudioSegment<'a> {
    start_ms: usize,
    end_ms: usize,
    samples: &'a [f32],
    channels: u16,
    sample_rate: u32,
}

impl<'a> AudioSegment<'a> {
    /// Offset of the segment start in the source recording.
    pub fn start_ms(&self) -> usize {
        self.start_ms
    }

    /// Offset of the segment end in the source recording.
    pub fn end_ms(&self) -> usize {
        self.end_ms
    }

    pub fn samples(&self) -> &'a [f32] {
        self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis((self.end_ms - self.start_ms) as u64)
    }
}
