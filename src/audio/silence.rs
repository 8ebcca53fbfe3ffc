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
//! Amplitude-threshold segmentation of a decoded buffer.
//!
//! A window of `min_silence` length is slid over the audio one millisecond at a
//! time. Windows whose RMS is at or below the threshold are silent; runs of silent
//! windows become silent ranges and everything between them is a segment.

use std::time::Duration;

use tracing::debug;

use super::{AudioSegment, DecodedAudio};

/// Sensitivity parameters for one silence detection pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SilenceProfile {
    /// The shortest stretch of quiet audio that counts as a gap.
    pub min_silence: Duration,
    /// The loudness, in dBFS, at or below which audio is considered silent.
    pub threshold_db: f64,
    /// How much silence to keep on either side of each segment.
    pub keep_silence: Duration,
}

impl SilenceProfile {
    /// Long gaps and a loose threshold, for bowed notes.
    pub const SUSTAIN: SilenceProfile = SilenceProfile {
        min_silence: Duration::from_millis(1000),
        threshold_db: -30.0,
        keep_silence: Duration::from_millis(500),
    };

    /// Short gaps and a strict threshold, for plucked notes.
    pub const PLUCK: SilenceProfile = SilenceProfile {
        min_silence: Duration::from_millis(300),
        threshold_db: -60.0,
        keep_silence: Duration::from_millis(100),
    };

    /// The threshold as a linear amplitude relative to full scale.
    pub fn threshold_amplitude(&self) -> f64 {
        10f64.powf(self.threshold_db / 20.0)
    }
}

/// Splits a decoded buffer into an ordered list of segments.
pub trait Segmenter {
    fn split<'a>(
        &self,
        audio: &'a DecodedAudio,
        profile: &SilenceProfile,
    ) -> Vec<AudioSegment<'a>>;
}

/// The default segmenter.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilenceSplitter;

impl Segmenter for SilenceSplitter {
    fn split<'a>(
        &self,
        audio: &'a DecodedAudio,
        profile: &SilenceProfile,
    ) -> Vec<AudioSegment<'a>> {
        split_ranges(audio, profile)
            .into_iter()
            .map(|(start, end)| audio.segment(start, end))
            .collect()
    }
}

/// Returns the millisecond ranges that `SilenceSplitter` would cut.
pub fn split_ranges(audio: &DecodedAudio, profile: &SilenceProfile) -> Vec<(usize, usize)> {
    let len = audio.len_ms() as i64;
    let keep = profile.keep_silence.as_millis() as i64;

    let mut ranges: Vec<(i64, i64)> = detect_nonsilent(audio, profile)
        .into_iter()
        .map(|(start, end)| (start as i64 - keep, end as i64 + keep))
        .collect();

    // Neighbours whose kept silence overlaps share the gap at its midpoint.
    for i in 1..ranges.len() {
        let last_end = ranges[i - 1].1;
        let next_start = ranges[i].0;
        if next_start < last_end {
            let midpoint = (last_end + next_start).div_euclid(2);
            ranges[i - 1].1 = midpoint;
            ranges[i].0 = midpoint;
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| (start.max(0) as usize, end.min(len).max(0) as usize))
        .collect()
}

/// Returns the ranges between silent ranges.
pub fn detect_nonsilent(audio: &DecodedAudio, profile: &SilenceProfile) -> Vec<(usize, usize)> {
    let len = audio.len_ms();
    let silent = detect_silence(audio, profile);

    let Some(&(first_start, first_end)) = silent.first() else {
        return vec![(0, len)];
    };
    if first_start == 0 && first_end == len {
        return Vec::new();
    }

    let mut nonsilent = Vec::with_capacity(silent.len() + 1);
    let mut prev_end = 0;
    for &(start, end) in silent.iter() {
        nonsilent.push((prev_end, start));
        prev_end = end;
    }
    if prev_end != len {
        nonsilent.push((prev_end, len));
    }
    if nonsilent.first() == Some(&(0, 0)) {
        nonsilent.remove(0);
    }
    nonsilent
}

/// Returns the silent ranges, in milliseconds, in chronological order.
pub fn detect_silence(audio: &DecodedAudio, profile: &SilenceProfile) -> Vec<(usize, usize)> {
    let len = audio.len_ms();
    let min_silence = (profile.min_silence.as_millis() as usize).max(1);
    if len < min_silence {
        return Vec::new();
    }

    let energy = EnergyIndex::new(audio);
    let threshold = profile.threshold_amplitude();

    let silence_starts: Vec<usize> = (0..=len - min_silence)
        .filter(|&start| energy.rms(start, start + min_silence) <= threshold)
        .collect();

    let Some((&first, rest)) = silence_starts.split_first() else {
        return Vec::new();
    };

    let mut ranges = Vec::new();
    let mut range_start = first;
    let mut prev = first;
    for &start in rest {
        let continuous = start == prev + 1;
        let has_gap = start > prev + min_silence;
        if !continuous && has_gap {
            ranges.push((range_start, prev + min_silence));
            range_start = start;
        }
        prev = start;
    }
    ranges.push((range_start, prev + min_silence));

    debug!(
        min_silence = ?profile.min_silence,
        threshold_db = profile.threshold_db,
        silent_ranges = ranges.len(),
        "Detected silence"
    );
    ranges
}

/// Running sums of squared samples at every millisecond boundary, so the RMS of
/// any whole-millisecond window is constant time.
struct EnergyIndex {
    sum_squares: Vec<f64>,
    sample_counts: Vec<usize>,
}

impl EnergyIndex {
    fn new(audio: &DecodedAudio) -> EnergyIndex {
        let len = audio.len_ms();
        let channels = audio.channels() as usize;
        let samples = audio.samples();

        let mut sum_squares = Vec::with_capacity(len + 1);
        let mut sample_counts = Vec::with_capacity(len + 1);
        sum_squares.push(0.0);
        sample_counts.push(0);

        let mut total = 0.0f64;
        let mut position = 0;
        for ms in 1..=len {
            let end = audio.frame_at_ms(ms) * channels;
            total += samples[position..end]
                .iter()
                .map(|&s| (s as f64) * (s as f64))
                .sum::<f64>();
            position = end;
            sum_squares.push(total);
            sample_counts.push(end);
        }

        EnergyIndex {
            sum_squares,
            sample_counts,
        }
    }

    fn rms(&self, start_ms: usize, end_ms: usize) -> f64 {
        let count = self.sample_counts[end_ms] - self.sample_counts[start_ms];
        if count == 0 {
            return 0.0;
        }
        let energy = (self.sum_squares[end_ms] - self.sum_squares[start_ms]).max(0.0);
        (energy / count as f64).sqrt()
    }
}
