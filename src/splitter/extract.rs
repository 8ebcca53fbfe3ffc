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
use tracing::{info, warn};

use super::{Classification, PLUCK_SKIP};
use crate::audio::{AudioSegment, DecodedAudio, Segmenter, SilenceProfile};
use crate::notes::NOTES_PER_STRING;

/// The two segment lists cut from one recording, in chronological order.
pub struct Batches<'a> {
    pub sustain: Vec<AudioSegment<'a>>,
    pub pluck: Vec<AudioSegment<'a>>,
}

impl<'a> Batches<'a> {
    /// Returns the batch for the given classification.
    pub fn get(&self, classification: Classification) -> &[AudioSegment<'a>] {
        match classification {
            Classification::Sustain => &self.sustain,
            Classification::Pluck => &self.pluck,
        }
    }
}

/// Runs the sustain and pluck silence passes over a decoded buffer.
pub struct SegmentExtractor<'s> {
    segmenter: &'s dyn Segmenter,
    sustain: SilenceProfile,
    pluck: SilenceProfile,
}

impl<'s> SegmentExtractor<'s> {
    pub fn new(
        segmenter: &'s dyn Segmenter,
        sustain: SilenceProfile,
        pluck: SilenceProfile,
    ) -> SegmentExtractor<'s> {
        SegmentExtractor {
            segmenter,
            sustain,
            pluck,
        }
    }

    pub fn extract<'a>(&self, audio: &'a DecodedAudio) -> Batches<'a> {
        info!("Splitting sustain audio on silence");
        let sustain = self.segmenter.split(audio, &self.sustain);
        info!(count = sustain.len(), "Found sustain segments");

        info!("Splitting pluck audio on silence");
        let pluck = self.segmenter.split(audio, &self.pluck);
        info!(count = pluck.len(), "Found pluck segments");

        Batches { sustain, pluck }
    }
}

/// Checks whether the pluck batch looks like it starts with the sustained notes
/// followed by the plucked notes. Returns a description of anything suspicious.
/// This never changes which segments are used.
pub fn check_pluck_offset(batches: &Batches<'_>) -> Vec<String> {
    let mut warnings = Vec::new();

    let expected = PLUCK_SKIP + NOTES_PER_STRING;
    if batches.pluck.len() < expected {
        warnings.push(format!(
            "pluck pass found {} segments, expected at least {}",
            batches.pluck.len(),
            expected
        ));
    }

    if let (Some(last_sustain), Some(first_pluck)) = (
        batches.sustain.get(NOTES_PER_STRING - 1),
        batches.pluck.get(PLUCK_SKIP),
    ) {
        if first_pluck.start_ms() < last_sustain.end_ms() {
            warnings.push(format!(
                "first plucked note starts at {}ms, before the last sustained note ends at {}ms",
                first_pluck.start_ms(),
                last_sustain.end_ms()
            ));
        }
    }

    for warning in warnings.iter() {
        warn!(warning = warning.as_str(), "Pluck notes may be mislabelled");
    }
    warnings
}
