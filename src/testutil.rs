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
use std::{error::Error, fs::File, path::PathBuf};

use hound::{SampleFormat, WavSpec, WavWriter};

/// Writes interleaved 16 bit samples to a WAV file.
pub fn write_wav(
    path: PathBuf,
    samples: &[i16],
    channels: u16,
    sample_rate: u32,
) -> Result<(), Box<dyn Error>> {
    let tempwav = File::create(path)?;
    let mut writer = WavWriter::new(
        tempwav,
        WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        },
    )?;

    for sample in samples {
        writer.write_sample(*sample)?;
    }
    writer.finalize()?;

    Ok(())
}

/// Audio test utilities for generating test signals
pub mod audio_test_utils {
    use crate::audio::DecodedAudio;

    /// The amplitude of generated notes.
    pub const NOTE_AMPLITUDE: f32 = 0.3;

    /// Generates mono audio with notes of the given lengths, separated by silent gaps.
    /// Notes are a square wave at `NOTE_AMPLITUDE`, so their RMS is exactly that.
    /// All lengths are in milliseconds.
    pub fn bursts(
        sample_rate: u32,
        lead_ms: usize,
        notes_ms: &[usize],
        gap_ms: usize,
        tail_ms: usize,
    ) -> DecodedAudio {
        let frames_per_ms = sample_rate as usize / 1000;
        let mut samples = vec![0.0; lead_ms * frames_per_ms];
        for (i, note_ms) in notes_ms.iter().enumerate() {
            if i > 0 {
                samples.extend(std::iter::repeat(0.0).take(gap_ms * frames_per_ms));
            }
            samples.extend((0..note_ms * frames_per_ms).map(|frame| {
                if frame % 2 == 0 {
                    NOTE_AMPLITUDE
                } else {
                    -NOTE_AMPLITUDE
                }
            }));
        }
        samples.extend(std::iter::repeat(0.0).take(tail_ms * frames_per_ms));
        DecodedAudio::new(samples, 1, sample_rate)
    }

    /// Converts generated audio to 16 bit samples for writing with `write_wav`.
    pub fn to_i16(audio: &DecodedAudio) -> Vec<i16> {
        audio
            .samples()
            .iter()
            .map(|s| (s * i16::MAX as f32) as i16)
            .collect()
    }
}
