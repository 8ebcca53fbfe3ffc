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
use std::cell::RefCell;
use std::path::{Path, PathBuf};

use super::*;
use crate::audio::{AudioError, AudioSegment, DecodedAudio};
use crate::config;
use crate::testutil::{audio_test_utils::bursts, audio_test_utils::to_i16, write_wav};

/// Each fake segment covers 100ms and is labelled by its position: segment `i`
/// starts at `i * 100` ms.
const SEGMENT_MS: usize = 100;

/// A segmenter that returns a fixed number of labelled segments per pass.
struct FakeSegmenter {
    sustain: usize,
    pluck: usize,
    calls: RefCell<usize>,
}

impl FakeSegmenter {
    fn new(sustain: usize, pluck: usize) -> FakeSegmenter {
        FakeSegmenter {
            sustain,
            pluck,
            calls: RefCell::new(0),
        }
    }
}

impl Segmenter for FakeSegmenter {
    fn split<'a>(
        &self,
        audio: &'a DecodedAudio,
        profile: &SilenceProfile,
    ) -> Vec<AudioSegment<'a>> {
        *self.calls.borrow_mut() += 1;
        let count = if *profile == SilenceProfile::SUSTAIN {
            self.sustain
        } else {
            self.pluck
        };
        (0..count)
            .map(|i| audio.segment(i * SEGMENT_MS, i * SEGMENT_MS + SEGMENT_MS / 2))
            .collect()
    }
}

/// An encoder that records which segment went to which file, optionally failing
/// on the nth call.
#[derive(Default)]
struct RecordingEncoder {
    exports: RefCell<Vec<(PathBuf, usize)>>,
    fail_on: Option<usize>,
}

impl RecordingEncoder {
    fn failing_on(call: usize) -> RecordingEncoder {
        RecordingEncoder {
            exports: RefCell::new(Vec::new()),
            fail_on: Some(call),
        }
    }

    /// Returns (file name, segment position) pairs.
    fn exports(&self) -> Vec<(String, usize)> {
        self.exports
            .borrow()
            .iter()
            .map(|(path, start_ms)| {
                (
                    path.file_name().unwrap().to_string_lossy().to_string(),
                    start_ms / SEGMENT_MS,
                )
            })
            .collect()
    }
}

impl Encoder for RecordingEncoder {
    fn extension(&self) -> &'static str {
        "mp3"
    }

    fn encode(&self, segment: &AudioSegment<'_>, path: &Path) -> Result<(), AudioError> {
        if self.fail_on == Some(self.exports.borrow().len()) {
            return Err(AudioError::EncoderFailed {
                status: "exit status: 1".to_string(),
                stderr: "disk full".to_string(),
            });
        }
        self.exports
            .borrow_mut()
            .push((path.to_path_buf(), segment.start_ms()));
        Ok(())
    }
}

/// Three seconds of silence; long enough for 30 fake segments.
fn silent_audio() -> DecodedAudio {
    DecodedAudio::new(vec![0.0; 3000], 1, 1000)
}

fn expected_names(string: ViolinString, classification: Classification) -> Vec<String> {
    string
        .notes()
        .iter()
        .map(|note| {
            format!(
                "{}_{}_{}.mp3",
                string.letter(),
                crate::notes::sanitize(note),
                classification.name()
            )
        })
        .collect()
}

fn split_with(
    segmenter: &FakeSegmenter,
    encoder: &RecordingEncoder,
    string: ViolinString,
    output_root: &Path,
) -> SplitReport {
    let audio = silent_audio();
    NoteSplitter::new(segmenter, encoder, SilenceProfile::SUSTAIN, SilenceProfile::PLUCK)
        .split(&audio, &output_root.join("input.mp3"), output_root, string)
        .unwrap()
}

#[test]
fn test_g_string_end_to_end_assignment() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(10, 17);
    let encoder = RecordingEncoder::default();

    let report = split_with(&segmenter, &encoder, ViolinString::G, tempdir.path());

    assert!(report.is_complete());
    assert_eq!(report.sustain_found, 10);
    assert_eq!(report.pluck_found, 17);
    assert!(report.warnings.is_empty());
    assert_eq!(*segmenter.calls.borrow(), 2);

    let exports = encoder.exports();
    assert_eq!(exports.len(), 16);

    let sustain_names = expected_names(ViolinString::G, Classification::Sustain);
    assert_eq!(sustain_names[0], "G_G_sustain.mp3");
    assert_eq!(sustain_names[7], "G_D_sustain.mp3");
    for (i, (name, position)) in exports[..8].iter().enumerate() {
        assert_eq!(name, &sustain_names[i]);
        assert_eq!(*position, i);
    }

    // Pluck notes come from segments 8 to 15; segment 16 is unused.
    let pluck_names = expected_names(ViolinString::G, Classification::Pluck);
    assert_eq!(pluck_names[0], "G_G_pluck.mp3");
    assert_eq!(pluck_names[7], "G_D_pluck.mp3");
    for (i, (name, position)) in exports[8..].iter().enumerate() {
        assert_eq!(name, &pluck_names[i]);
        assert_eq!(*position, i + 8);
    }

    // Clips go into per-classification directories next to the input.
    let recorded = encoder.exports.borrow();
    assert_eq!(
        recorded[0].0,
        tempdir.path().join("sustain_audio").join("G_G_sustain.mp3")
    );
    assert_eq!(
        recorded[9].0,
        tempdir.path().join("pluck_audio").join("G_Gs_Ab_pluck.mp3")
    );
    assert!(tempdir.path().join("sustain_audio").is_dir());
    assert!(tempdir.path().join("pluck_audio").is_dir());
}

#[test]
fn test_sustain_shortfall() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(7, 8);
    let encoder = RecordingEncoder::default();

    let report = split_with(&segmenter, &encoder, ViolinString::E, tempdir.path());

    match &report.sustain {
        BatchOutcome::Partial {
            exported,
            shortfall_index,
        } => {
            assert_eq!(exported.len(), 7);
            assert_eq!(*shortfall_index, 7);
        }
        other => panic!("unexpected sustain outcome {:?}", other),
    }
    // Eight pluck segments are all skipped, so nothing is left for the pluck notes.
    match report.pluck.as_ref().unwrap() {
        BatchOutcome::Partial {
            exported,
            shortfall_index,
        } => {
            assert!(exported.is_empty());
            assert_eq!(*shortfall_index, 0);
        }
        other => panic!("unexpected pluck outcome {:?}", other),
    }

    assert_eq!(encoder.exports().len(), 7);
    assert!(!report.is_complete());
}

#[test]
fn test_sustain_shortfall_does_not_stop_pluck() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(3, 16);
    let encoder = RecordingEncoder::default();

    let report = split_with(&segmenter, &encoder, ViolinString::A, tempdir.path());

    assert_eq!(report.sustain.exported().len(), 3);
    assert!(report.pluck.as_ref().unwrap().is_complete());
    assert_eq!(report.exported().len(), 11);
}

#[test]
fn test_pluck_shortfall() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(8, 13);
    let encoder = RecordingEncoder::default();

    let report = split_with(&segmenter, &encoder, ViolinString::D, tempdir.path());

    assert!(report.sustain.is_complete());
    match report.pluck.as_ref().unwrap() {
        BatchOutcome::Partial {
            exported,
            shortfall_index,
        } => {
            assert_eq!(exported.len(), 5);
            assert_eq!(*shortfall_index, 5);
        }
        other => panic!("unexpected pluck outcome {:?}", other),
    }
    assert!(report
        .warnings
        .iter()
        .any(|warning| warning.contains("found 13 segments")));
}

#[test]
fn test_export_failure_stops_run() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(8, 16);
    let encoder = RecordingEncoder::failing_on(3);

    let report = split_with(&segmenter, &encoder, ViolinString::E, tempdir.path());

    match &report.sustain {
        BatchOutcome::Failed { exported, error } => {
            assert_eq!(exported.len(), 3);
            assert!(matches!(error, SplitError::Export { .. }));
            assert!(error.to_string().contains("E_G_sustain.mp3"));
        }
        other => panic!("unexpected sustain outcome {:?}", other),
    }
    assert!(report.pluck.is_none());
    assert_eq!(encoder.exports().len(), 3);
}

#[test]
fn test_overlapping_pluck_warning() {
    let audio = silent_audio();
    // Sustain segments end at 750ms, the ninth pluck segment starts at 400ms.
    let batches = Batches {
        sustain: (0..8)
            .map(|i| audio.segment(i * 100, i * 100 + 50))
            .collect(),
        pluck: (0..16)
            .map(|i| audio.segment(i * 50, i * 50 + 25))
            .collect(),
    };
    let warnings = check_pluck_offset(&batches);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("before the last sustained note"));
}

#[test]
fn test_skip_and_truncate() {
    let batch: Vec<usize> = (0..17).collect();
    assert_eq!(
        skip_and_truncate(&batch, Classification::Sustain),
        &[0, 1, 2, 3, 4, 5, 6, 7]
    );
    assert_eq!(
        skip_and_truncate(&batch, Classification::Pluck),
        &[8, 9, 10, 11, 12, 13, 14, 15]
    );
    assert!(skip_and_truncate(&batch[..5], Classification::Pluck).is_empty());
}

#[test]
fn test_missing_input() {
    let tempdir = tempfile::tempdir().unwrap();
    let segmenter = FakeSegmenter::new(8, 16);
    let encoder = RecordingEncoder::default();
    let splitter = NoteSplitter::new(
        &segmenter,
        &encoder,
        SilenceProfile::SUSTAIN,
        SilenceProfile::PLUCK,
    );

    let result = splitter.run(&tempdir.path().join("missing.mp3"), ViolinString::G);
    assert!(matches!(result, Err(SplitError::InputNotFound(_))));
    assert_eq!(*segmenter.calls.borrow(), 0);
    assert!(!tempdir.path().join("sustain_audio").exists());
}

#[test]
fn test_split_file_checks_input_before_selection() {
    let tempdir = tempfile::tempdir().unwrap();
    let config = config::Splitter::default().with_base_dir(tempdir.path().to_str().unwrap());

    let result = split_file(&config, "missing.mp3", "7");
    assert!(matches!(result, Err(SplitError::InputNotFound(_))));
}

#[test]
fn test_split_file_invalid_selection_writes_nothing() {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::write(tempdir.path().join("g_string.mp3"), b"not decoded").unwrap();
    let config = config::Splitter::default().with_base_dir(tempdir.path().to_str().unwrap());

    for selection in ["4", "-1", "violin"] {
        let result = split_file(&config, "g_string.mp3", selection);
        assert!(matches!(result, Err(SplitError::InvalidSelection(_))));
    }

    let entries: Vec<_> = std::fs::read_dir(tempdir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_split_file_decode_error() {
    let tempdir = tempfile::tempdir().unwrap();
    std::fs::write(tempdir.path().join("broken.wav"), b"RIFF but not really").unwrap();
    let config = config::Splitter::default().with_base_dir(tempdir.path().to_str().unwrap());

    let result = split_file(&config, "broken.wav", "0");
    assert!(matches!(result, Err(SplitError::Decode(_))));
    assert!(!tempdir.path().join("sustain_audio").exists());
}

#[test]
fn test_split_file_empty_recording_writes_nothing() {
    let tempdir = tempfile::tempdir().unwrap();
    write_wav(tempdir.path().join("empty.wav"), &[], 1, 8000).unwrap();
    let config = config::Splitter::default().with_base_dir(tempdir.path().to_str().unwrap());

    let result = split_file(&config, "empty.wav", "0");
    assert!(matches!(
        result,
        Err(SplitError::Decode(AudioError::EmptyAudio(_)))
    ));
    assert!(!tempdir.path().join("sustain_audio").exists());
    assert!(!tempdir.path().join("pluck_audio").exists());
}

#[test]
fn test_split_wav_recording() {
    let tempdir = tempfile::tempdir().unwrap();

    // Eight bowed notes with long gaps, then eight plucks with short gaps.
    let sustained = bursts(8000, 500, &[800; 8], 1500, 0);
    let plucked = bursts(8000, 1500, &[150; 8], 500, 1500);
    let mut samples = to_i16(&sustained);
    samples.extend(to_i16(&plucked));
    write_wav(tempdir.path().join("e_string.wav"), &samples, 1, 8000).unwrap();

    let config = config::Splitter::default().with_base_dir(tempdir.path().to_str().unwrap());
    let report = split_file(&config, "e_string.wav", "0").unwrap();

    // The bowed notes and the pluck group are all the sustain pass sees.
    assert_eq!(report.sustain_found, 9);
    assert_eq!(report.pluck_found, 16);
    assert!(report.is_complete(), "{:?}", report);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);

    for name in expected_names(ViolinString::E, Classification::Sustain) {
        let path = tempdir
            .path()
            .join("sustain_audio")
            .join(name.replace(".mp3", ".wav"));
        assert!(path.is_file(), "{}", path.display());
    }
    for name in expected_names(ViolinString::E, Classification::Pluck) {
        let path = tempdir
            .path()
            .join("pluck_audio")
            .join(name.replace(".mp3", ".wav"));
        assert!(path.is_file(), "{}", path.display());
    }

    // A plucked clip is the 150ms note plus 100ms of silence either side.
    let clip = crate::audio::decode_file(tempdir.path().join("pluck_audio/E_F_pluck.wav")).unwrap();
    assert_eq!(clip.len_ms(), 350);

    // Running again overwrites the same files.
    let again = split_file(&config, "e_string.wav", "E").unwrap();
    assert_eq!(again.exported().len(), 16);
}
