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
//! Splits one recording into labelled note clips.
//!
//! A recording holds the eight notes of a string bowed, then the same eight
//! notes plucked. The sustain pass uses long gaps and a loose threshold and
//! keeps the first eight segments. The pluck pass uses short gaps and a strict
//! threshold; it finds the bowed notes again first, so its first eight segments
//! are skipped.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, span, Level};

use crate::audio::{self, DecodedAudio, Encoder, Segmenter, SilenceProfile, SilenceSplitter};
use crate::config;
use crate::notes::{ViolinString, NOTES_PER_STRING};

mod assign;
mod error;
mod extract;

#[cfg(test)]
mod tests;

pub use assign::{BatchOutcome, NoteAssigner};
pub use error::SplitError;
pub use extract::{check_pluck_offset, Batches, SegmentExtractor};

/// The number of leading pluck segments that repeat the sustained notes.
pub const PLUCK_SKIP: usize = NOTES_PER_STRING;

/// The articulation a clip was recorded with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Sustain,
    Pluck,
}

impl Classification {
    pub const ALL: [Classification; 2] = [Classification::Sustain, Classification::Pluck];

    /// The name used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            Classification::Sustain => "sustain",
            Classification::Pluck => "pluck",
        }
    }

    /// The directory, relative to the input file, that clips are written to.
    pub fn directory(&self) -> &'static str {
        match self {
            Classification::Sustain => "sustain_audio",
            Classification::Pluck => "pluck_audio",
        }
    }

    /// How many leading segments of this classification's batch are discarded.
    pub fn skip(&self) -> usize {
        match self {
            Classification::Sustain => 0,
            Classification::Pluck => PLUCK_SKIP,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The result of splitting one recording.
#[derive(Debug)]
pub struct SplitReport {
    pub string: ViolinString,
    pub input: PathBuf,
    /// The length of the decoded recording.
    pub duration: Duration,
    /// Segments found by the sustain pass, before truncation.
    pub sustain_found: usize,
    /// Segments found by the pluck pass, before the leading segments are skipped.
    pub pluck_found: usize,
    pub sustain: BatchOutcome,
    /// `None` when the sustain exports failed and the pluck exports were never attempted.
    pub pluck: Option<BatchOutcome>,
    /// Signs that the pluck notes may be shifted.
    pub warnings: Vec<String>,
}

impl SplitReport {
    /// All files written during the run.
    pub fn exported(&self) -> Vec<&Path> {
        self.sustain
            .exported()
            .iter()
            .chain(self.pluck.iter().flat_map(|pluck| pluck.exported().iter()))
            .map(PathBuf::as_path)
            .collect()
    }

    /// Returns the outcome for the given classification, if it was attempted.
    pub fn outcome(&self, classification: Classification) -> Option<&BatchOutcome> {
        match classification {
            Classification::Sustain => Some(&self.sustain),
            Classification::Pluck => self.pluck.as_ref(),
        }
    }

    /// True when every note of both classifications was exported.
    pub fn is_complete(&self) -> bool {
        self.sustain.is_complete() && self.pluck.as_ref().is_some_and(BatchOutcome::is_complete)
    }
}

/// Decodes, segments and exports one recording.
pub struct NoteSplitter<'a> {
    segmenter: &'a dyn Segmenter,
    encoder: &'a dyn Encoder,
    sustain: SilenceProfile,
    pluck: SilenceProfile,
}

impl<'a> NoteSplitter<'a> {
    pub fn new(
        segmenter: &'a dyn Segmenter,
        encoder: &'a dyn Encoder,
        sustain: SilenceProfile,
        pluck: SilenceProfile,
    ) -> NoteSplitter<'a> {
        NoteSplitter {
            segmenter,
            encoder,
            sustain,
            pluck,
        }
    }

    /// Splits the recording at `input`, writing clips next to it.
    pub fn run(&self, input: &Path, string: ViolinString) -> Result<SplitReport, SplitError> {
        if !input.is_file() {
            return Err(SplitError::InputNotFound(input.to_path_buf()));
        }

        let audio = audio::decode_file(input).map_err(SplitError::Decode)?;
        let output_root = input.parent().unwrap_or(Path::new("."));
        self.split(&audio, input, output_root, string)
    }

    /// Splits an already decoded recording, writing clips under `output_root`.
    ///
    /// Running out of sustain segments does not stop the pluck exports: each
    /// classification is exported on its own and reports its own shortfall.
    /// Only a failed export skips the pluck batch, leaving `SplitReport::pluck`
    /// empty.
    pub fn split(
        &self,
        audio: &DecodedAudio,
        input: &Path,
        output_root: &Path,
        string: ViolinString,
    ) -> Result<SplitReport, SplitError> {
        let span = span!(Level::INFO, "split notes", string = string.letter());
        let _enter = span.enter();

        let assigner = NoteAssigner::new(string, self.encoder, output_root);
        assigner.create_output_dirs()?;

        let batches =
            SegmentExtractor::new(self.segmenter, self.sustain, self.pluck).extract(audio);
        let warnings = check_pluck_offset(&batches);

        let sustain = assigner.assign(
            Classification::Sustain,
            skip_and_truncate(batches.get(Classification::Sustain), Classification::Sustain),
        );
        let pluck = if sustain.is_failed() {
            None
        } else {
            Some(assigner.assign(
                Classification::Pluck,
                skip_and_truncate(batches.get(Classification::Pluck), Classification::Pluck),
            ))
        };

        let report = SplitReport {
            string,
            input: input.to_path_buf(),
            duration: audio.duration(),
            sustain_found: batches.sustain.len(),
            pluck_found: batches.pluck.len(),
            sustain,
            pluck,
            warnings,
        };
        info!(
            exported = report.exported().len(),
            complete = report.is_complete(),
            "Finished splitting"
        );
        Ok(report)
    }
}

/// Drops the leading duplicates of a batch and keeps at most one segment per note.
fn skip_and_truncate<'b, T>(batch: &'b [T], classification: Classification) -> &'b [T] {
    let rest = batch.get(classification.skip()..).unwrap_or(&[]);
    &rest[..rest.len().min(NOTES_PER_STRING)]
}

/// Resolves a file name against the base directory.
pub fn resolve_input(base_dir: &Path, filename: &str) -> Result<PathBuf, SplitError> {
    let path = base_dir.join(filename.trim());
    if path.is_file() {
        Ok(path)
    } else {
        Err(SplitError::InputNotFound(path))
    }
}

/// Splits the named file using the given configuration. The file is checked
/// before the string selection, and both are checked before anything is
/// decoded or written.
pub fn split_file(
    config: &config::Splitter,
    filename: &str,
    selection: &str,
) -> Result<SplitReport, SplitError> {
    let input = resolve_input(&config.base_dir(), filename)?;
    let string: ViolinString = selection.parse()?;

    let sustain = config.sustain()?;
    let pluck = config.pluck()?;
    let encoder = audio::encoder_for(&input, config.ffmpeg()).map_err(SplitError::Encoder)?;

    NoteSplitter::new(&SilenceSplitter, encoder.as_ref(), sustain, pluck).run(&input, string)
}
