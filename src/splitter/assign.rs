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
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use super::error::SplitError;
use super::Classification;
use crate::audio::{AudioSegment, Encoder};
use crate::notes::{sanitize, ViolinString};

/// What happened to one classification's exports.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every note of the string was exported.
    Complete { exported: Vec<PathBuf> },
    /// The batch ran out of segments before the last note.
    Partial {
        exported: Vec<PathBuf>,
        shortfall_index: usize,
    },
    /// Writing a clip failed. Clips written before the failure remain on disk.
    Failed {
        exported: Vec<PathBuf>,
        error: SplitError,
    },
}

impl BatchOutcome {
    /// The files written for this batch.
    pub fn exported(&self) -> &[PathBuf] {
        match self {
            BatchOutcome::Complete { exported }
            | BatchOutcome::Partial { exported, .. }
            | BatchOutcome::Failed { exported, .. } => exported,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, BatchOutcome::Complete { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }
}

/// Names segments after the notes of a string and writes them out.
pub struct NoteAssigner<'e> {
    string: ViolinString,
    encoder: &'e dyn Encoder,
    output_root: PathBuf,
}

impl<'e> NoteAssigner<'e> {
    /// Creates an assigner that writes into subdirectories of `output_root`.
    pub fn new(string: ViolinString, encoder: &'e dyn Encoder, output_root: &Path) -> Self {
        NoteAssigner {
            string,
            encoder,
            output_root: output_root.to_path_buf(),
        }
    }

    /// The directory clips of the given classification are written to.
    pub fn output_dir(&self, classification: Classification) -> PathBuf {
        self.output_root.join(classification.directory())
    }

    /// Creates both output directories if they don't already exist.
    pub fn create_output_dirs(&self) -> Result<(), SplitError> {
        for classification in Classification::ALL {
            std::fs::create_dir_all(self.output_dir(classification))?;
        }
        Ok(())
    }

    /// The file a note of the given classification is written to,
    /// e.g. `sustain_audio/E_Fs_Gb_sustain.mp3`.
    pub fn export_target(&self, classification: Classification, note: &str) -> PathBuf {
        self.output_dir(classification).join(format!(
            "{}_{}_{}.{}",
            self.string.letter(),
            sanitize(note),
            classification.name(),
            self.encoder.extension()
        ))
    }

    /// Pairs the segments with the string's notes in order and exports each one.
    /// The segments must already have any leading duplicates removed.
    pub fn assign(
        &self,
        classification: Classification,
        segments: &[AudioSegment<'_>],
    ) -> BatchOutcome {
        let mut exported = Vec::new();

        for (i, note) in self.string.notes().iter().enumerate() {
            let Some(segment) = segments.get(i) else {
                warn!(
                    classification = classification.name(),
                    index = i,
                    "Ran out of segments"
                );
                return BatchOutcome::Partial {
                    exported,
                    shortfall_index: i,
                };
            };

            let path = self.export_target(classification, note);
            if let Err(e) = self.encoder.encode(segment, &path) {
                error!(path = ?path, err = %e, "Error exporting clip");
                return BatchOutcome::Failed {
                    exported,
                    error: SplitError::Export { path, source: e },
                };
            }

            info!(
                path = ?path,
                note = *note,
                start_ms = segment.start_ms(),
                duration = ?segment.duration(),
                "Exported clip"
            );
            exported.push(path);
        }

        BatchOutcome::Complete { exported }
    }
}
