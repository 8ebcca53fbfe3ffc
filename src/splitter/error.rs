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
use std::path::PathBuf;

use crate::audio::AudioError;
use crate::config::ConfigError;
use crate::notes::InvalidStringError;

/// Errors that end a split run before all clips are exported.
#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("File '{0}' not found")]
    InputNotFound(PathBuf),

    #[error("{0}")]
    InvalidSelection(#[from] InvalidStringError),

    #[error("Unable to decode audio: {0}")]
    Decode(#[source] AudioError),

    #[error("Unable to set up encoder: {0}")]
    Encoder(#[source] AudioError),

    #[error("Unable to export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: AudioError,
    },

    #[error("Unable to create output directory: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
