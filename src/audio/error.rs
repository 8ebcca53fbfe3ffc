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

/// Error types for decoding and encoding audio.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Audio file error: {0}")]
    Symphonia(#[from] symphonia::core::errors::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No audio track found in {0}")]
    NoAudioTrack(PathBuf),

    #[error("No audio frames could be decoded from {0}")]
    EmptyAudio(PathBuf),

    #[error("Sample rate not specified in {0}")]
    MissingSampleRate(PathBuf),

    #[error("Encoder binary '{0}' could not be found")]
    EncoderNotFound(String),

    #[error("Encoder exited with {status}: {stderr}")]
    EncoderFailed { status: String, stderr: String },

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}
