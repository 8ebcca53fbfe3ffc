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
use serde::Deserialize;

const DEFAULT_FFMPEG: &str = "ffmpeg";

/// A YAML representation of the ffmpeg encoder configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Ffmpeg {
    /// Path to the ffmpeg binary, or a name to look up on the PATH (default: "ffmpeg").
    path: Option<String>,

    /// The MP3 bitrate passed to ffmpeg, e.g. "192k". Uses ffmpeg's default when unset.
    bitrate: Option<String>,
}

impl Ffmpeg {
    /// New will create a new ffmpeg configuration.
    pub fn new(path: &str, bitrate: Option<String>) -> Ffmpeg {
        Ffmpeg {
            path: Some(path.to_string()),
            bitrate,
        }
    }

    /// Returns the configured binary path or name.
    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(DEFAULT_FFMPEG)
    }

    /// Returns the configured bitrate.
    pub fn bitrate(&self) -> Option<&str> {
        self.bitrate.as_deref()
    }
}
