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
use std::path::Path;

pub mod error;
mod ffmpeg;
mod profile;
mod splitter;

pub use self::error::ConfigError;
pub use self::ffmpeg::Ffmpeg;
pub use self::profile::Pass;
pub use self::splitter::Splitter;

/// Loads the splitter configuration. Without a path the defaults are used.
pub fn load(path: Option<&Path>) -> Result<Splitter, ConfigError> {
    match path {
        Some(path) => Splitter::deserialize(path),
        None => Ok(Splitter::default()),
    }
}
