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
use std::fmt;
use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::Deserialize;

use super::error::ConfigError;
use super::ffmpeg::Ffmpeg;
use super::profile::Pass;
use crate::audio::SilenceProfile;

/// The configuration for the note splitter.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Splitter {
    /// The directory audio file names are resolved against (default: the current directory).
    base_dir: Option<String>,

    /// The MP3 encoder configuration.
    #[serde(default)]
    ffmpeg: Ffmpeg,

    /// Overrides for the sustain pass.
    #[serde(default)]
    sustain: Pass,

    /// Overrides for the pluck pass.
    #[serde(default)]
    pluck: Pass,
}

impl Splitter {
    /// Parse the splitter configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Splitter, ConfigError> {
        Ok(Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Splitter>()?)
    }

    /// Returns the base directory for input files.
    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(self.base_dir.as_deref().unwrap_or("."))
    }

    /// Overrides the base directory.
    pub fn with_base_dir(mut self, base_dir: &str) -> Splitter {
        self.base_dir = Some(base_dir.to_string());
        self
    }

    /// Returns the ffmpeg configuration.
    pub fn ffmpeg(&self) -> &Ffmpeg {
        &self.ffmpeg
    }

    /// Returns the resolved sustain pass.
    pub fn sustain(&self) -> Result<SilenceProfile, ConfigError> {
        self.sustain.profile(SilenceProfile::SUSTAIN)
    }

    /// Returns the resolved pluck pass.
    pub fn pluck(&self) -> Result<SilenceProfile, ConfigError> {
        self.pluck.profile(SilenceProfile::PLUCK)
    }
}

impl fmt::Display for Splitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Base directory: {}", self.base_dir().display())?;
        writeln!(f, "ffmpeg: {}", self.ffmpeg.path())?;
        if let Some(bitrate) = self.ffmpeg.bitrate() {
            writeln!(f, "Bitrate: {}", bitrate)?;
        }
        for (name, profile) in [("Sustain", self.sustain()), ("Pluck", self.pluck())] {
            match profile {
                Ok(profile) => writeln!(
                    f,
                    "{} pass: min silence {:?}, threshold {}dBFS, keep silence {:?}",
                    name, profile.min_silence, profile.threshold_db, profile.keep_silence
                )?,
                Err(e) => writeln!(f, "{} pass: {}", name, e)?,
            }
        }
        Ok(())
    }
}
