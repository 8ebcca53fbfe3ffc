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
use std::time::Duration;

use duration_string::DurationString;
use serde::Deserialize;

use super::error::ConfigError;
use crate::audio::SilenceProfile;

/// Overrides for one silence detection pass. Unset values fall back to the
/// pass defaults.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Pass {
    /// The shortest gap that splits two notes, e.g. "1000ms" or "1s".
    min_silence: Option<String>,

    /// The silence threshold in dBFS.
    threshold_db: Option<f64>,

    /// How much silence to keep around each note, e.g. "500ms".
    keep_silence: Option<String>,
}

impl Pass {
    /// Resolves this pass against the given defaults.
    pub fn profile(&self, defaults: SilenceProfile) -> Result<SilenceProfile, ConfigError> {
        Ok(SilenceProfile {
            min_silence: parse_duration(&self.min_silence, defaults.min_silence)?,
            threshold_db: self.threshold_db.unwrap_or(defaults.threshold_db),
            keep_silence: parse_duration(&self.keep_silence, defaults.keep_silence)?,
        })
    }
}

fn parse_duration(value: &Option<String>, default: Duration) -> Result<Duration, ConfigError> {
    match value {
        Some(value) => Ok(DurationString::from_string(value.clone())?.into()),
        None => Ok(default),
    }
}
