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
//! Splits a recording of one violin string into labelled note clips.
//!
//! The recording is decoded once and cut on silence twice: a lenient pass for
//! the bowed (sustain) notes and a strict pass for the plucked notes. Segments
//! are named after the string's notes in recording order and written beside
//! the input file.

pub mod audio;
pub mod config;
pub mod notes;
pub mod splitter;
pub mod util;

#[cfg(test)]
mod testutil;
