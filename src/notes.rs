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
//! The fixed note table for the four violin strings.

use std::{fmt, str::FromStr};

/// The number of notes recorded per string.
pub const NOTES_PER_STRING: usize = 8;

/// A violin string. Each string owns an ordered run of eight semitones starting
/// at its open note.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViolinString {
    E,
    A,
    D,
    G,
}

impl ViolinString {
    /// All strings in selector order (0 = E, 1 = A, 2 = D, 3 = G).
    pub const ALL: [ViolinString; 4] = [
        ViolinString::E,
        ViolinString::A,
        ViolinString::D,
        ViolinString::G,
    ];

    /// The letter used as the filename prefix.
    pub fn letter(&self) -> &'static str {
        match self {
            ViolinString::E => "E",
            ViolinString::A => "A",
            ViolinString::D => "D",
            ViolinString::G => "G",
        }
    }

    /// The numeric selector for this string.
    pub fn index(&self) -> usize {
        match self {
            ViolinString::E => 0,
            ViolinString::A => 1,
            ViolinString::D => 2,
            ViolinString::G => 3,
        }
    }

    /// The notes recorded on this string, in recording order.
    pub fn notes(&self) -> &'static [&'static str; NOTES_PER_STRING] {
        match self {
            ViolinString::E => &["E", "F", "F#/Gb", "G", "G#/Ab", "A", "A#/Bb", "B"],
            ViolinString::A => &["A", "A#/Bb", "B", "C", "C#/Db", "D", "D#/Eb", "E"],
            ViolinString::D => &["D", "D#/Eb", "E", "F", "F#/Gb", "G", "G#/Ab", "A"],
            ViolinString::G => &["G", "G#/Ab", "A", "A#/Bb", "B", "C", "C#/Db", "D"],
        }
    }
}

impl fmt::Display for ViolinString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} string", self.letter())
    }
}

/// Returned when a string selector is outside the known strings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid string selection '{0}', expected a number between 0 and 3 or one of E, A, D, G")]
pub struct InvalidStringError(pub String);

impl TryFrom<i64> for ViolinString {
    type Error = InvalidStringError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        usize::try_from(index)
            .ok()
            .and_then(|index| ViolinString::ALL.get(index).copied())
            .ok_or_else(|| InvalidStringError(index.to_string()))
    }
}

impl FromStr for ViolinString {
    type Err = InvalidStringError;

    /// Accepts either the numeric selector or the string letter (case insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return ViolinString::try_from(index);
        }

        ViolinString::ALL
            .iter()
            .find(|string| string.letter().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| InvalidStringError(trimmed.to_string()))
    }
}

/// Turns a note name into a token that is safe to use in a file name.
/// Slashes become underscores and sharps become an `s`, so `F#/Gb` is `Fs_Gb`.
pub fn sanitize(note: &str) -> String {
    note.chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            '#' => 's',
            c => c,
        })
        .collect()
}
