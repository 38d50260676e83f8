//! Chord-name parsing.

use super::pitch::{note_name_to_pitch, MAX_PITCH};
use crate::error::{MonkError, Result};

/// Chord quality -> semitone offsets from the root.
const CHORD_INTERVALS: &[(&str, &[i32])] = &[
    ("", &[0, 4, 7]),
    ("maj", &[0, 4, 7]),
    ("m", &[0, 3, 7]),
    ("min", &[0, 3, 7]),
    ("7", &[0, 4, 7, 10]),
    ("maj7", &[0, 4, 7, 11]),
    ("m7", &[0, 3, 7, 10]),
    ("min7", &[0, 3, 7, 10]),
    ("dim", &[0, 3, 6]),
    ("dim7", &[0, 3, 6, 9]),
    ("aug", &[0, 4, 8]),
    ("sus2", &[0, 2, 7]),
    ("sus4", &[0, 5, 7]),
    ("add9", &[0, 4, 7, 14]),
    ("9", &[0, 4, 7, 10, 14]),
];

/// Look up the interval list for a chord quality suffix (case-sensitive).
pub fn chord_intervals(quality: &str) -> Option<&'static [i32]> {
    CHORD_INTERVALS
        .iter()
        .find(|(name, _)| *name == quality)
        .map(|(_, intervals)| *intervals)
}

/// All recognised quality suffixes, in table order.
pub fn chord_qualities() -> impl Iterator<Item = &'static str> {
    CHORD_INTERVALS.iter().map(|(name, _)| *name)
}

/// Split a chord name into root and quality suffix.
fn split_chord(name: &str) -> Option<(&str, &str)> {
    let mut indices = name.char_indices();
    indices.next()?;
    let split = match indices.next() {
        Some((i, c)) if c == '#' || c == 'b' => i + c.len_utf8(),
        Some((i, _)) => i,
        None => name.len(),
    };
    Some(name.split_at(split))
}

/// Parse a chord name like "Cmaj7", "Dm" or "F#7" into MIDI pitches.
///
/// The root is placed in `octave` and each interval is added to it.
///
/// # Errors
/// * `MalformedNoteName` - the root is not a valid note letter
/// * `UnknownChordQuality` - the suffix is not in the interval table
/// * `PitchOutOfRange` - the root or an upper chord tone exceeds 0-127
pub fn parse_chord(name: &str, octave: i32) -> Result<Vec<u8>> {
    let chord = name.trim();
    let (root, quality) = split_chord(chord).ok_or_else(|| MonkError::MalformedNoteName {
        name: name.to_string(),
    })?;

    let root_pitch = i32::from(note_name_to_pitch(&format!("{}{}", root, octave))?);

    let intervals = chord_intervals(quality).ok_or_else(|| MonkError::UnknownChordQuality {
        quality: quality.to_string(),
        chord: chord.to_string(),
    })?;

    intervals
        .iter()
        .map(|interval| {
            let pitch = root_pitch + interval;
            if pitch > MAX_PITCH {
                Err(MonkError::PitchOutOfRange { pitch })
            } else {
                Ok(pitch as u8)
            }
        })
        .collect()
}
