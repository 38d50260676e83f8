//! Note name <-> MIDI pitch conversion.

use crate::error::{MonkError, Result};

/// Highest valid MIDI pitch.
pub const MAX_PITCH: i32 = 127;

/// Sharp-spelled pitch classes, indexed by semitone above C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Pitch class of a natural note letter (case-insensitive).
fn letter_pitch_class(letter: char) -> Option<i32> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Convert a note name like "C4", "F#3" or "Bb5" to a MIDI pitch.
///
/// The accidental moves the pitch class by one semitone modulo 12 and
/// leaves the written octave alone, so "Cb4" is 71 and "B#4" is 60.
///
/// # Errors
/// * `MalformedNoteName` - letter or octave cannot be parsed
/// * `PitchOutOfRange` - result falls outside 0-127
pub fn note_name_to_pitch(name: &str) -> Result<u8> {
    let trimmed = name.trim();
    let malformed = || MonkError::MalformedNoteName {
        name: name.to_string(),
    };

    let mut chars = trimmed.chars();
    let letter = chars.next().ok_or_else(malformed)?;
    let mut pitch_class = letter_pitch_class(letter).ok_or_else(malformed)?;

    let mut rest = chars.as_str();
    if let Some(stripped) = rest.strip_prefix('#') {
        pitch_class = (pitch_class + 1).rem_euclid(12);
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('b') {
        pitch_class = (pitch_class - 1).rem_euclid(12);
        rest = stripped;
    }

    let octave: i32 = rest.parse().map_err(|_| malformed())?;
    let pitch = octave
        .checked_add(1)
        .and_then(|o| o.checked_mul(12))
        .and_then(|base| base.checked_add(pitch_class))
        .ok_or(MonkError::PitchOutOfRange { pitch: i32::MAX })?;

    if !(0..=MAX_PITCH).contains(&pitch) {
        return Err(MonkError::PitchOutOfRange { pitch });
    }

    Ok(pitch as u8)
}

/// Convert a MIDI pitch to a sharp-spelled note name like "C#4".
pub fn pitch_to_note_name(pitch: u8) -> String {
    let octave = i32::from(pitch / 12) - 1;
    format!("{}{}", NOTE_NAMES[usize::from(pitch % 12)], octave)
}
