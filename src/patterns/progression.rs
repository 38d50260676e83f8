//! Block-chord progressions.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::midi::Note;
use crate::theory::parse_chord;

/// Silence left before the next chord so successive chords do not bleed.
pub const CHORD_GAP_BEATS: f64 = 0.1;

fn default_beats_per_chord() -> f64 {
    4.0
}

fn default_octave() -> i32 {
    4
}

fn default_velocity() -> u8 {
    80
}

/// A sequence of chord names played as block chords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChordProgression {
    /// Chord names like "Dm7", "G7", "Cmaj7"
    pub chords: Vec<String>,
    /// Beats each chord occupies
    #[serde(default = "default_beats_per_chord")]
    pub beats_per_chord: f64,
    /// Octave of each chord root
    #[serde(default = "default_octave")]
    pub octave: i32,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

impl ChordProgression {
    /// One bar per chord, roots in octave 4, velocity 80.
    pub fn new(chords: Vec<String>) -> Self {
        Self {
            chords,
            beats_per_chord: default_beats_per_chord(),
            octave: default_octave(),
            velocity: default_velocity(),
        }
    }

    pub fn with_beats_per_chord(mut self, beats: f64) -> Self {
        self.beats_per_chord = beats;
        self
    }

    pub fn with_octave(mut self, octave: i32) -> Self {
        self.octave = octave;
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    /// Expand into notes: chord `i` starts at `i * beats_per_chord` and
    /// holds for `beats_per_chord - CHORD_GAP_BEATS`.
    ///
    /// Fails on the first chord that does not parse, before any note is
    /// returned. A `beats_per_chord` at or below the gap leaves no room
    /// for the chord and fails with `InvalidDuration`.
    pub fn notes(&self) -> Result<Vec<Note>> {
        let duration = self.beats_per_chord - CHORD_GAP_BEATS;
        let mut notes = Vec::new();

        for (i, chord) in self.chords.iter().enumerate() {
            let start = i as f64 * self.beats_per_chord;
            for pitch in parse_chord(chord, self.octave)? {
                notes.push(Note::new(pitch, start, duration, self.velocity)?);
            }
        }

        Ok(notes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonkError;
    use approx::assert_relative_eq;

    #[test]
    fn test_chords_stack_at_same_start() {
        let notes = ChordProgression::new(vec!["C".into(), "Am".into()])
            .notes()
            .unwrap();
        assert_eq!(notes.len(), 6);

        let pitches: Vec<u8> = notes.iter().map(|n| n.pitch).collect();
        assert_eq!(pitches, vec![60, 64, 67, 69, 72, 76]);

        assert!(notes[..3].iter().all(|n| n.start_beat == 0.0));
        assert!(notes[3..].iter().all(|n| n.start_beat == 4.0));
        for note in &notes {
            assert_relative_eq!(note.duration_beats, 3.9);
            assert_eq!(note.velocity, 80);
        }
    }

    #[test]
    fn test_custom_length_and_octave() {
        let notes = ChordProgression::new(vec!["Dm".into(), "G".into()])
            .with_beats_per_chord(2.0)
            .with_octave(3)
            .with_velocity(64)
            .notes()
            .unwrap();
        assert_eq!(notes[0].pitch, 50);
        assert_eq!(notes[3].start_beat, 2.0);
        assert_relative_eq!(notes[3].duration_beats, 1.9);
        assert_eq!(notes[3].velocity, 64);
    }

    #[test]
    fn test_bad_chord_fails_whole_progression() {
        let result = ChordProgression::new(vec!["C".into(), "Cwhat".into()]).notes();
        assert!(matches!(
            result,
            Err(MonkError::UnknownChordQuality { .. })
        ));
    }

    #[test]
    fn test_too_short_chord_rejected() {
        let result = ChordProgression::new(vec!["C".into()])
            .with_beats_per_chord(0.1)
            .notes();
        assert!(matches!(result, Err(MonkError::InvalidDuration { .. })));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let progression: ChordProgression =
            serde_json::from_str(r#"{"chords": ["Am", "F"]}"#).unwrap();
        assert_eq!(progression, ChordProgression::new(vec!["Am".into(), "F".into()]));
    }
}
