//! Pattern Generators
//!
//! Build note lists for melodies, chord progressions and drum patterns,
//! then hand them to the encoder to materialize MIDI files. Every
//! generator validates its whole input before a file is touched.

mod drums;
mod progression;

use std::path::Path;

use crate::error::Result;
use crate::midi::{Note, NoteEventEncoder};

pub use drums::{
    drum_names, drum_pitch, DrumLane, DrumPattern, BEATS_PER_BAR, DRUM_HIT_BEATS, GM_DRUMS,
};
pub use progression::{ChordProgression, CHORD_GAP_BEATS};

/// Melody passthrough: validate the notes and return them unchanged.
pub fn melody(notes: &[Note]) -> Result<Vec<Note>> {
    notes.iter().try_for_each(Note::validate)?;
    Ok(notes.to_vec())
}

/// Write an arbitrary note list to `path`.
pub fn create_midi_file(
    encoder: &NoteEventEncoder,
    path: &Path,
    notes: &[Note],
    tempo_bpm: f64,
) -> Result<usize> {
    let notes = melody(notes)?;
    encoder.write_file(path, &notes, tempo_bpm)?;
    Ok(notes.len())
}

/// Write a chord progression to `path`.
pub fn create_chord_progression(
    encoder: &NoteEventEncoder,
    path: &Path,
    progression: &ChordProgression,
    tempo_bpm: f64,
) -> Result<usize> {
    let notes = progression.notes()?;
    encoder.write_file(path, &notes, tempo_bpm)?;
    Ok(notes.len())
}

/// Write a drum pattern to `path`.
pub fn create_drum_pattern(
    encoder: &NoteEventEncoder,
    path: &Path,
    pattern: &DrumPattern,
    tempo_bpm: f64,
) -> Result<usize> {
    let notes = pattern.notes()?;
    encoder.write_file(path, &notes, tempo_bpm)?;
    Ok(notes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonkError;
    use crate::midi::decode_notes;
    use std::fs;

    #[test]
    fn test_melody_passthrough() {
        let notes = vec![
            Note::new(60, 0.0, 1.0, 100).unwrap(),
            Note::new(62, 1.0, 1.0, 90).unwrap(),
        ];
        assert_eq!(melody(&notes).unwrap(), notes);
    }

    #[test]
    fn test_melody_rejects_bad_note() {
        let notes = vec![Note {
            pitch: 60,
            start_beat: 0.0,
            duration_beats: 0.0,
            velocity: 100,
        }];
        assert!(matches!(
            melody(&notes),
            Err(MonkError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_unknown_drum_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drums.mid");
        let pattern = DrumPattern::new(2)
            .hit("kick", vec![0.0, 2.0])
            .hit("cowbell", vec![1.0]);

        let err = create_drum_pattern(&NoteEventEncoder::default(), &path, &pattern, 120.0)
            .unwrap_err();
        assert!(matches!(err, MonkError::UnknownDrumName { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_chord_progression_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chords.mid");
        let progression = ChordProgression::new(vec!["Dm7".into(), "G7".into(), "Cmaj7".into()]);

        let count =
            create_chord_progression(&NoteEventEncoder::default(), &path, &progression, 90.0)
                .unwrap();
        assert_eq!(count, 12);

        let decoded = decode_notes(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(decoded.notes.len(), 12);
        assert!(decoded.notes.iter().all(|n| n.velocity == 80));
    }
}
