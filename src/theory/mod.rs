//! Chord Theory Module
//!
//! Note-name and pitch-number conversion plus chord-name parsing.
//! Pitches follow the MIDI convention where C4 = 60 (middle C).

mod chord;
mod pitch;

pub use chord::{chord_intervals, chord_qualities, parse_chord};
pub use pitch::{note_name_to_pitch, pitch_to_note_name, MAX_PITCH, NOTE_NAMES};
