//! MIDI Module
//!
//! Standard MIDI File generation and inspection:
//! - `Note` - a validated, beat-timed note
//! - `NoteEventEncoder` - notes -> time-ordered, delta-encoded SMF bytes
//! - `decode_notes` / `read_duration` - the inverse direction, used for
//!   round-trip checks and for sizing placed items

mod decoder;
mod encoder;
mod note;

pub use decoder::{decode_notes, file_duration, read_duration, DecodedMidi, DecodedNote};
pub use encoder::{NoteEventEncoder, DEFAULT_TICKS_PER_BEAT};
pub use note::{Note, DEFAULT_VELOCITY};
