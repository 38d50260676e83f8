//! Monk - Music Intent to MIDI and Reaper Projects
//!
//! Monk turns musical intent (note lists, chord names, drum hits) into
//! Standard MIDI Files and places them on tracks of a Reaper project.
//!
//! # Architecture
//!
//! - [`theory`]: note names, pitches and chord spelling
//! - [`midi`]: notes to MIDI bytes, and MIDI files back to notes and durations
//! - [`patterns`]: melody, chord progression and drum pattern generators
//! - [`project`]: Reaper project model, tolerant parser and regenerating writer
//! - [`session`]: operations over a project directory, saving after each change
//!
//! Rendering audio and playing it back are left to external tools.

pub mod cli;
pub mod config;
pub mod error;
pub mod midi;
pub mod patterns;
pub mod project;
pub mod session;
pub mod theory;

pub use config::MonkConfig;
pub use error::{ErrorKind, MonkError, Result};
pub use midi::{Note, NoteEventEncoder};
pub use patterns::{ChordProgression, DrumPattern};
pub use project::{PlacedItem, Project, Track};
pub use session::{Session, ToolReport};
