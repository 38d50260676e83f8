//! Project Module
//!
//! In-memory model of a Reaper project (`.rpp`) plus the codec that reads
//! and regenerates its hierarchical text format.
//!
//! Reading builds a generic block tree and extracts only what the model
//! knows about: tempo, time signature, sample rate, render target, tracks
//! and their placed MIDI items. Writing always regenerates the whole file
//! from the model, so anything not modeled is dropped on a load -> save
//! cycle.

mod ids;
mod model;
mod parser;
mod writer;

pub use ids::{format_guid, parse_guid, IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use model::{
    PlacedItem, Project, TimeSignature, Track, DEFAULT_RENDER_FILE, DEFAULT_SAMPLE_RATE,
    DEFAULT_TEMPO,
};
pub use parser::{parse_blocks, Block, Directive};
