//! Note list -> Standard MIDI File encoder.
//!
//! Notes are expanded into absolute-tick on/off events, sorted, and then
//! re-expressed as delta-times in a single format-0 track that opens with
//! a tempo meta-event and closes with end-of-track.

use std::fs;
use std::path::Path;

use log::{debug, info};
use midly::num::{u15, u24, u28, u4, u7};
use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind};

use super::note::Note;
use crate::error::{MonkError, Result};

/// Standard ticks per beat.
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

const MAX_TICKS_PER_BEAT: u16 = 0x7FFF;
const MAX_DELTA: u64 = 0x0FFF_FFFF;
const MAX_TEMPO_MICROS: f64 = 0x00FF_FFFF as f64;
const CHANNEL: u8 = 0;

/// Event kinds in sort order: at the same tick an off always precedes an on,
/// so a repeated pitch is released before it is struck again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Off,
    On,
}

#[derive(Debug, Clone, Copy)]
struct NoteEvent {
    tick: u64,
    kind: EventKind,
    pitch: u8,
    velocity: u8,
}

impl NoteEvent {
    fn message(&self) -> MidiMessage {
        match self.kind {
            EventKind::On => MidiMessage::NoteOn {
                key: u7::new(self.pitch),
                vel: u7::new(self.velocity),
            },
            EventKind::Off => MidiMessage::NoteOff {
                key: u7::new(self.pitch),
                vel: u7::new(0),
            },
        }
    }
}

/// Encodes beat-timed notes into SMF bytes at a fixed tick resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEventEncoder {
    ticks_per_beat: u16,
}

impl Default for NoteEventEncoder {
    fn default() -> Self {
        Self {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
        }
    }
}

impl NoteEventEncoder {
    /// Create an encoder with the given resolution (1..=32767 ticks per beat).
    pub fn new(ticks_per_beat: u16) -> Result<Self> {
        if ticks_per_beat == 0 || ticks_per_beat > MAX_TICKS_PER_BEAT {
            return Err(MonkError::InvalidTicksPerBeat {
                value: u32::from(ticks_per_beat),
            });
        }
        Ok(Self { ticks_per_beat })
    }

    /// Tick resolution declared in the file header.
    pub fn ticks_per_beat(&self) -> u16 {
        self.ticks_per_beat
    }

    /// Microseconds per beat for a tempo, clamped to the 24-bit meta field.
    pub fn tempo_micros(tempo_bpm: f64) -> Result<u32> {
        if !tempo_bpm.is_finite() || tempo_bpm <= 0.0 {
            return Err(MonkError::InvalidTempo { bpm: tempo_bpm });
        }
        Ok((60_000_000.0 / tempo_bpm).round().clamp(1.0, MAX_TEMPO_MICROS) as u32)
    }

    /// Expand notes into on/off events sorted by (tick, off-before-on).
    fn schedule(&self, notes: &[Note]) -> Result<Vec<NoteEvent>> {
        let mut events = Vec::with_capacity(notes.len() * 2);
        for note in notes {
            note.validate()?;
            let start = note.start_ticks(self.ticks_per_beat);
            let end = note.end_ticks(self.ticks_per_beat)?;
            events.push(NoteEvent {
                tick: start,
                kind: EventKind::On,
                pitch: note.pitch,
                velocity: note.velocity,
            });
            events.push(NoteEvent {
                tick: end,
                kind: EventKind::Off,
                pitch: note.pitch,
                velocity: 0,
            });
        }

        // Stable, so simultaneous events of one kind keep input order.
        events.sort_by_key(|e| (e.tick, e.kind));
        Ok(events)
    }

    /// Encode notes to an in-memory Standard MIDI File.
    ///
    /// An empty note list yields a valid silent file: header, tempo and
    /// end-of-track only.
    pub fn encode(&self, notes: &[Note], tempo_bpm: f64) -> Result<Vec<u8>> {
        let tempo = Self::tempo_micros(tempo_bpm)?;
        let events = self.schedule(notes)?;

        let mut track: Vec<TrackEvent<'static>> = Vec::with_capacity(events.len() + 2);
        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo))),
        });

        let mut previous_tick = 0_u64;
        for event in &events {
            let delta = event.tick - previous_tick;
            if delta > MAX_DELTA {
                return Err(MonkError::TickOverflow { tick: event.tick });
            }
            track.push(TrackEvent {
                delta: u28::new(delta as u32),
                kind: TrackEventKind::Midi {
                    channel: u4::new(CHANNEL),
                    message: event.message(),
                },
            });
            previous_tick = event.tick;
        }

        track.push(TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        });

        let mut smf = Smf::new(Header::new(
            Format::SingleTrack,
            Timing::Metrical(u15::new(self.ticks_per_beat)),
        ));
        smf.tracks.push(track);

        let mut bytes = Vec::new();
        smf.write_std(&mut bytes)?;

        debug!(
            "Encoded {} notes ({} events) at {} BPM, {} ticks/beat",
            notes.len(),
            events.len(),
            tempo_bpm,
            self.ticks_per_beat
        );
        Ok(bytes)
    }

    /// Encode notes and write them to `path`, creating parent directories.
    pub fn write_file(&self, path: &Path, notes: &[Note], tempo_bpm: f64) -> Result<()> {
        let bytes = self.encode(notes, tempo_bpm)?;
        Self::write_encoded(path, &bytes)?;
        info!("Wrote {} ({} notes)", path.display(), notes.len());
        Ok(())
    }

    /// Write bytes from [`encode`](Self::encode) to `path`, creating parent
    /// directories.
    pub fn write_encoded(path: &Path, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| MonkError::FileWriteError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        fs::write(path, bytes).map_err(|e| MonkError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
