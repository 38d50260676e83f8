//! Standard MIDI File inspection: total duration and note recovery.

use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::Path;

use log::debug;
use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use crate::error::{MonkError, Result};

/// Tempo assumed before the first tempo meta-event (120 BPM).
const DEFAULT_TEMPO_MICROS: u32 = 500_000;

/// A note recovered from a MIDI file, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodedNote {
    pub start_tick: u64,
    pub pitch: u8,
    pub duration_ticks: u64,
    pub velocity: u8,
}

/// Contents of a decoded MIDI file.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedMidi {
    /// Ticks per beat, `None` for timecode-based files
    pub ticks_per_beat: Option<u16>,
    /// First tempo meta-event, if any
    pub tempo_micros: Option<u32>,
    /// Notes ordered by start tick, then pitch
    pub notes: Vec<DecodedNote>,
}

fn parse<'a>(bytes: &'a [u8], path: &Path) -> Result<Smf<'a>> {
    Smf::parse(bytes).map_err(|e| MonkError::DecodeError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(MonkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read(path).map_err(|e| MonkError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Tempo changes from every track as (absolute tick, micros per beat).
fn tempo_map(smf: &Smf) -> Vec<(u64, u32)> {
    let mut changes = Vec::new();
    for track in &smf.tracks {
        let mut tick = 0_u64;
        for event in track {
            tick += u64::from(event.delta.as_int());
            if let TrackEventKind::Meta(MetaMessage::Tempo(micros)) = event.kind {
                changes.push((tick, micros.as_int()));
            }
        }
    }
    changes.sort_by_key(|(tick, _)| *tick);
    changes
}

/// Absolute tick of the last event in the longest track.
fn end_tick(smf: &Smf) -> u64 {
    smf.tracks
        .iter()
        .map(|track| {
            track
                .iter()
                .map(|e| u64::from(e.delta.as_int()))
                .sum::<u64>()
        })
        .max()
        .unwrap_or(0)
}

/// Total playing time of a parsed file in seconds.
fn duration_seconds(smf: &Smf) -> f64 {
    let end = end_tick(smf);
    match smf.header.timing {
        Timing::Timecode(fps, subframes) => {
            let ticks_per_second = f64::from(fps.as_f32()) * f64::from(subframes);
            if ticks_per_second > 0.0 {
                end as f64 / ticks_per_second
            } else {
                0.0
            }
        }
        Timing::Metrical(tpb) => {
            let tpb = f64::from(tpb.as_int().max(1));
            let to_seconds =
                |ticks: u64, micros: u32| ticks as f64 * f64::from(micros) / (tpb * 1e6);

            let mut seconds = 0.0;
            let mut last_tick = 0_u64;
            let mut tempo = DEFAULT_TEMPO_MICROS;
            for (tick, micros) in tempo_map(smf) {
                if tick >= end {
                    break;
                }
                seconds += to_seconds(tick - last_tick, tempo);
                last_tick = tick;
                tempo = micros;
            }
            seconds + to_seconds(end - last_tick, tempo)
        }
    }
}

/// Total duration in seconds of an in-memory MIDI file.
pub fn file_duration(bytes: &[u8]) -> Result<f64> {
    let smf = parse(bytes, Path::new("<memory>"))?;
    Ok(duration_seconds(&smf))
}

/// Total duration in seconds of the MIDI file at `path`.
///
/// # Errors
/// * `FileNotFound` - nothing exists at `path`
/// * `DecodeError` - the file is not a valid Standard MIDI File
pub fn read_duration(path: &Path) -> Result<f64> {
    let bytes = read_bytes(path)?;
    let smf = parse(&bytes, path)?;
    let seconds = duration_seconds(&smf);
    debug!("{} lasts {:.3}s", path.display(), seconds);
    Ok(seconds)
}

/// Recover notes by pairing each note-on with the next matching note-off.
///
/// Pairing is first-in first-out per (channel, pitch) and a note-on with
/// velocity 0 counts as a note-off. Notes still sounding at the end of a
/// track are dropped.
pub fn decode_notes(bytes: &[u8]) -> Result<DecodedMidi> {
    let smf = parse(bytes, Path::new("<memory>"))?;

    let ticks_per_beat = match smf.header.timing {
        Timing::Metrical(tpb) => Some(tpb.as_int()),
        Timing::Timecode(..) => None,
    };
    let tempo_micros = tempo_map(&smf).first().map(|(_, micros)| *micros);

    let mut notes = Vec::new();
    let mut dangling = 0_usize;
    for track in &smf.tracks {
        let mut tick = 0_u64;
        let mut sounding: HashMap<(u8, u8), VecDeque<(u64, u8)>> = HashMap::new();

        for event in track {
            tick += u64::from(event.delta.as_int());
            let TrackEventKind::Midi { channel, message } = event.kind else {
                continue;
            };
            let (key, on_velocity) = match message {
                MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                    (key.as_int(), Some(vel.as_int()))
                }
                MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                    (key.as_int(), None)
                }
                _ => continue,
            };

            let queue = sounding.entry((channel.as_int(), key)).or_default();
            match on_velocity {
                Some(velocity) => queue.push_back((tick, velocity)),
                None => {
                    if let Some((start, velocity)) = queue.pop_front() {
                        notes.push(DecodedNote {
                            start_tick: start,
                            pitch: key,
                            duration_ticks: tick - start,
                            velocity,
                        });
                    }
                }
            }
        }
        dangling += sounding.values().map(VecDeque::len).sum::<usize>();
    }

    if dangling > 0 {
        debug!("Dropped {} notes with no note-off", dangling);
    }
    notes.sort();

    Ok(DecodedMidi {
        ticks_per_beat,
        tempo_micros,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{Note, NoteEventEncoder};
    use approx::assert_relative_eq;

    #[test]
    fn test_duration_at_120_bpm() {
        let notes = [Note::new(60, 0.0, 4.0, 100).unwrap()];
        let bytes = NoteEventEncoder::default().encode(&notes, 120.0).unwrap();
        assert_relative_eq!(file_duration(&bytes).unwrap(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duration_follows_tempo() {
        let notes = [Note::new(60, 2.0, 2.0, 100).unwrap()];
        let bytes = NoteEventEncoder::default().encode(&notes, 60.0).unwrap();
        assert_relative_eq!(file_duration(&bytes).unwrap(), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_file_has_zero_duration() {
        let bytes = NoteEventEncoder::default().encode(&[], 120.0).unwrap();
        assert_relative_eq!(file_duration(&bytes).unwrap(), 0.0);
    }

    #[test]
    fn test_read_duration_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_duration(&dir.path().join("nope.mid")).unwrap_err();
        assert!(matches!(err, MonkError::FileNotFound { .. }));
    }

    #[test]
    fn test_read_duration_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.mid");
        fs::write(&path, b"definitely not midi").unwrap();
        let err = read_duration(&path).unwrap_err();
        assert!(matches!(err, MonkError::DecodeError { .. }));
    }

    #[test]
    fn test_decode_recovers_notes() {
        let notes = [
            Note::new(64, 1.0, 0.5, 90).unwrap(),
            Note::new(60, 0.0, 1.0, 110).unwrap(),
        ];
        let bytes = NoteEventEncoder::default().encode(&notes, 100.0).unwrap();
        let decoded = decode_notes(&bytes).unwrap();

        assert_eq!(decoded.ticks_per_beat, Some(480));
        assert_eq!(decoded.tempo_micros, Some(600_000));
        assert_eq!(
            decoded.notes,
            vec![
                DecodedNote {
                    start_tick: 0,
                    pitch: 60,
                    duration_ticks: 480,
                    velocity: 110
                },
                DecodedNote {
                    start_tick: 480,
                    pitch: 64,
                    duration_ticks: 240,
                    velocity: 90
                },
            ]
        );
    }

    #[test]
    fn test_decode_back_to_back_same_pitch() {
        let notes = [
            Note::new(60, 0.0, 1.0, 100).unwrap(),
            Note::new(60, 1.0, 1.0, 100).unwrap(),
        ];
        let bytes = NoteEventEncoder::default().encode(&notes, 120.0).unwrap();
        let decoded = decode_notes(&bytes).unwrap();
        let durations: Vec<u64> = decoded.notes.iter().map(|n| n.duration_ticks).collect();
        assert_eq!(durations, vec![480, 480]);
    }
}
