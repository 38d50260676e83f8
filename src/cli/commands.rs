//! CLI Command Implementations
//!
//! Each command opens a [`Session`], runs one operation and prints its
//! report.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{MonkError, Result};
use crate::midi::Note;
use crate::project::Project;
use crate::session::{Session, ToolReport};
use crate::theory::{note_name_to_pitch, pitch_to_note_name};

fn print_report(report: &ToolReport) {
    println!("{}", report.summary);
}

/// Create an empty project file.
pub fn new_project(path: &Path) -> Result<()> {
    info!("Creating new project at: {}", path.display());

    let mut project = Project::new();
    project.save_as(path)?;

    println!("Project created: {}", path.display());
    Ok(())
}

/// Print the project overview and where renders would go.
pub fn show_info(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MonkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let session = Session::open(path)?;
    println!("Project: {}", path.display());
    println!("{}", session.project().summary());
    println!("MIDI files: {}", session.midi_dir().display());
    println!("Render target: {}", session.render_output_path().display());
    Ok(())
}

pub fn set_tempo(path: &Path, bpm: f64) -> Result<()> {
    let mut session = Session::open(path)?;
    print_report(&session.set_tempo(bpm)?);
    Ok(())
}

pub fn add_track(path: &Path, name: &str) -> Result<()> {
    let mut session = Session::open(path)?;
    print_report(&session.add_track(name)?);
    Ok(())
}

/// Generate a chord progression, falling back to configured defaults.
pub fn chords(
    path: &Path,
    filename: &str,
    track: &str,
    chords: Vec<String>,
    beats_per_chord: Option<f64>,
    octave: Option<i32>,
) -> Result<()> {
    let mut session = Session::open(path)?;

    let mut progression = session.chord_progression(chords);
    if let Some(beats) = beats_per_chord {
        progression = progression.with_beats_per_chord(beats);
    }
    if let Some(octave) = octave {
        progression = progression.with_octave(octave);
    }

    print_report(&session.create_chord_progression(filename, &progression, track)?);
    Ok(())
}

/// Generate a drum pattern from `drum=beats` hits.
pub fn drums(
    path: &Path,
    filename: &str,
    track: &str,
    hits: Vec<(String, Vec<f64>)>,
    bars: Option<u32>,
) -> Result<()> {
    let mut session = Session::open(path)?;

    let mut pattern = session.drum_pattern();
    if let Some(bars) = bars {
        pattern.bars = bars;
    }
    for (drum, beats) in hits {
        pattern = pattern.hit(drum, beats);
    }

    print_report(&session.create_drum_pattern(filename, &pattern, track)?);
    Ok(())
}

/// Write notes read from a JSON array.
pub fn melody(path: &Path, filename: &str, track: &str, notes_file: &Path) -> Result<()> {
    let content = fs::read_to_string(notes_file).map_err(|e| MonkError::FileReadError {
        path: notes_file.to_path_buf(),
        source: e,
    })?;
    let notes: Vec<Note> = serde_json::from_str(&content)?;

    let mut session = Session::open(path)?;
    print_report(&session.create_midi(filename, &notes, track)?);
    Ok(())
}

pub fn pitch(name: &str) -> Result<()> {
    let pitch = note_name_to_pitch(name)?;
    println!("{} = {} ({})", name, pitch, pitch_to_note_name(pitch));
    Ok(())
}
