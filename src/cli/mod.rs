//! CLI Module
//!
//! Command-line interface over a [`Session`](crate::session::Session).

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Monk - music intent to MIDI files and Reaper projects
#[derive(Parser, Debug)]
#[command(name = "monk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty project file
    #[command(name = "new")]
    New {
        /// Path for the new .rpp file
        project: PathBuf,
    },

    /// Print a project overview
    #[command(name = "info")]
    Info {
        /// Path to the project
        project: PathBuf,
    },

    /// Set the project tempo
    #[command(name = "tempo")]
    Tempo {
        /// Path to the project
        project: PathBuf,

        /// Beats per minute
        bpm: f64,
    },

    /// Append a track
    #[command(name = "add-track")]
    AddTrack {
        /// Path to the project
        project: PathBuf,

        /// Track name
        name: String,
    },

    /// Generate a chord progression and place it on a track
    #[command(name = "chords")]
    Chords {
        /// Path to the project
        project: PathBuf,

        /// MIDI file name, without extension
        #[arg(short, long)]
        file: String,

        /// Track to place the file on (created if missing)
        #[arg(short, long)]
        track: String,

        /// Beats each chord lasts
        #[arg(long)]
        beats_per_chord: Option<f64>,

        /// Octave of the chord roots
        #[arg(long, allow_hyphen_values = true)]
        octave: Option<i32>,

        /// Chord names, e.g. Am F C G
        #[arg(required = true)]
        chords: Vec<String>,
    },

    /// Generate a drum pattern and place it on a track
    #[command(name = "drums")]
    Drums {
        /// Path to the project
        project: PathBuf,

        /// MIDI file name, without extension
        #[arg(short, long)]
        file: String,

        /// Track to place the file on (created if missing)
        #[arg(short, long)]
        track: String,

        /// Number of bars
        #[arg(long)]
        bars: Option<u32>,

        /// Drum and beat offsets within a bar, e.g. kick=0,2
        #[arg(long = "hit", required = true, value_parser = parse_hit)]
        hits: Vec<(String, Vec<f64>)>,
    },

    /// Write notes from a JSON file and place them on a track
    #[command(name = "melody")]
    Melody {
        /// Path to the project
        project: PathBuf,

        /// MIDI file name, without extension
        #[arg(short, long)]
        file: String,

        /// Track to place the file on (created if missing)
        #[arg(short, long)]
        track: String,

        /// JSON array of {pitch, start_beat, duration_beats, velocity}
        #[arg(short, long)]
        notes: PathBuf,
    },

    /// Convert a note name to its MIDI pitch
    #[command(name = "pitch")]
    Pitch {
        /// Note name, e.g. C#4
        #[arg(allow_hyphen_values = true)]
        name: String,
    },
}

/// Parse `drum=beat,beat,...`.
fn parse_hit(value: &str) -> Result<(String, Vec<f64>), String> {
    let (drum, beats) = value
        .split_once('=')
        .ok_or_else(|| format!("expected DRUM=BEATS, got '{value}'"))?;

    let beats = beats
        .split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(|b| b.parse::<f64>().map_err(|e| format!("bad beat '{b}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((drum.trim().to_string(), beats))
}
