//! Error handling for Monk
//!
//! Domain operations are strict and fail fast with one of these errors.
//! Project metadata parsing is tolerant and never produces them.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Monk operations
pub type Result<T> = std::result::Result<T, MonkError>;

/// Broad category of a [`MonkError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed note name, unknown chord quality, unknown drum name
    Parse,
    /// Pitch, velocity, timing or tempo outside what the format can hold
    Range,
    /// Request rejected before touching the model
    Validation,
    /// Referenced music file missing or undecodable
    Resource,
    /// Project file could not be read or written
    Io,
    /// Configuration file could not be decoded
    Config,
}

/// Main error type for Monk operations
#[derive(Error, Debug)]
pub enum MonkError {
    // Parse Errors
    #[error("Malformed note name: '{name}'")]
    MalformedNoteName { name: String },

    #[error("Unknown chord quality '{quality}' in '{chord}'")]
    UnknownChordQuality { quality: String, chord: String },

    #[error("Unknown drum: {name}. Valid: {}", valid.join(", "))]
    UnknownDrumName { name: String, valid: Vec<String> },

    // Range Errors
    #[error("Pitch {pitch} is out of MIDI range (0-127)")]
    PitchOutOfRange { pitch: i32 },

    #[error("Velocity {velocity} is out of MIDI range (0-127)")]
    VelocityOutOfRange { velocity: i32 },

    #[error("Note duration must be positive, got {duration} beats")]
    InvalidDuration { duration: f64 },

    #[error("Note start must be non-negative, got {start} beats")]
    InvalidStart { start: f64 },

    #[error("Tempo must be a positive number of BPM, got {bpm}")]
    InvalidTempo { bpm: f64 },

    #[error("Ticks per beat must be between 1 and 32767, got {value}")]
    InvalidTicksPerBeat { value: u32 },

    #[error("Event at tick {tick} is too far from the previous event to encode")]
    TickOverflow { tick: u64 },

    #[error("Invalid item placement: position {position}s, length {length}s")]
    InvalidPlacement { position: f64, length: f64 },

    // Validation Errors
    #[error("Tempo must be between {min} and {max} BPM, got {bpm}")]
    TempoOutOfRange { bpm: f64, min: f64, max: f64 },

    #[error("Track index {index} out of range ({count} tracks)")]
    TrackIndexOutOfRange { index: usize, count: usize },

    #[error("No path specified for saving")]
    NoProjectPath,

    // Resource Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Could not decode MIDI file {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    // I/O Errors
    #[error("Failed to read file: {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MonkError {
    /// Get the taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonkError::MalformedNoteName { .. }
            | MonkError::UnknownChordQuality { .. }
            | MonkError::UnknownDrumName { .. } => ErrorKind::Parse,
            MonkError::PitchOutOfRange { .. }
            | MonkError::VelocityOutOfRange { .. }
            | MonkError::InvalidDuration { .. }
            | MonkError::InvalidStart { .. }
            | MonkError::InvalidTempo { .. }
            | MonkError::InvalidTicksPerBeat { .. }
            | MonkError::TickOverflow { .. }
            | MonkError::InvalidPlacement { .. } => ErrorKind::Range,
            MonkError::TempoOutOfRange { .. }
            | MonkError::TrackIndexOutOfRange { .. }
            | MonkError::NoProjectPath => ErrorKind::Validation,
            MonkError::FileNotFound { .. } | MonkError::DecodeError { .. } => ErrorKind::Resource,
            MonkError::FileReadError { .. }
            | MonkError::FileWriteError { .. }
            | MonkError::Io(_) => ErrorKind::Io,
            MonkError::Json(_) => ErrorKind::Config,
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            MonkError::MalformedNoteName { .. } => "MALFORMED_NOTE_NAME",
            MonkError::UnknownChordQuality { .. } => "UNKNOWN_CHORD_QUALITY",
            MonkError::UnknownDrumName { .. } => "UNKNOWN_DRUM_NAME",
            MonkError::PitchOutOfRange { .. } => "PITCH_OUT_OF_RANGE",
            MonkError::VelocityOutOfRange { .. } => "VELOCITY_OUT_OF_RANGE",
            MonkError::InvalidDuration { .. } => "INVALID_DURATION",
            MonkError::InvalidStart { .. } => "INVALID_START",
            MonkError::InvalidTempo { .. } => "INVALID_TEMPO",
            MonkError::InvalidTicksPerBeat { .. } => "INVALID_TICKS_PER_BEAT",
            MonkError::TickOverflow { .. } => "TICK_OVERFLOW",
            MonkError::InvalidPlacement { .. } => "INVALID_PLACEMENT",
            MonkError::TempoOutOfRange { .. } => "TEMPO_OUT_OF_RANGE",
            MonkError::TrackIndexOutOfRange { .. } => "TRACK_INDEX_OUT_OF_RANGE",
            MonkError::NoProjectPath => "NO_PROJECT_PATH",
            MonkError::FileNotFound { .. } => "FILE_NOT_FOUND",
            MonkError::DecodeError { .. } => "DECODE_ERROR",
            MonkError::FileReadError { .. } => "FILE_READ_ERROR",
            MonkError::FileWriteError { .. } => "FILE_WRITE_ERROR",
            MonkError::Io(_) => "IO_ERROR",
            MonkError::Json(_) => "JSON_ERROR",
        }
    }

    /// Returns a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            MonkError::MalformedNoteName { .. } => {
                Some("Use a letter A-G, an optional # or b, then an octave, e.g. 'F#3'.")
            }
            MonkError::UnknownChordQuality { .. } => {
                Some("Supported qualities: maj, m, 7, maj7, m7, dim, dim7, aug, sus2, sus4, add9, 9.")
            }
            MonkError::UnknownDrumName { .. } => Some("Pick one of the listed drum names."),
            MonkError::TempoOutOfRange { .. } => Some("Choose a tempo inside the allowed range."),
            MonkError::TrackIndexOutOfRange { .. } => Some("Add the track before placing items on it."),
            MonkError::NoProjectPath => Some("Use save_as with an explicit path."),
            MonkError::FileNotFound { .. } => Some("Check the file path and try again."),
            MonkError::DecodeError { .. } => {
                Some("The MIDI file may be corrupted - regenerate it or pass an explicit length.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = MonkError::TrackIndexOutOfRange { index: 0, count: 0 };
        assert_eq!(err.error_code(), "TRACK_INDEX_OUT_OF_RANGE");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_unknown_drum_lists_valid_names() {
        let err = MonkError::UnknownDrumName {
            name: "cowbell".to_string(),
            valid: vec!["kick".to_string(), "snare".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown drum: cowbell. Valid: kick, snare");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_resource_errors() {
        let err = MonkError::FileNotFound {
            path: PathBuf::from("missing.mid"),
        };
        assert_eq!(err.kind(), ErrorKind::Resource);
    }
}
