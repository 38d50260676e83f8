//! Session configuration
//!
//! Read from an optional `monk.json` next to the project file. Every field
//! has a default, so a partial file only overrides what it names.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MonkError, Result};
use crate::midi::DEFAULT_TICKS_PER_BEAT;

/// Config file name looked up in the project directory.
pub const CONFIG_FILE: &str = "monk.json";

/// Tunables for the session layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonkConfig {
    /// MIDI resolution for generated files
    pub ticks_per_beat: u16,
    /// Directory (relative to the project) for generated MIDI
    pub midi_dir: String,
    /// Directory (relative to the project) for rendered audio
    pub renders_dir: String,
    /// Lowest tempo `set_tempo` accepts
    pub min_tempo: f64,
    /// Highest tempo `set_tempo` accepts
    pub max_tempo: f64,
    pub default_bars: u32,
    pub default_octave: i32,
    pub default_beats_per_chord: f64,
    pub chord_velocity: u8,
    pub drum_velocity: u8,
}

impl Default for MonkConfig {
    fn default() -> Self {
        Self {
            ticks_per_beat: DEFAULT_TICKS_PER_BEAT,
            midi_dir: "midi".to_string(),
            renders_dir: "renders".to_string(),
            min_tempo: 40.0,
            max_tempo: 240.0,
            default_bars: 4,
            default_octave: 4,
            default_beats_per_chord: 4.0,
            chord_velocity: 80,
            drum_velocity: 100,
        }
    }
}

impl MonkConfig {
    /// Load `monk.json` from `dir`, or the defaults if there is none.
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| MonkError::FileReadError {
            path: path.clone(),
            source: e,
        })?;
        let config: MonkConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the encoder or tempo check cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_beat == 0 || self.ticks_per_beat > 0x7FFF {
            return Err(MonkError::InvalidTicksPerBeat {
                value: u32::from(self.ticks_per_beat),
            });
        }
        if !(self.min_tempo > 0.0 && self.min_tempo <= self.max_tempo) {
            return Err(MonkError::InvalidTempo {
                bpm: self.min_tempo,
            });
        }
        if self.chord_velocity > 127 {
            return Err(MonkError::VelocityOutOfRange {
                velocity: i32::from(self.chord_velocity),
            });
        }
        if self.drum_velocity > 127 {
            return Err(MonkError::VelocityOutOfRange {
                velocity: i32::from(self.drum_velocity),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = MonkConfig::load(dir.path()).unwrap();
        assert_eq!(config, MonkConfig::default());
        assert_eq!(config.ticks_per_beat, 480);
        assert_eq!(config.min_tempo, 40.0);
        assert_eq!(config.max_tempo, 240.0);
    }

    #[test]
    fn test_partial_file_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"ticks_per_beat": 960, "midi_dir": "clips"}"#,
        )
        .unwrap();

        let config = MonkConfig::load(dir.path()).unwrap();
        assert_eq!(config.ticks_per_beat, 960);
        assert_eq!(config.midi_dir, "clips");
        assert_eq!(config.renders_dir, "renders");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = MonkConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, MonkError::Json(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = MonkConfig::default();
        config.ticks_per_beat = 0;
        assert!(config.validate().is_err());

        let mut config = MonkConfig::default();
        config.min_tempo = 300.0;
        assert!(config.validate().is_err());
    }
}
