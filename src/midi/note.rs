//! Beat-timed note.

use serde::{Deserialize, Serialize};

use crate::error::{MonkError, Result};

/// Velocity used when none is given.
pub const DEFAULT_VELOCITY: u8 = 100;

fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}

/// A single MIDI note positioned in beats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Position in beats from the start
    pub start_beat: f64,
    /// Length in beats (> 0)
    pub duration_beats: f64,
    /// Note velocity (0-127)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

impl Note {
    /// Create a validated note.
    pub fn new(pitch: u8, start_beat: f64, duration_beats: f64, velocity: u8) -> Result<Self> {
        let note = Self {
            pitch,
            start_beat,
            duration_beats,
            velocity,
        };
        note.validate()?;
        Ok(note)
    }

    /// Create a validated note at the default velocity.
    pub fn with_default_velocity(pitch: u8, start_beat: f64, duration_beats: f64) -> Result<Self> {
        Self::new(pitch, start_beat, duration_beats, DEFAULT_VELOCITY)
    }

    /// Check range and timing constraints.
    ///
    /// Fields are public, so the encoder re-validates every note it is given.
    pub fn validate(&self) -> Result<()> {
        if self.pitch > 127 {
            return Err(MonkError::PitchOutOfRange {
                pitch: i32::from(self.pitch),
            });
        }
        if self.velocity > 127 {
            return Err(MonkError::VelocityOutOfRange {
                velocity: i32::from(self.velocity),
            });
        }
        if !self.start_beat.is_finite() || self.start_beat < 0.0 {
            return Err(MonkError::InvalidStart {
                start: self.start_beat,
            });
        }
        if !self.duration_beats.is_finite() || self.duration_beats <= 0.0 {
            return Err(MonkError::InvalidDuration {
                duration: self.duration_beats,
            });
        }
        Ok(())
    }

    /// Start position in ticks.
    pub fn start_ticks(&self, ticks_per_beat: u16) -> u64 {
        (self.start_beat * f64::from(ticks_per_beat)).round() as u64
    }

    /// Duration in ticks, never less than one.
    pub fn duration_ticks(&self, ticks_per_beat: u16) -> u64 {
        ((self.duration_beats * f64::from(ticks_per_beat)).round() as u64).max(1)
    }

    /// End position in ticks.
    ///
    /// # Errors
    /// * `TickOverflow` - the end does not fit in a tick counter
    pub fn end_ticks(&self, ticks_per_beat: u16) -> Result<u64> {
        let start = self.start_ticks(ticks_per_beat);
        start
            .checked_add(self.duration_ticks(ticks_per_beat))
            .ok_or(MonkError::TickOverflow { tick: start })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_note() {
        let note = Note::with_default_velocity(60, 0.0, 1.0).unwrap();
        assert_eq!(note.velocity, DEFAULT_VELOCITY);
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            Note::new(128, 0.0, 1.0, 100),
            Err(MonkError::PitchOutOfRange { pitch: 128 })
        ));
        assert!(matches!(
            Note::new(60, 0.0, 1.0, 200),
            Err(MonkError::VelocityOutOfRange { velocity: 200 })
        ));
    }

    #[test]
    fn test_rejects_degenerate_timing() {
        assert!(matches!(
            Note::new(60, 0.0, 0.0, 100),
            Err(MonkError::InvalidDuration { .. })
        ));
        assert!(matches!(
            Note::new(60, 0.0, -1.0, 100),
            Err(MonkError::InvalidDuration { .. })
        ));
        assert!(matches!(
            Note::new(60, -0.5, 1.0, 100),
            Err(MonkError::InvalidStart { .. })
        ));
        assert!(matches!(
            Note::new(60, f64::NAN, 1.0, 100),
            Err(MonkError::InvalidStart { .. })
        ));
    }

    #[test]
    fn test_tick_conversion_rounds() {
        let note = Note::new(60, 1.5, 0.333, 90).unwrap();
        assert_eq!(note.start_ticks(480), 720);
        assert_eq!(note.duration_ticks(480), 160);
        assert_eq!(note.end_ticks(480).unwrap(), 880);
    }

    #[test]
    fn test_tiny_duration_keeps_one_tick() {
        let note = Note::new(60, 0.0, 0.0001, 90).unwrap();
        assert_eq!(note.duration_ticks(480), 1);
    }

    #[test]
    fn test_velocity_defaults_when_deserialized() {
        let note: Note =
            serde_json::from_str(r#"{"pitch": 64, "start_beat": 2.0, "duration_beats": 0.5}"#)
                .unwrap();
        assert_eq!(note.velocity, 100);
        assert_eq!(note.pitch, 64);
    }
}
