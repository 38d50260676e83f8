//! General MIDI drum patterns.

use serde::{Deserialize, Serialize};

use crate::error::{MonkError, Result};
use crate::midi::Note;

/// Patterns are written in 4/4.
pub const BEATS_PER_BAR: f64 = 4.0;

/// Length of every drum hit in beats.
pub const DRUM_HIT_BEATS: f64 = 0.1;

/// GM drum mapping: name -> pitch.
pub const GM_DRUMS: &[(&str, u8)] = &[
    ("kick", 36),
    ("snare", 38),
    ("rimshot", 37),
    ("clap", 39),
    ("hihat_closed", 42),
    ("hihat_open", 46),
    ("hihat_pedal", 44),
    ("tom_low", 45),
    ("tom_mid", 47),
    ("tom_high", 50),
    ("crash", 49),
    ("ride", 51),
    ("ride_bell", 53),
];

/// Pitch for a drum name, if it is in the GM table.
pub fn drum_pitch(name: &str) -> Option<u8> {
    GM_DRUMS
        .iter()
        .find(|(drum, _)| *drum == name)
        .map(|(_, pitch)| *pitch)
}

/// Every valid drum name, in table order.
pub fn drum_names() -> Vec<String> {
    GM_DRUMS.iter().map(|(name, _)| name.to_string()).collect()
}

/// One drum and the beats within a bar on which it is struck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumLane {
    pub drum: String,
    pub beats: Vec<f64>,
}

fn default_bars() -> u32 {
    4
}

fn default_velocity() -> u8 {
    100
}

/// A one-bar rhythm repeated for a number of bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumPattern {
    /// Lanes in the order they were requested
    pub lanes: Vec<DrumLane>,
    #[serde(default = "default_bars")]
    pub bars: u32,
    #[serde(default = "default_velocity")]
    pub velocity: u8,
}

impl Default for DrumPattern {
    fn default() -> Self {
        Self::new(default_bars())
    }
}

impl DrumPattern {
    /// Empty pattern spanning `bars` bars.
    pub fn new(bars: u32) -> Self {
        Self {
            lanes: Vec::new(),
            bars,
            velocity: default_velocity(),
        }
    }

    /// Add a lane for `drum` hitting on each of `beats`.
    pub fn hit(mut self, drum: impl Into<String>, beats: Vec<f64>) -> Self {
        self.lanes.push(DrumLane {
            drum: drum.into(),
            beats,
        });
        self
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    /// Check every drum name against the GM table.
    ///
    /// Fails on the first unknown name with the full list of valid ones.
    pub fn validate(&self) -> Result<()> {
        match self.lanes.iter().find(|lane| drum_pitch(&lane.drum).is_none()) {
            Some(lane) => Err(MonkError::UnknownDrumName {
                name: lane.drum.clone(),
                valid: drum_names(),
            }),
            None => Ok(()),
        }
    }

    /// Names of the drums in this pattern, in lane order.
    pub fn drum_list(&self) -> Vec<&str> {
        self.lanes.iter().map(|lane| lane.drum.as_str()).collect()
    }

    /// Expand into short hits: one per lane beat per bar, at
    /// `bar * BEATS_PER_BAR + beat`.
    pub fn notes(&self) -> Result<Vec<Note>> {
        self.validate()?;

        let mut notes = Vec::new();
        for lane in &self.lanes {
            let pitch = drum_pitch(&lane.drum).ok_or_else(|| MonkError::UnknownDrumName {
                name: lane.drum.clone(),
                valid: drum_names(),
            })?;

            for bar in 0..self.bars {
                let bar_offset = f64::from(bar) * BEATS_PER_BAR;
                for beat in &lane.beats {
                    notes.push(Note::new(
                        pitch,
                        bar_offset + beat,
                        DRUM_HIT_BEATS,
                        self.velocity,
                    )?);
                }
            }
        }

        Ok(notes)
    }
}
