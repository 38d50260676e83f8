//! Project state: tempo, sample rate, render target and tracks.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use tempfile::NamedTempFile;
use uuid::Uuid;

use super::ids::{IdGenerator, UuidGenerator};
use super::{parser, writer};
use crate::error::{MonkError, Result};
use crate::midi::read_duration;

/// Tempo used when the project text has none.
pub const DEFAULT_TEMPO: f64 = 120.0;
/// Sample rate used when the project text has none.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
/// Render target stem used when the project text has none.
pub const DEFAULT_RENDER_FILE: &str = "render";

/// Attempts at drawing an identifier that no track already uses.
const MAX_ID_DRAWS: usize = 64;

/// Time signature, e.g. 4/4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u32,
    pub denominator: u32,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// A MIDI file placed on a track.
///
/// The path is a plain reference; the file itself is not owned or managed
/// by the project.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedItem {
    pub path: PathBuf,
    /// Position in seconds (>= 0)
    pub position: f64,
    /// Length in seconds (> 0)
    pub length: f64,
}

impl PlacedItem {
    pub fn new(path: impl Into<PathBuf>, position: f64, length: f64) -> Result<Self> {
        let valid_position = position.is_finite() && position >= 0.0;
        let valid_length = length.is_finite() && length > 0.0;
        if !valid_position || !valid_length {
            return Err(MonkError::InvalidPlacement { position, length });
        }
        Ok(Self {
            path: path.into(),
            position,
            length,
        })
    }

    /// Display name: the file stem.
    pub fn name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// A track in the project.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub name: String,
    pub(super) index: usize,
    pub(super) id: Uuid,
    pub(super) items: Vec<PlacedItem>,
}

impl Track {
    pub(super) fn new(name: String, index: usize, id: Uuid) -> Self {
        Self {
            name,
            index,
            id,
            items: Vec::new(),
        }
    }

    /// Position in the project's track list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Identifier assigned at creation, stable for the track's life.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    /// Tracks carrying MIDI get a synthesizer so they make sound.
    pub fn has_synth(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Reaper project model.
///
/// Mutated in place and persisted only by an explicit save. Not meant to
/// be shared between threads.
#[derive(Debug)]
pub struct Project {
    pub(super) tempo: f64,
    pub(super) time_signature: TimeSignature,
    pub(super) sample_rate: u32,
    pub(super) render_file: String,
    pub(super) tracks: Vec<Track>,
    pub(super) path: Option<PathBuf>,
    pub(super) ids: Box<dyn IdGenerator>,
}

impl Default for Project {
    fn default() -> Self {
        Self::with_id_generator(Box::new(UuidGenerator))
    }
}

impl Project {
    /// Fresh, empty project with default metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh project drawing identifiers from `ids`.
    pub fn with_id_generator(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            tempo: DEFAULT_TEMPO,
            time_signature: TimeSignature::default(),
            sample_rate: DEFAULT_SAMPLE_RATE,
            render_file: DEFAULT_RENDER_FILE.to_string(),
            tracks: Vec::new(),
            path: None,
            ids,
        }
    }

    /// Parse project text. Never fails: unreadable metadata keeps its default.
    pub fn parse(text: &str) -> Self {
        Self::parse_with_ids(text, Box::new(UuidGenerator))
    }

    /// Parse project text, drawing any missing identifiers from `ids`.
    pub fn parse_with_ids(text: &str, ids: Box<dyn IdGenerator>) -> Self {
        parser::read_project(text, ids)
    }

    /// Load a project from an `.rpp` file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_ids(path, Box::new(UuidGenerator))
    }

    pub fn load_with_ids(path: &Path, ids: Box<dyn IdGenerator>) -> Result<Self> {
        if !path.exists() {
            return Err(MonkError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| MonkError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut project = Self::parse_with_ids(&text, ids);
        project.path = Some(path.to_path_buf());
        info!(
            "Loaded {} ({} tracks, {} BPM)",
            path.display(),
            project.tracks.len(),
            project.tempo
        );
        Ok(project)
    }

    /// Load `path` if it exists, otherwise start a fresh project bound to it.
    pub fn load_or_new(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        let mut project = Self::new();
        project.path = Some(path.to_path_buf());
        Ok(project)
    }

    /// Regenerate the complete project text from the model.
    pub fn to_text(&self) -> String {
        writer::render_project(self)
    }

    /// Save to the path the project was loaded from or last saved to.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(MonkError::NoProjectPath)?;
        self.save_as(&path)
    }

    /// Save to `path` and remember it for later saves.
    ///
    /// The text goes to a temporary file beside the target which is then
    /// renamed over it, so an interrupted save leaves the old file intact.
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        let text = self.to_text();
        let write_err = |source: std::io::Error| MonkError::FileWriteError {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(text.as_bytes()).map_err(write_err)?;
        tmp.persist(path).map_err(|e| write_err(e.error))?;

        self.path = Some(path.to_path_buf());
        info!("Saved project: {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn tempo(&self) -> f64 {
        self.tempo
    }

    /// Unconditional; range policy belongs to the caller.
    pub fn set_tempo(&mut self, bpm: f64) {
        self.tempo = bpm;
    }

    pub fn time_signature(&self) -> TimeSignature {
        self.time_signature
    }

    pub fn set_time_signature(&mut self, time_signature: TimeSignature) {
        self.time_signature = time_signature;
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample_rate = sample_rate;
    }

    /// Render output stem, no extension required.
    pub fn render_file(&self) -> &str {
        &self.render_file
    }

    pub fn set_render_file(&mut self, stem: impl Into<String>) {
        self.render_file = stem.into();
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// First track whose name matches exactly.
    pub fn find_track(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Draw an identifier not used by any existing track.
    pub(super) fn fresh_track_id(&self) -> Uuid {
        for _ in 0..MAX_ID_DRAWS {
            let id = self.ids.next_id();
            if !self.tracks.iter().any(|t| t.id == id) {
                return id;
            }
        }
        warn!("Id generator keeps colliding, falling back to a random id");
        Uuid::new_v4()
    }

    /// Draw an identifier for a serialized item or plugin instance.
    pub(super) fn next_id(&self) -> Uuid {
        self.ids.next_id()
    }

    /// Append a track at the end of the list.
    pub fn add_track(&mut self, name: impl Into<String>) -> &Track {
        let index = self.tracks.len();
        let id = self.fresh_track_id();
        self.tracks.push(Track::new(name.into(), index, id));
        &self.tracks[index]
    }

    /// Place a MIDI file on a track.
    ///
    /// When `length` is `None` it is read from the file's total duration.
    /// Nothing is added unless every check passes.
    ///
    /// # Errors
    /// * `TrackIndexOutOfRange` - no track at `track_index`
    /// * `FileNotFound` / `DecodeError` - length could not be derived
    /// * `InvalidPlacement` - negative position or non-positive length
    pub fn add_item(
        &mut self,
        track_index: usize,
        path: impl Into<PathBuf>,
        position: f64,
        length: Option<f64>,
    ) -> Result<&PlacedItem> {
        let count = self.tracks.len();
        if track_index >= count {
            return Err(MonkError::TrackIndexOutOfRange {
                index: track_index,
                count,
            });
        }

        let path = path.into();
        let length = match length {
            Some(length) => length,
            None => read_duration(&path)?,
        };
        let item = PlacedItem::new(path, position, length)?;

        let items = &mut self.tracks[track_index].items;
        items.push(item);
        Ok(&items[items.len() - 1])
    }

    /// Human-readable overview of the project.
    pub fn summary(&self) -> String {
        let mut lines = vec![
            format!("Tempo: {} BPM", self.tempo),
            format!("Time Signature: {}", self.time_signature),
            format!("Tracks: {}", self.tracks.len()),
        ];

        for track in &self.tracks {
            lines.push(format!("  - {}", track.name));
            for item in &track.items {
                let file_name = item
                    .path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                lines.push(format!("      MIDI: {} at {}s", file_name, item.position));
            }
        }

        lines.join("\n")
    }
}
