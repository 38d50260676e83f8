//! Session Module
//!
//! Orchestrates the generators and the project model over a project
//! directory:
//!
//! ```text
//! project_dir/
//!   song.rpp       # Reaper project
//!   monk.json      # optional config
//!   midi/          # generated MIDI files
//!   renders/       # where an external renderer writes audio
//! ```
//!
//! Each operation validates its whole request first, so a failure writes
//! no file and leaves the model untouched. Successful operations save the
//! project.

mod report;

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

pub use report::ToolReport;

use crate::config::MonkConfig;
use crate::error::{MonkError, Result};
use crate::midi::{file_duration, Note, NoteEventEncoder};
use crate::patterns::{self, ChordProgression, DrumPattern};
use crate::project::{PlacedItem, Project};

/// A project file, its model, and the settings used to extend it.
#[derive(Debug)]
pub struct Session {
    project_file: PathBuf,
    project: Project,
    config: MonkConfig,
    encoder: NoteEventEncoder,
}

impl Session {
    /// Open `project_file` (or start a new project there) with the
    /// directory's `monk.json` settings.
    pub fn open(project_file: &Path) -> Result<Self> {
        let config = MonkConfig::load(&project_dir_of(project_file))?;
        let project = Project::load_or_new(project_file)?;
        Self::with_project(project_file, project, config)
    }

    /// Wrap an existing model.
    pub fn with_project(project_file: &Path, project: Project, config: MonkConfig) -> Result<Self> {
        config.validate()?;
        let encoder = NoteEventEncoder::new(config.ticks_per_beat)?;
        Ok(Self {
            project_file: project_file.to_path_buf(),
            project,
            config,
            encoder,
        })
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn config(&self) -> &MonkConfig {
        &self.config
    }

    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    pub fn project_dir(&self) -> PathBuf {
        project_dir_of(&self.project_file)
    }

    /// Generated MIDI directory. The encoder creates it on first write.
    pub fn midi_dir(&self) -> PathBuf {
        self.project_dir().join(&self.config.midi_dir)
    }

    /// Rendered audio directory, created on demand.
    pub fn renders_dir(&self) -> Result<PathBuf> {
        ensure_dir(self.project_dir().join(&self.config.renders_dir))
    }

    /// Where an external renderer will write this project's audio.
    ///
    /// Relative render targets resolve against the project directory and
    /// a target without an extension gets `.wav`.
    pub fn render_output_path(&self) -> PathBuf {
        let mut path = PathBuf::from(self.project.render_file());
        if path.is_relative() {
            path = self.project_dir().join(path);
        }
        if path.extension().is_none() {
            path.set_extension("wav");
        }
        path
    }

    /// Chord progression using the configured octave, length and velocity.
    pub fn chord_progression(&self, chords: Vec<String>) -> ChordProgression {
        ChordProgression::new(chords)
            .with_beats_per_chord(self.config.default_beats_per_chord)
            .with_octave(self.config.default_octave)
            .with_velocity(self.config.chord_velocity)
    }

    /// Empty drum pattern using the configured bar count and velocity.
    pub fn drum_pattern(&self) -> DrumPattern {
        DrumPattern::new(self.config.default_bars).with_velocity(self.config.drum_velocity)
    }

    /// Persist the project to its file.
    pub fn save(&mut self) -> Result<()> {
        let path = self.project_file.clone();
        self.project.save_as(&path)
    }

    /// Index of the first track named `name`, adding one if none exists.
    pub fn get_or_create_track(&mut self, name: &str) -> usize {
        match self.project.find_track(name) {
            Some(track) => track.index(),
            None => self.project.add_track(name).index(),
        }
    }

    fn midi_path(&self, filename: &str) -> PathBuf {
        self.midi_dir().join(format!("{filename}.mid"))
    }

    /// Encode `notes`, write them as `<filename>.mid` and place the file at
    /// the start of `track_name`, then save.
    ///
    /// The item is checked before the file is written or the track is
    /// resolved, so a file too short to place leaves disk and model as
    /// they were.
    fn write_and_place(&mut self, filename: &str, notes: &[Note], track_name: &str) -> Result<()> {
        let bytes = self.encoder.encode(notes, self.project.tempo())?;
        let length = file_duration(&bytes)?;
        let path = self.midi_path(filename);
        let item = PlacedItem::new(path, 0.0, length)?;

        NoteEventEncoder::write_encoded(&item.path, &bytes)?;
        info!("Wrote {} ({} notes, {:.3}s)", item.path.display(), notes.len(), length);

        let index = self.get_or_create_track(track_name);
        self.project
            .add_item(index, item.path, item.position, Some(item.length))?;
        self.save()
    }

    /// Write `notes` as `<filename>.mid` and place it on `track_name`.
    pub fn create_midi(
        &mut self,
        filename: &str,
        notes: &[Note],
        track_name: &str,
    ) -> Result<ToolReport> {
        let notes = patterns::melody(notes)?;
        self.write_and_place(filename, &notes, track_name)?;

        Ok(ToolReport::changed(
            "create_midi",
            format!(
                "Created {}.mid with {} notes on '{}'",
                filename,
                notes.len(),
                track_name
            ),
        ))
    }

    /// Write a chord progression as `<filename>.mid` and place it on `track_name`.
    pub fn create_chord_progression(
        &mut self,
        filename: &str,
        progression: &ChordProgression,
        track_name: &str,
    ) -> Result<ToolReport> {
        let notes = progression.notes()?;
        self.write_and_place(filename, &notes, track_name)?;

        Ok(ToolReport::changed(
            "create_chord_progression",
            format!(
                "Created {}.mid: {} on '{}'",
                filename,
                progression.chords.join(" -> "),
                track_name
            ),
        ))
    }

    /// Write a drum pattern as `<filename>.mid` and place it on `track_name`.
    pub fn create_drum_pattern(
        &mut self,
        filename: &str,
        pattern: &DrumPattern,
        track_name: &str,
    ) -> Result<ToolReport> {
        let notes = pattern.notes()?;
        self.write_and_place(filename, &notes, track_name)?;

        Ok(ToolReport::changed(
            "create_drum_pattern",
            format!(
                "Created {}.mid: {} ({} bars) on '{}'",
                filename,
                pattern.drum_list().join(", "),
                pattern.bars,
                track_name
            ),
        ))
    }

    /// Change the project tempo within the configured range.
    pub fn set_tempo(&mut self, bpm: f64) -> Result<ToolReport> {
        let (min, max) = (self.config.min_tempo, self.config.max_tempo);
        if !(min..=max).contains(&bpm) {
            return Err(MonkError::TempoOutOfRange { bpm, min, max });
        }

        self.project.set_tempo(bpm);
        self.save()?;
        info!("Tempo set to {} BPM", bpm);
        Ok(ToolReport::changed("set_tempo", format!("Set tempo to {} BPM", bpm)))
    }

    /// Append a track and save.
    pub fn add_track(&mut self, name: &str) -> Result<ToolReport> {
        self.project.add_track(name);
        self.save()?;
        Ok(ToolReport::changed("add_track", format!("Added track '{}'", name)))
    }
}

fn project_dir_of(project_file: &Path) -> PathBuf {
    match project_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&dir).map_err(|e| MonkError::FileWriteError {
        path: dir.clone(),
        source: e,
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::SequentialIdGenerator;
    use approx::assert_relative_eq;
    use tempfile::{tempdir, TempDir};

    fn session() -> (TempDir, Session) {
        let dir = tempdir().unwrap();
        let project = Project::with_id_generator(Box::new(SequentialIdGenerator::new()));
        let session = Session::with_project(
            &dir.path().join("song.rpp"),
            project,
            MonkConfig::default(),
        )
        .unwrap();
        (dir, session)
    }

    #[test]
    fn test_open_new_project() {
        let dir = tempdir().unwrap();
        let session = Session::open(&dir.path().join("song.rpp")).unwrap();
        assert!(session.project().tracks().is_empty());
        assert_eq!(session.project_dir(), dir.path());
    }

    #[test]
    fn test_create_midi_places_item() {
        let (dir, mut session) = session();
        let notes = vec![
            Note::new(60, 0.0, 1.0, 100).unwrap(),
            Note::new(62, 1.0, 1.0, 100).unwrap(),
        ];
        let report = session.create_midi("lead", &notes, "Lead").unwrap();
        assert!(report.made_changes);
        assert_eq!(report.summary, "Created lead.mid with 2 notes on 'Lead'");

        let track = session.project().find_track("Lead").unwrap();
        assert_eq!(track.items().len(), 1);
        assert_eq!(track.items()[0].path, dir.path().join("midi").join("lead.mid"));
        assert_relative_eq!(track.items()[0].length, 1.0, epsilon = 1e-9);
        assert!(dir.path().join("song.rpp").exists());
    }

    #[test]
    fn test_same_track_name_is_reused() {
        let (_dir, mut session) = session();
        let pattern = session.drum_pattern().hit("kick", vec![0.0]);
        session.create_drum_pattern("a", &pattern, "Drums").unwrap();
        session.create_drum_pattern("b", &pattern, "Drums").unwrap();
        assert_eq!(session.project().tracks().len(), 1);
        assert_eq!(session.project().tracks()[0].items().len(), 2);
    }

    #[test]
    fn test_unknown_drum_changes_nothing() {
        let (dir, mut session) = session();
        let pattern = session.drum_pattern().hit("cowbell", vec![0.0]);
        let err = session
            .create_drum_pattern("beat", &pattern, "Drums")
            .unwrap_err();
        assert!(matches!(err, MonkError::UnknownDrumName { .. }));
        assert!(session.project().tracks().is_empty());
        assert!(!dir.path().join("midi").exists());
        assert!(!dir.path().join("song.rpp").exists());
    }

    #[test]
    fn test_empty_melody_changes_nothing() {
        let (dir, mut session) = session();
        let err = session.create_midi("lead", &[], "Lead").unwrap_err();
        assert!(matches!(err, MonkError::InvalidPlacement { .. }));
        assert!(session.project().tracks().is_empty());
        assert!(!dir.path().join("midi").join("lead.mid").exists());
        assert!(!dir.path().join("song.rpp").exists());
    }

    #[test]
    fn test_zero_bar_pattern_changes_nothing() {
        let (dir, mut session) = session();
        session.add_track("Drums").unwrap();
        let mut pattern = session.drum_pattern().hit("kick", vec![0.0]);
        pattern.bars = 0;

        let err = session
            .create_drum_pattern("beat", &pattern, "Drums")
            .unwrap_err();
        assert!(matches!(err, MonkError::InvalidPlacement { .. }));
        assert_eq!(session.project().tracks().len(), 1);
        assert!(session.project().tracks()[0].items().is_empty());
        assert!(!dir.path().join("midi").exists());
    }

    #[test]
    fn test_chord_progression_summary() {
        let (_dir, mut session) = session();
        let progression = session.chord_progression(vec!["Am".into(), "F".into()]);
        let report = session
            .create_chord_progression("pads", &progression, "Pads")
            .unwrap();
        assert_eq!(report.summary, "Created pads.mid: Am -> F on 'Pads'");
    }

    #[test]
    fn test_set_tempo_range() {
        let (_dir, mut session) = session();
        assert!(session.set_tempo(128.0).is_ok());
        assert_eq!(session.project().tempo(), 128.0);

        for bad in [39.9, 240.1, f64::NAN] {
            let err = session.set_tempo(bad).unwrap_err();
            assert!(matches!(err, MonkError::TempoOutOfRange { .. }));
        }
        assert_eq!(session.project().tempo(), 128.0);
    }

    #[test]
    fn test_render_output_path() {
        let (dir, mut session) = session();
        assert_eq!(session.render_output_path(), dir.path().join("render.wav"));

        session.project.set_render_file("out/mix.flac");
        assert_eq!(
            session.render_output_path(),
            dir.path().join("out").join("mix.flac")
        );
    }

    #[test]
    fn test_renders_dir_created() {
        let (dir, session) = session();
        let renders = session.renders_dir().unwrap();
        assert_eq!(renders, dir.path().join("renders"));
        assert!(renders.is_dir());
    }
}
