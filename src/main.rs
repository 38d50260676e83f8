//! Monk CLI
//!
//! Command-line front end for MIDI generation and Reaper project editing.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use monk::cli::{commands, Cli, Commands};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    debug!("Monk v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command)
}

fn handle_command(cmd: Commands) -> anyhow::Result<()> {
    match cmd {
        Commands::New { project } => commands::new_project(&project)
            .with_context(|| format!("creating {}", project.display())),
        Commands::Info { project } => commands::show_info(&project)
            .with_context(|| format!("reading {}", project.display())),
        Commands::Tempo { project, bpm } => commands::set_tempo(&project, bpm)
            .with_context(|| format!("setting tempo in {}", project.display())),
        Commands::AddTrack { project, name } => commands::add_track(&project, &name)
            .with_context(|| format!("adding track to {}", project.display())),
        Commands::Chords {
            project,
            file,
            track,
            beats_per_chord,
            octave,
            chords,
        } => commands::chords(&project, &file, &track, chords, beats_per_chord, octave)
            .with_context(|| format!("writing chords to {}", project.display())),
        Commands::Drums {
            project,
            file,
            track,
            bars,
            hits,
        } => commands::drums(&project, &file, &track, hits, bars)
            .with_context(|| format!("writing drums to {}", project.display())),
        Commands::Melody {
            project,
            file,
            track,
            notes,
        } => commands::melody(&project, &file, &track, &notes)
            .with_context(|| format!("writing melody to {}", project.display())),
        Commands::Pitch { name } => Ok(commands::pitch(&name)?),
    }
}
