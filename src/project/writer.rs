//! [`Project`] -> Reaper project text.
//!
//! Always a full regeneration: fixed boilerplate, the model's metadata,
//! then one block per track. Nothing from a previously loaded file is
//! carried over.

use super::ids::format_guid;
use super::model::{PlacedItem, Project, Track};

/// Quote a string with a delimiter it does not contain.
///
/// Directives are one per line, so control characters (line breaks
/// included) become spaces.
fn quote(value: &str) -> String {
    let value: String = value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let value = value.as_str();
    let delimiter = ['"', '\'', '`']
        .into_iter()
        .find(|q| !value.contains(*q))
        .unwrap_or('"');
    let cleaned: String = if value.contains(delimiter) {
        value.chars().filter(|c| *c != delimiter).collect()
    } else {
        value.to_string()
    };
    format!("{delimiter}{cleaned}{delimiter}")
}

pub(super) fn render_project(project: &Project) -> String {
    let mut lines: Vec<String> = vec![
        r#"<REAPER_PROJECT 0.1 "7.0" 1704067200"#.to_string(),
        "  RIPPLE 0".to_string(),
        "  GROUPOVERRIDE 0 0 0".to_string(),
        "  AUTOXFADE 1".to_string(),
        format!("  SAMPLERATE {} 0 0", project.sample_rate),
        format!(
            "  TEMPO {} {} {}",
            project.tempo, project.time_signature.numerator, project.time_signature.denominator
        ),
        "  PLAYRATE 1 0 0.25 4".to_string(),
        "  MASTERTRACKHEIGHT 0 0".to_string(),
        "  MASTERTRACKVIEW 0 0.6667 0.5 0.5 -1 -1 -1 0 0 0 -1 -1 0".to_string(),
        "  MASTERHWOUT 0 0 1 0 0 0 0 -1".to_string(),
        "  MASTER_NCH 2 2".to_string(),
        "  MASTER_VOLUME 1 0 -1 -1 1".to_string(),
        "  MASTER_FX 1".to_string(),
        "  MASTER_SEL 0".to_string(),
        format!("  RENDER_FILE {}", quote(&project.render_file)),
        r#"  RENDER_PATTERN """#.to_string(),
        "  RENDER_FMT 0 2 0".to_string(),
        "  RENDER_1X 0".to_string(),
        "  RENDER_RANGE 1 0 0 18 1000".to_string(),
        "  RENDER_RESAMPLE 3 0 1".to_string(),
        "  RENDER_ADDTOPROJ 0".to_string(),
        "  RENDER_STEMS 0".to_string(),
        "  RENDER_DITHER 0".to_string(),
    ];

    for track in &project.tracks {
        render_track(project, track, &mut lines);
    }

    lines.push(">".to_string());
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn render_track(project: &Project, track: &Track, lines: &mut Vec<String>) {
    let guid = format_guid(&track.id);
    lines.extend([
        format!("  <TRACK {guid}"),
        format!("    NAME {}", quote(&track.name)),
        "    PEAKCOL 16576".to_string(),
        "    BEAT -1".to_string(),
        "    AUTOMODE 0".to_string(),
        "    VOLPAN 1 0 -1 -1 1".to_string(),
        "    REC 0 0 1 0 0 0 0 0".to_string(),
        "    VU 2".to_string(),
        "    NCHAN 2".to_string(),
        "    FX 1".to_string(),
        format!("    TRACKID {guid}"),
        "    PERF 0".to_string(),
        "    MIDIOUT -1".to_string(),
        "    MAINSEND 1 0".to_string(),
    ]);

    if track.has_synth() {
        render_synth(project, lines);
    }
    for item in &track.items {
        render_item(project, item, lines);
    }

    lines.push("  >".to_string());
}

/// ReaSynth with a plain saw patch, so MIDI tracks render audibly.
fn render_synth(project: &Project, lines: &mut Vec<String>) {
    let fx_id = format_guid(&project.next_id());
    lines.extend([
        "    <FXCHAIN".to_string(),
        "      SHOW 0".to_string(),
        "      LASTSEL 0".to_string(),
        "      DOCKED 0".to_string(),
        "      BYPASS 0 0 0".to_string(),
        r#"      <VST "VSTi: ReaSynth (Cockos)" reasynth.vst.dylib 0 "" 1919251321<5653546872736E7265617379>"#.to_string(),
        "        eXNlcu5e7f4CAAAAAQAAAAAAAAACAAAAAAAAAAIAAAABAAAAAAAAAAIAAAAAAAAAPAAAAAAAAAAAABA".to_string(),
        "        AAAAAAAAAAAAQAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
        "        AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string(),
        "        AAAQAAAA".to_string(),
        "      >".to_string(),
        "      FLOATPOS 0 0 0 0".to_string(),
        format!("      FXID {fx_id}"),
        "      WAK 0 0".to_string(),
        "    >".to_string(),
    ]);
}

fn render_item(project: &Project, item: &PlacedItem, lines: &mut Vec<String>) {
    let item_guid = format_guid(&project.next_id());
    let take_guid = format_guid(&project.next_id());
    lines.extend([
        "    <ITEM".to_string(),
        format!("      POSITION {}", item.position),
        "      SNAPOFFS 0".to_string(),
        format!("      LENGTH {}", item.length),
        "      LOOP 1".to_string(),
        "      ALLTAKES 0".to_string(),
        "      FADEIN 1 0.01 0 1 0 0 0".to_string(),
        "      FADEOUT 1 0.01 0 1 0 0 0".to_string(),
        "      MUTE 0 0".to_string(),
        "      SEL 0".to_string(),
        format!("      IGUID {item_guid}"),
        "      IID 1".to_string(),
        format!("      NAME {}", quote(&item.name())),
        "      VOLPAN 1 0 1 -1".to_string(),
        "      PLAYRATE 1 1 0 -1 0 0.0025".to_string(),
        "      CHANMODE 0".to_string(),
        format!("      GUID {take_guid}"),
        "      <SOURCE MIDI".to_string(),
        "        HASDATA 1 960 QN".to_string(),
        format!("        FILE {}", quote(&item.path.to_string_lossy())),
        "      >".to_string(),
        "    >".to_string(),
    ]);
}
