//! Reaper project text -> block tree -> [`Project`].
//!
//! The format nests blocks opened by `<TAG attrs...` and closed by a bare
//! `>`; every other line is a directive (`KEY args...`). The tokenizer
//! tracks nesting depth explicitly so a closer always ends the innermost
//! open block, however deep.

use std::path::PathBuf;

use log::{debug, warn};

use super::ids::{parse_guid, IdGenerator};
use super::model::{PlacedItem, Project, TimeSignature, Track};

/// One `KEY args...` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub key: String,
    pub args: Vec<String>,
}

impl Directive {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }
}

/// A `<TAG ...>` block with its directives and nested blocks in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub tag: String,
    pub attrs: Vec<String>,
    pub directives: Vec<Directive>,
    pub children: Vec<Block>,
}

impl Block {
    fn open(tokens: Vec<String>) -> Self {
        let mut tokens = tokens.into_iter();
        Self {
            tag: tokens.next().unwrap_or_default(),
            attrs: tokens.collect(),
            ..Self::default()
        }
    }

    /// First directive with `key` directly inside this block.
    pub fn directive(&self, key: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.key == key)
    }

    /// Child blocks tagged `tag`.
    pub fn children_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }
}

/// Split a line into tokens. A token starting with `"`, `'` or a backtick
/// runs to the matching quote and loses the quotes.
fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut token = String::new();
        if matches!(c, '"' | '\'' | '`') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == c {
                    break;
                }
                token.push(ch);
            }
        } else {
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                token.push(ch);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

/// Build the block tree for a whole document.
///
/// The returned root has an empty tag and holds top-level blocks (normally
/// a single `REAPER_PROJECT`). Stray closers are ignored and blocks left
/// open at the end of input are closed.
pub fn parse_blocks(text: &str) -> Block {
    let mut stack = vec![Block::default()];

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line == ">" {
            if stack.len() > 1 {
                if let Some(block) = stack.pop() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(block);
                    }
                }
            } else {
                debug!("Ignoring unmatched '>' on line {}", line_no + 1);
            }
        } else if let Some(rest) = line.strip_prefix('<') {
            stack.push(Block::open(tokenize(rest)));
        } else {
            let mut tokens = tokenize(line).into_iter();
            if let Some(key) = tokens.next() {
                if let Some(block) = stack.last_mut() {
                    block.directives.push(Directive {
                        key,
                        args: tokens.collect(),
                    });
                }
            }
        }
    }

    if stack.len() > 1 {
        warn!("{} block(s) left open at end of project text", stack.len() - 1);
    }
    while stack.len() > 1 {
        if let Some(block) = stack.pop() {
            if let Some(parent) = stack.last_mut() {
                parent.children.push(block);
            }
        }
    }

    stack.pop().unwrap_or_default()
}

/// Parse project text into a model, tolerating bad or missing metadata.
pub(super) fn read_project(text: &str, ids: Box<dyn IdGenerator>) -> Project {
    let root = parse_blocks(text);
    let mut project = Project::with_id_generator(ids);
    collect(&root, &mut project);
    project
}

/// Walk everything outside `TRACK` blocks for metadata; each `TRACK`
/// becomes a track.
fn collect(block: &Block, project: &mut Project) {
    for directive in &block.directives {
        apply_metadata(directive, project);
    }
    for child in &block.children {
        if child.tag == "TRACK" {
            let track = read_track(child, project);
            project.tracks.push(track);
        } else {
            collect(child, project);
        }
    }
}

fn apply_metadata(directive: &Directive, project: &mut Project) {
    match directive.key.as_str() {
        "TEMPO" => {
            match directive.arg(0).and_then(|a| a.parse::<f64>().ok()) {
                Some(bpm) if bpm.is_finite() && bpm > 0.0 => project.tempo = bpm,
                _ => warn!("Unreadable TEMPO {:?}, keeping {}", directive.args, project.tempo),
            }
            let numerator = directive.arg(1).and_then(|a| a.parse::<u32>().ok());
            let denominator = directive.arg(2).and_then(|a| a.parse::<u32>().ok());
            if let (Some(numerator), Some(denominator)) = (numerator, denominator) {
                if numerator > 0 && denominator > 0 {
                    project.time_signature = TimeSignature {
                        numerator,
                        denominator,
                    };
                }
            }
        }
        "SAMPLERATE" => match directive.arg(0).and_then(|a| a.parse::<u32>().ok()) {
            Some(rate) if rate > 0 => project.sample_rate = rate,
            _ => warn!(
                "Unreadable SAMPLERATE {:?}, keeping {}",
                directive.args, project.sample_rate
            ),
        },
        "RENDER_FILE" => match directive.arg(0) {
            Some(stem) if !stem.is_empty() => project.render_file = stem.to_string(),
            _ => debug!("Empty RENDER_FILE, keeping '{}'", project.render_file),
        },
        _ => {}
    }
}

fn read_track(block: &Block, project: &Project) -> Track {
    let index = project.tracks.len();

    let parsed_id = block
        .attrs
        .first()
        .and_then(|a| parse_guid(a))
        .or_else(|| {
            block
                .directive("TRACKID")
                .and_then(|d| d.arg(0))
                .and_then(parse_guid)
        })
        .filter(|id| !project.tracks.iter().any(|t| t.id == *id));
    let id = parsed_id.unwrap_or_else(|| {
        debug!("Track {} has no usable id, assigning a fresh one", index + 1);
        project.fresh_track_id()
    });

    let name = block
        .directive("NAME")
        .and_then(|d| d.arg(0))
        .map(str::to_string)
        .unwrap_or_else(|| format!("Track {}", index + 1));

    let mut track = Track::new(name, index, id);
    track.items = block.children_tagged("ITEM").filter_map(read_item).collect();
    track
}

fn read_item(block: &Block) -> Option<PlacedItem> {
    let number = |key: &str| {
        block
            .directive(key)
            .and_then(|d| d.arg(0))
            .and_then(|a| a.parse::<f64>().ok())
    };

    let file = block
        .children_tagged("SOURCE")
        .find_map(|source| source.directive("FILE").and_then(|d| d.arg(0)));
    let Some(file) = file else {
        warn!("Skipping item with no source file");
        return None;
    };

    let position = number("POSITION").unwrap_or(0.0);
    let length = number("LENGTH").unwrap_or(0.0);
    match PlacedItem::new(PathBuf::from(file), position, length) {
        Ok(item) => Some(item),
        Err(e) => {
            warn!("Skipping item {}: {}", file, e);
            None
        }
    }
}
