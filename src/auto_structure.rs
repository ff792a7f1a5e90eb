//! Best-effort conversion of loosely formatted notes into a [`Project`].
//!
//! Lines are classified one at a time. Structural markers (`Title:`,
//! `Description:`, `Character:`, `Location:`, `Scene`, `Shot`) are checked
//! first; anything else is attached to the scene or shot currently being
//! built, using content keywords to pick the field. Nothing is ever rejected:
//! text that fits nowhere is dropped.

use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use crate::schema::{Character, Location, Project, Scene, Shot};

/// Position of the scene and shot that free-form lines attach to.
///
/// Scenes and shots are only ever appended while parsing, so indices stay
/// valid for the whole pass.
#[derive(Debug, Default, Clone, Copy)]
struct Cursor {
    scene: Option<usize>,
    shot: Option<usize>,
}

#[derive(Debug, Default)]
struct LineTally {
    structural: usize,
    attached: usize,
    dropped: usize,
}

/// Returns a new project with the entities described by `text` appended to
/// `base`. `base` itself is left untouched.
pub fn auto_structure(base: &Project, text: &str) -> Project {
    let mut next = base.clone();
    let mut cursor = Cursor::default();
    let mut tally = LineTally::default();

    for line in split_lines(text) {
        if apply_structural_line(&mut next, &mut cursor, line) {
            tally.structural += 1;
        } else if attach_free_line(&mut next, cursor, line) {
            tally.attached += 1;
        } else {
            tally.dropped += 1;
        }
    }

    debug!(
        "auto-structure: {} structural, {} attached, {} dropped line(s)",
        tally.structural, tally.attached, tally.dropped
    );
    next
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    static NEWLINE_RE: OnceLock<Regex> = OnceLock::new();
    let re = NEWLINE_RE
        .get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("newline regex should compile"));
    re.split(text).map(str::trim).filter(|line| !line.is_empty())
}

fn apply_structural_line(project: &mut Project, cursor: &mut Cursor, line: &str) -> bool {
    if starts_with_ignore_case(line, "title:") {
        project.title = after_first_colon(line).to_owned();
        return true;
    }
    if starts_with_ignore_case(line, "description:") {
        project.description = after_first_colon(line).to_owned();
        return true;
    }
    if starts_with_ignore_case(line, "character:") {
        project
            .characters
            .push(Character::new(after_first_colon(line)));
        return true;
    }
    if starts_with_ignore_case(line, "location:") {
        project.locations.push(Location::new(after_first_colon(line)));
        return true;
    }
    if starts_with_ignore_case(line, "scene") {
        let name = scene_name(line);
        let name = if name.is_empty() {
            numbered_scene_name(project)
        } else {
            name.to_owned()
        };
        cursor.scene = Some(push_scene(project, name));
        cursor.shot = None;
        return true;
    }
    if starts_with_ignore_case(line, "shot") {
        let scene_index = match cursor.scene {
            Some(index) => index,
            None => {
                let name = numbered_scene_name(project);
                let index = push_scene(project, name);
                cursor.scene = Some(index);
                index
            }
        };
        let shots = &mut project.scenes[scene_index].shots;
        shots.push(Shot::new(shot_description(line)));
        cursor.shot = Some(shots.len() - 1);
        return true;
    }
    false
}

fn attach_free_line(project: &mut Project, cursor: Cursor, line: &str) -> bool {
    let Some(scene_index) = cursor.scene else {
        return false;
    };
    let scene = &mut project.scenes[scene_index];
    let Some(shot_index) = cursor.shot else {
        append_joined(&mut scene.synopsis, line, " ");
        return true;
    };
    let shot = &mut scene.shots[shot_index];

    if movement_re().is_match(line) {
        shot.camera.movement = line.to_lowercase();
    } else if framing_re().is_match(line) {
        shot.camera.framing = line.to_owned();
    } else if transition_re().is_match(line) {
        shot.transition.kind = line.to_owned();
    } else if line.starts_with('(') || dialogue_label_re().is_match(line) {
        let spoken = dialogue_label_re().replace(line, "");
        append_joined(&mut shot.dialogue, spoken.trim(), "\n");
    } else if starts_with_ignore_case(line, "music:") {
        shot.audio.music_cue = after_first_colon(line).to_owned();
    } else if starts_with_ignore_case(line, "action:") {
        append_joined(&mut shot.action, after_first_colon(line), "\n");
    } else {
        append_joined(&mut shot.description, line, " ");
    }
    true
}

fn push_scene(project: &mut Project, name: String) -> usize {
    let location_id = project.default_location_id();
    project.scenes.push(Scene::new(name, location_id));
    project.scenes.len() - 1
}

fn numbered_scene_name(project: &Project) -> String {
    format!("Scene {}", project.scenes.len() + 1)
}

/// Strips only the leading `scene` token and the whitespace after it, so
/// `Scene 1: Market chase` keeps `1: Market chase`.
fn scene_name(line: &str) -> &str {
    static SCENE_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = SCENE_TOKEN_RE
        .get_or_init(|| Regex::new(r"(?i)^scene\s*").expect("scene token regex should compile"));
    strip_match(re, line)
}

/// Strips the leading `shot` token plus one optional `:` separator.
fn shot_description(line: &str) -> &str {
    static SHOT_TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    let re = SHOT_TOKEN_RE.get_or_init(|| {
        Regex::new(r"(?i)^shot\s*(?::\s*)?").expect("shot token regex should compile")
    });
    strip_match(re, line)
}

fn strip_match<'a>(re: &Regex, line: &'a str) -> &'a str {
    let rest = match re.find(line) {
        Some(found) => &line[found.end()..],
        None => line,
    };
    rest.trim()
}

fn movement_re() -> &'static Regex {
    static MOVEMENT_RE: OnceLock<Regex> = OnceLock::new();
    MOVEMENT_RE.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)(dolly|pan|tilt|handheld|steadicam|gimbal)(?-u:\b)")
            .expect("movement regex should compile")
    })
}

fn framing_re() -> &'static Regex {
    static FRAMING_RE: OnceLock<Regex> = OnceLock::new();
    FRAMING_RE.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)cu(?-u:\b)|close[- ]up|medium|wide")
            .expect("framing regex should compile")
    })
}

fn transition_re() -> &'static Regex {
    static TRANSITION_RE: OnceLock<Regex> = OnceLock::new();
    TRANSITION_RE.get_or_init(|| {
        Regex::new(r"(?i)(?-u:\b)cut to|fade|dissolve|wipe(?-u:\b)")
            .expect("transition regex should compile")
    })
}

fn dialogue_label_re() -> &'static Regex {
    static DIALOGUE_RE: OnceLock<Regex> = OnceLock::new();
    DIALOGUE_RE
        .get_or_init(|| Regex::new(r"(?i)dialogue:").expect("dialogue regex should compile"))
}

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn after_first_colon(line: &str) -> &str {
    line.split_once(':')
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default()
}

fn append_joined(field: &mut String, text: &str, separator: &str) {
    if !field.is_empty() {
        field.push_str(separator);
    }
    field.push_str(text);
}
