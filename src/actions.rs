//! Whole-document edits.
//!
//! [`apply`] takes the current project and one [`Action`] and returns the
//! next project. The previous value is never modified, so a caller holding a
//! snapshot for rendering or validation keeps a consistent view.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::auto_structure::auto_structure;
use crate::schema::{Character, Location, Project, Scene, Shot, ASPECT_RATIOS, DEFAULT_FPS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    /// Shallow-merges `payload` onto the top-level document.
    Set { payload: Value },
    Title { value: String },
    Description { value: String },
    Aspect { value: String },
    Duration { value: Value },
    Fps { value: Value },
    Seed { value: String },

    AddCharacter,
    UpdateCharacter { id: String, key: String, value: Value },
    RemoveCharacter { id: String },

    AddLocation,
    UpdateLocation { id: String, key: String, value: Value },
    RemoveLocation { id: String },

    AddScene,
    UpdateScene { id: String, key: String, value: Value },
    RemoveScene { id: String },

    AddShot { scene_id: String },
    UpdateShot {
        scene_id: String,
        shot_id: String,
        key: String,
        value: Value,
    },
    RemoveShot { scene_id: String, shot_id: String },

    SetCine { value: Value },
    SetCineLook { value: Value },

    AutoStructure { text: String },
    Hydrate {
        #[serde(default)]
        value: Option<Project>,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Set { .. } => "set",
            Self::Title { .. } => "title",
            Self::Description { .. } => "description",
            Self::Aspect { .. } => "aspect",
            Self::Duration { .. } => "duration",
            Self::Fps { .. } => "fps",
            Self::Seed { .. } => "seed",
            Self::AddCharacter => "add_character",
            Self::UpdateCharacter { .. } => "update_character",
            Self::RemoveCharacter { .. } => "remove_character",
            Self::AddLocation => "add_location",
            Self::UpdateLocation { .. } => "update_location",
            Self::RemoveLocation { .. } => "remove_location",
            Self::AddScene => "add_scene",
            Self::UpdateScene { .. } => "update_scene",
            Self::RemoveScene { .. } => "remove_scene",
            Self::AddShot { .. } => "add_shot",
            Self::UpdateShot { .. } => "update_shot",
            Self::RemoveShot { .. } => "remove_shot",
            Self::SetCine { .. } => "set_cine",
            Self::SetCineLook { .. } => "set_cine_look",
            Self::AutoStructure { .. } => "auto_structure",
            Self::Hydrate { .. } => "hydrate",
        }
    }
}

pub fn apply(state: &Project, action: Action) -> Project {
    debug!("applying action '{}'", action.name());

    let mut next = state.clone();
    match action {
        Action::Set { payload } => {
            if let Some(project) = merged(state, &payload) {
                next = project;
            }
        }
        Action::Title { value } => next.title = value,
        Action::Description { value } => next.description = value,
        Action::Aspect { value } => {
            if !ASPECT_RATIOS.contains(&value.as_str()) {
                debug!("non-standard aspect ratio '{value}'");
            }
            next.aspect_ratio = value;
        }
        Action::Duration { value } => {
            next.duration_sec = coerce_number(&value)
                .filter(|seconds| *seconds > 0.0)
                .unwrap_or(0.0);
        }
        Action::Fps { value } => {
            next.fps = coerce_number(&value)
                .filter(|fps| *fps > 0.0)
                .unwrap_or(DEFAULT_FPS);
        }
        Action::Seed { value } => next.seed = value,

        Action::AddCharacter => next.characters.push(Character::new("")),
        Action::UpdateCharacter { id, key, value } => {
            if let Some(character) = next.characters.iter_mut().find(|c| c.id == id) {
                replace_field(character, &key, value);
            }
        }
        Action::RemoveCharacter { id } => next.characters.retain(|c| c.id != id),

        Action::AddLocation => next.locations.push(Location::new("")),
        Action::UpdateLocation { id, key, value } => {
            if let Some(location) = next.locations.iter_mut().find(|l| l.id == id) {
                replace_field(location, &key, value);
            }
        }
        Action::RemoveLocation { id } => next.locations.retain(|l| l.id != id),

        Action::AddScene => {
            let location_id = next.default_location_id();
            next.scenes.push(Scene::new("Scene", location_id));
        }
        Action::UpdateScene { id, key, value } => {
            if let Some(scene) = next.scenes.iter_mut().find(|s| s.id == id) {
                replace_field(scene, &key, value);
            }
        }
        Action::RemoveScene { id } => next.scenes.retain(|s| s.id != id),

        Action::AddShot { scene_id } => {
            if let Some(index) = next.scene_index(&scene_id) {
                next.scenes[index].shots.push(Shot::new(""));
            }
        }
        Action::UpdateShot {
            scene_id,
            shot_id,
            key,
            value,
        } => {
            if let Some(index) = next.scene_index(&scene_id) {
                let scene = &mut next.scenes[index];
                if let Some(shot_index) = scene.shot_index(&shot_id) {
                    replace_field(&mut scene.shots[shot_index], &key, value);
                }
            }
        }
        Action::RemoveShot { scene_id, shot_id } => {
            if let Some(index) = next.scene_index(&scene_id) {
                next.scenes[index].shots.retain(|sh| sh.id != shot_id);
            }
        }

        Action::SetCine { value } => {
            if let Some(cinematography) = merged(&state.cinematography, &value) {
                next.cinematography = cinematography;
            }
        }
        Action::SetCineLook { value } => {
            if let Some(look) = merged(&state.cinematography.look, &value) {
                next.cinematography.look = look;
            }
        }

        Action::AutoStructure { text } => next = auto_structure(state, &text),
        Action::Hydrate { value } => {
            if let Some(project) = value {
                next = project;
            }
        }
    }
    next
}

/// Form-style numeric input: numbers pass through, strings are parsed, an
/// empty string reads as zero.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if text.trim().is_empty() => Some(0.0),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Sets one field of an entity by its wire name. The entity is left as-is if
/// the key is `id`, unknown, or the value does not fit the field.
fn replace_field<T>(entity: &mut T, key: &str, value: Value)
where
    T: Serialize + DeserializeOwned,
{
    if key == "id" {
        warn!("ignoring update to entity id");
        return;
    }

    let Ok(Value::Object(mut fields)) = serde_json::to_value(&*entity) else {
        return;
    };
    if !fields.contains_key(key) {
        warn!("ignoring update to unknown field '{key}'");
        return;
    }
    fields.insert(key.to_owned(), value);

    match serde_json::from_value::<T>(Value::Object(fields)) {
        Ok(updated) => *entity = updated,
        Err(error) => warn!("ignoring update to field '{key}': {error}"),
    }
}

/// Shallow merge of a JSON object onto `base`. `None` when `patch` is not an
/// object or the merged value no longer deserializes.
fn merged<T>(base: &T, patch: &Value) -> Option<T>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(patch) = patch else {
        warn!("ignoring merge with a non-object value");
        return None;
    };
    let Value::Object(mut fields) = serde_json::to_value(base).ok()? else {
        return None;
    };
    merge_into(&mut fields, patch);
    match serde_json::from_value(Value::Object(fields)) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!("ignoring merge that no longer fits the document: {error}");
            None
        }
    }
}

fn merge_into(fields: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        fields.insert(key.clone(), value.clone());
    }
}
