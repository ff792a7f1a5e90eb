//! Project document shape.
//!
//! Field names and nesting are the wire contract consumed by the generation
//! pipeline, so every struct serializes in camelCase and in declaration order.
//! Every container is `#[serde(default)]`: a partial document hydrates with the
//! remaining fields filled from the defaults below.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ids::{uid, CHARACTER_PREFIX, LOCATION_PREFIX, SCENE_PREFIX, SHOT_PREFIX};

pub const DEFAULT_MODEL: &str = "veo-3.1";
pub const DEFAULT_TITLE: &str = "Untitled Project";
pub const DEFAULT_ASPECT_RATIO: &str = "16:9";
pub const DEFAULT_DURATION_SEC: f64 = 30.0;
pub const DEFAULT_FPS: f64 = 24.0;
pub const DEFAULT_SHOT_DURATION_SEC: f64 = 3.0;

/// Aspect ratios offered to authors. Not enforced on the document.
pub const ASPECT_RATIOS: [&str; 4] = ["16:9", "9:16", "1:1", "2.39:1"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub model: String,
    pub title: String,
    pub description: String,
    pub aspect_ratio: String,
    #[serde(serialize_with = "json_number::serialize")]
    pub duration_sec: f64,
    #[serde(serialize_with = "json_number::serialize")]
    pub fps: f64,
    pub seed: String,
    pub characters: Vec<Character>,
    pub locations: Vec<Location>,
    pub scenes: Vec<Scene>,
    pub cinematography: Cinematography,
    pub constraints: Constraints,
    pub output: OutputInfo,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            title: DEFAULT_TITLE.to_owned(),
            description: String::new(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_owned(),
            duration_sec: DEFAULT_DURATION_SEC,
            fps: DEFAULT_FPS,
            seed: String::new(),
            characters: Vec::new(),
            locations: Vec::new(),
            scenes: Vec::new(),
            cinematography: Cinematography::default(),
            constraints: Constraints::default(),
            output: OutputInfo::default(),
        }
    }
}

impl Project {
    pub fn character_ids(&self) -> HashSet<&str> {
        self.characters
            .iter()
            .map(|character| character.id.as_str())
            .collect()
    }

    /// Id a freshly created scene points at: the first location, or empty.
    pub fn default_location_id(&self) -> String {
        self.locations
            .first()
            .map(|location| location.id.clone())
            .unwrap_or_default()
    }

    pub fn scene_index(&self, scene_id: &str) -> Option<usize> {
        self.scenes.iter().position(|scene| scene.id == scene_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub role: String,
    pub description: String,
    pub appearance: String,
    pub wardrobe: String,
    pub voice: String,
    pub personality: String,
    pub consistency_tags: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uid(CHARACTER_PREFIX),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
    Dusk,
    Dawn,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weather {
    #[default]
    Clear,
    Rain,
    Fog,
    Snow,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    pub time_of_day: TimeOfDay,
    pub weather: Weather,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uid(LOCATION_PREFIX),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Scene {
    pub id: String,
    pub name: String,
    pub synopsis: String,
    /// Weak reference into `Project::locations`; may be empty or dangling.
    pub location_id: String,
    pub continuity_notes: String,
    pub shots: Vec<Shot>,
}

impl Scene {
    pub fn new(name: impl Into<String>, location_id: impl Into<String>) -> Self {
        Self {
            id: uid(SCENE_PREFIX),
            name: name.into(),
            location_id: location_id.into(),
            ..Self::default()
        }
    }

    pub fn shot_index(&self, shot_id: &str) -> Option<usize> {
        self.shots.iter().position(|shot| shot.id == shot_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Shot {
    pub id: String,
    pub description: String,
    #[serde(serialize_with = "json_number::serialize")]
    pub duration_sec: f64,
    /// Weak references into `Project::characters`.
    pub characters: Vec<String>,
    pub action: String,
    pub dialogue: String,
    pub camera: Camera,
    pub lighting: Lighting,
    pub composition: Composition,
    pub vfx: Vfx,
    pub audio: Audio,
    pub transition: Transition,
}

impl Default for Shot {
    fn default() -> Self {
        Self {
            id: String::new(),
            description: String::new(),
            duration_sec: DEFAULT_SHOT_DURATION_SEC,
            characters: Vec::new(),
            action: String::new(),
            dialogue: String::new(),
            camera: Camera::default(),
            lighting: Lighting::default(),
            composition: Composition::default(),
            vfx: Vfx::default(),
            audio: Audio::default(),
            transition: Transition::default(),
        }
    }
}

impl Shot {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: uid(SHOT_PREFIX),
            description: description.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Camera {
    pub framing: String,
    pub movement: String,
    pub angle: String,
    #[serde(serialize_with = "json_number::serialize")]
    pub lens_mm: f64,
    pub focus: String,
    pub shutter: String,
    #[serde(serialize_with = "json_number::serialize")]
    pub iso: f64,
    pub white_balance: String,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            framing: "medium".to_owned(),
            movement: "static".to_owned(),
            angle: "eye-level".to_owned(),
            lens_mm: 35.0,
            focus: "subject".to_owned(),
            shutter: "180°".to_owned(),
            iso: 800.0,
            white_balance: "5600K".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lighting {
    pub style: String,
    pub key: String,
    pub fill: String,
    pub rim: String,
    pub practicals: String,
    pub color_temp: String,
    pub source: String,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            style: "soft key, moody fill".to_owned(),
            key: "key 45°".to_owned(),
            fill: "gentle".to_owned(),
            rim: "subtle".to_owned(),
            practicals: "warm practicals".to_owned(),
            color_temp: "3200K".to_owned(),
            source: "softbox".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Composition {
    pub rule_of_thirds: bool,
    pub symmetry: bool,
    pub depth: String,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            rule_of_thirds: true,
            symmetry: false,
            depth: "foreground elements".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vfx {
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Audio {
    pub music_cue: String,
    pub sfx: String,
    pub ambience: String,
}

impl Default for Audio {
    fn default() -> Self {
        Self {
            music_cue: "cinematic underscore".to_owned(),
            sfx: String::new(),
            ambience: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transition {
    #[serde(rename = "type")]
    pub kind: String,
    /// Weak reference into `Project::scenes`.
    pub to_scene_id: String,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            kind: "cut".to_owned(),
            to_scene_id: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Cinematography {
    pub look: Look,
    pub camera_body: String,
    pub lens_set: String,
    pub color_palette: String,
    pub references: Vec<String>,
}

impl Default for Cinematography {
    fn default() -> Self {
        Self {
            look: Look::default(),
            camera_body: "ARRI Alexa Mini LF".to_owned(),
            lens_set: "Cooke S4/i Primes".to_owned(),
            color_palette: "Teal & Orange".to_owned(),
            references: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Look {
    pub grade: String,
    pub saturation: String,
    pub contrast: String,
    pub film_grain: String,
}

impl Default for Look {
    fn default() -> Self {
        Self {
            grade: "Kodak 5219 emulation".to_owned(),
            saturation: "medium".to_owned(),
            contrast: "medium-high".to_owned(),
            film_grain: "subtle".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    pub safety: String,
    pub content: String,
    pub brand: String,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            safety: "Avoid harmful content; maintain brand-safe output.".to_owned(),
            content: "No explicit content. No violence beyond PG-13.".to_owned(),
            brand: "Cinematic, polished, premium texture.".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputInfo {
    pub format: String,
    pub version: String,
}

impl Default for OutputInfo {
    fn default() -> Self {
        Self {
            format: "json".to_owned(),
            version: "1.0".to_owned(),
        }
    }
}

/// Whole numbers go out as JSON integers (`30`, not `30.0`) so the document
/// matches what downstream consumers already parse.
mod json_number {
    use serde::Serializer;

    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() && value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Project, Scene, Shot, TimeOfDay, Weather};

    #[test]
    fn default_project_serializes_with_wire_field_names() {
        let value = serde_json::to_value(Project::default()).expect("project should serialize");
        assert_eq!(value["model"], json!("veo-3.1"));
        assert_eq!(value["title"], json!("Untitled Project"));
        assert_eq!(value["aspectRatio"], json!("16:9"));
        assert_eq!(value["durationSec"], json!(30));
        assert_eq!(value["fps"], json!(24));
        assert_eq!(value["characters"], json!([]));
        assert_eq!(
            value["cinematography"]["look"]["filmGrain"],
            json!("subtle")
        );
        assert_eq!(value["output"], json!({ "format": "json", "version": "1.0" }));
    }

    #[test]
    fn top_level_keys_keep_document_order() {
        let text = serde_json::to_string(&Project::default()).expect("project should serialize");
        let keys = [
            "\"model\"",
            "\"title\"",
            "\"description\"",
            "\"aspectRatio\"",
            "\"durationSec\"",
            "\"fps\"",
            "\"seed\"",
            "\"characters\"",
            "\"locations\"",
            "\"scenes\"",
            "\"cinematography\"",
            "\"constraints\"",
            "\"output\"",
        ];
        let positions = keys
            .iter()
            .map(|key| text.find(key).expect("key should be present"))
            .collect::<Vec<_>>();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn new_shot_carries_full_defaults() {
        let shot = Shot::new("establishing");
        assert!(shot.id.starts_with("sht_"));
        let value = serde_json::to_value(&shot).expect("shot should serialize");
        assert_eq!(value["durationSec"], json!(3));
        assert_eq!(value["camera"]["lensMm"], json!(35));
        assert_eq!(value["camera"]["iso"], json!(800));
        assert_eq!(value["camera"]["movement"], json!("static"));
        assert_eq!(value["lighting"]["colorTemp"], json!("3200K"));
        assert_eq!(value["composition"]["ruleOfThirds"], json!(true));
        assert_eq!(value["audio"]["musicCue"], json!("cinematic underscore"));
        assert_eq!(value["transition"], json!({ "type": "cut", "toSceneId": "" }));
    }

    #[test]
    fn fractional_numbers_survive_serialization() {
        let mut project = Project::default();
        project.fps = 23.976;
        let value = serde_json::to_value(&project).expect("project should serialize");
        assert_eq!(value["fps"], json!(23.976));
    }

    #[test]
    fn fractional_camera_numbers_hydrate() {
        let project: Project = serde_json::from_value(json!({
            "scenes": [{ "shots": [{ "camera": { "lensMm": 85.5, "iso": 640.5 } }] }]
        }))
        .expect("fractional lens should hydrate");
        let camera = &project.scenes[0].shots[0].camera;
        assert_eq!(camera.lens_mm, 85.5);
        assert_eq!(camera.iso, 640.5);
        assert_eq!(camera.framing, "medium");

        let value = serde_json::to_value(&project).expect("project should serialize");
        assert_eq!(value["scenes"][0]["shots"][0]["camera"]["lensMm"], json!(85.5));
    }

    #[test]
    fn partial_document_hydrates_with_defaults() {
        let project: Project = serde_json::from_value(json!({
            "title": "Neon Runner",
            "locations": [{ "id": "loc_a", "name": "Market", "timeOfDay": "dusk", "weather": "rain" }],
            "scenes": [{ "id": "scn_a", "shots": [{ "id": "sht_a" }] }]
        }))
        .expect("partial document should hydrate");

        assert_eq!(project.title, "Neon Runner");
        assert_eq!(project.model, "veo-3.1");
        assert_eq!(project.locations[0].time_of_day, TimeOfDay::Dusk);
        assert_eq!(project.locations[0].weather, Weather::Rain);
        let shot = &project.scenes[0].shots[0];
        assert_eq!(shot.duration_sec, 3.0);
        assert_eq!(shot.camera.framing, "medium");
    }

    #[test]
    fn scene_lookup_helpers_find_by_id() {
        let mut project = Project::default();
        let mut scene = Scene::new("Opening", "");
        let shot = Shot::new("wide");
        let shot_id = shot.id.clone();
        scene.shots.push(shot);
        let scene_id = scene.id.clone();
        project.scenes.push(scene);

        let index = project.scene_index(&scene_id).expect("scene should be found");
        assert_eq!(project.scenes[index].shot_index(&shot_id), Some(0));
        assert_eq!(project.scene_index("scn_missing"), None);
    }

    #[test]
    fn unknown_enum_value_is_rejected() {
        let result = serde_json::from_value::<Project>(json!({
            "locations": [{ "timeOfDay": "noon" }]
        }));
        assert!(result.is_err());
    }
}
