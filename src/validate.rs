use serde::Serialize;

use crate::schema::Project;

/// Advisory findings for a project, in reporting order.
///
/// Warnings never block export; they flag gaps an author usually wants to fill
/// before handing the brief to a generation pipeline.
pub fn validate_project(project: &Project) -> Vec<String> {
    let mut warnings = Vec::new();

    if project.title.trim().is_empty() {
        warnings.push("Project title is empty.".to_owned());
    }
    if project.scenes.is_empty() {
        warnings.push("Add at least one scene.".to_owned());
    }

    for (scene_index, scene) in project.scenes.iter().enumerate() {
        if scene.shots.is_empty() {
            warnings.push(format!("Scene {} has no shots.", scene_index + 1));
        }
        for (shot_index, shot) in scene.shots.iter().enumerate() {
            if shot.description.trim().is_empty() && shot.action.trim().is_empty() {
                warnings.push(format!(
                    "Scene {} Shot {} has no description.",
                    scene_index + 1,
                    shot_index + 1
                ));
            }
        }
    }

    // One warning per dangling reference, after all structural findings.
    let character_ids = project.character_ids();
    for (scene_index, scene) in project.scenes.iter().enumerate() {
        for (shot_index, shot) in scene.shots.iter().enumerate() {
            for character_id in &shot.characters {
                if !character_ids.contains(character_id.as_str()) {
                    warnings.push(format!(
                        "Scene {} Shot {} references missing character.",
                        scene_index + 1,
                        shot_index + 1
                    ));
                }
            }
        }
    }

    warnings
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub ok: bool,
    pub warning_count: usize,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn for_project(project: &Project) -> Self {
        let warnings = validate_project(project);
        Self {
            ok: warnings.is_empty(),
            warning_count: warnings.len(),
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_project, ValidationReport};
    use crate::schema::{Character, Project, Scene, Shot};

    fn project_with_scene(shots: Vec<Shot>) -> Project {
        let mut project = Project::default();
        let mut scene = Scene::new("Opening", "");
        scene.shots = shots;
        project.scenes.push(scene);
        project
    }

    #[test]
    fn default_project_only_needs_a_scene() {
        assert_eq!(
            validate_project(&Project::default()),
            vec!["Add at least one scene."]
        );
    }

    #[test]
    fn whitespace_title_is_reported_first() {
        let mut project = Project::default();
        project.title = "   ".to_owned();
        assert_eq!(
            validate_project(&project),
            vec!["Project title is empty.", "Add at least one scene."]
        );
    }

    #[test]
    fn empty_scene_and_blank_shot_are_reported_with_positions() {
        let mut project = project_with_scene(vec![Shot::new("wide"), Shot::new("  ")]);
        project.scenes.push(Scene::new("Empty", ""));
        assert_eq!(
            validate_project(&project),
            vec![
                "Scene 1 Shot 2 has no description.",
                "Scene 2 has no shots."
            ]
        );
    }

    #[test]
    fn action_alone_counts_as_description() {
        let mut shot = Shot::new("");
        shot.action = "she jumps".to_owned();
        assert!(validate_project(&project_with_scene(vec![shot])).is_empty());
    }

    #[test]
    fn missing_character_is_reported_once_per_dangling_id() {
        let aya = Character::new("Aya");
        let mut shot = Shot::new("two-shot");
        shot.characters = vec![aya.id.clone(), "char_gone01".to_owned(), "char_gone02".to_owned()];
        let mut project = project_with_scene(vec![Shot::new("wide"), shot]);
        project.characters.push(aya);

        assert_eq!(
            validate_project(&project),
            vec![
                "Scene 1 Shot 2 references missing character.",
                "Scene 1 Shot 2 references missing character."
            ]
        );
    }

    #[test]
    fn reference_warnings_follow_structural_warnings() {
        let mut dangling = Shot::new("wide");
        dangling.characters.push("char_none".to_owned());
        let mut project = project_with_scene(vec![dangling]);
        project.scenes.push(Scene::new("Empty", ""));

        assert_eq!(
            validate_project(&project),
            vec![
                "Scene 2 has no shots.",
                "Scene 1 Shot 1 references missing character."
            ]
        );
    }

    #[test]
    fn report_summarizes_warnings() {
        let report = ValidationReport::for_project(&project_with_scene(vec![Shot::new("wide")]));
        assert!(report.ok);
        assert_eq!(report.warning_count, 0);

        let report = ValidationReport::for_project(&Project::default());
        assert!(!report.ok);
        assert_eq!(report.warnings, vec!["Add at least one scene."]);
    }
}
