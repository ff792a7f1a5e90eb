use cinebrief::schema::{Character, Scene, Shot};
use cinebrief::{auto_structure, decode_snapshot, encode_snapshot, validate_project, Project};

fn seeded_project() -> Project {
    let mut project = Project::default();
    project.title = "Before".to_owned();
    project.scenes.push(Scene::new("Existing", ""));
    project
}

#[test]
fn title_line_always_wins_over_prior_title() {
    for (text, expected) in [
        ("Title: X", "X"),
        ("title:   Spaced out   ", "Spaced out"),
        ("Scene\nTITLE: Late title", "Late title"),
        ("Title: first\nTitle: second", "second"),
    ] {
        assert_eq!(auto_structure(&seeded_project(), text).title, expected, "{text:?}");
    }
}

#[test]
fn scene_count_grows_by_scene_lines_plus_synthesized_scene() {
    let cases = [
        ("Scene A\nScene B", 2),
        ("scene\nSCENE two\nShot: x", 2),
        ("Shot: orphan\nScene A\nShot: y", 2),
        ("Shot: a\nShot: b", 1),
        ("no markers at all", 0),
    ];
    for (text, added) in cases {
        let base = seeded_project();
        let project = auto_structure(&base, text);
        assert_eq!(project.scenes.len(), base.scenes.len() + added, "{text:?}");
    }
}

#[test]
fn shots_attach_to_nearest_preceding_scene() {
    let project = auto_structure(
        &Project::default(),
        "Scene A\nShot: a1\nShot: a2\nScene B\nScene C\nShot: c1\nShot: c2\nShot: c3",
    );
    let counts = project
        .scenes
        .iter()
        .map(|scene| scene.shots.len())
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![2, 0, 3]);
}

#[test]
fn parser_accepts_arbitrary_input() {
    let inputs = [
        "",
        "\n\n\r\n",
        ":::",
        "Shot",
        "(",
        "dialogue:",
        "Title:",
        "Scene\u{0}\u{7f}",
        "日本語のシーン\nShot: 夜\n台詞",
        "Shot: ünïcödé\nCLOSE UP ß",
    ];
    for text in inputs {
        let project = auto_structure(&Project::default(), text);
        let _ = validate_project(&project);
    }
}

#[test]
fn title_and_scene_warnings_track_state_exactly() {
    let mut project = Project::default();
    project.title = " \t ".to_owned();
    let warnings = validate_project(&project);
    assert!(warnings.contains(&"Project title is empty.".to_owned()));
    assert!(warnings.contains(&"Add at least one scene.".to_owned()));

    project.title = "Named".to_owned();
    let mut scene = Scene::new("One", "");
    scene.shots.push(Shot::new("wide"));
    project.scenes.push(scene);
    assert!(validate_project(&project).is_empty());
}

#[test]
fn missing_character_warning_iff_dangling_reference() {
    let mut project = auto_structure(&Project::default(), "Character: Aya\nScene\nShot: wide");
    let aya = project.characters[0].id.clone();

    project.scenes[0].shots[0].characters = vec![aya.clone()];
    assert!(validate_project(&project).is_empty());

    project.characters.push(Character::new("Ren"));
    project.characters.retain(|character| character.id != aya);
    assert_eq!(
        validate_project(&project),
        vec!["Scene 1 Shot 1 references missing character."]
    );
}

#[test]
fn serialized_project_round_trips_through_snapshot_codec() {
    let project = auto_structure(
        &Project::default(),
        "Title: Café 🎬\nCharacter: Aya\nLocation: Pier\nScene 1: Dawn\nShot: wide\ndolly in\n(softly) hello",
    );
    let text = serde_json::to_string(&project).expect("project should serialize");
    assert_eq!(decode_snapshot(&encode_snapshot(&text)), text);
    assert_eq!(decode_snapshot(""), "");
    assert_eq!(decode_snapshot("!!definitely not base64!!"), "");
}
