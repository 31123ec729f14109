use std::collections::BTreeMap;

use storyloom::app::{Message, Model, update};
use storyloom::story::export::{export_filename, read_story, write_export};
use storyloom::story::{Card, Story};

#[test]
fn test_editor_flow_exports_play_ready_file() {
    // Drive the reducer like a user: set a title, commit two cards and
    // turn the second into an ending.
    let mut model = Model::new((80, 24));
    model = update(model, Message::BeginTitleEdit);
    for ch in "The Long Dark".chars() {
        model = update(model, Message::EditInsertChar(ch));
    }
    model = update(model, Message::CommitEdit);
    model = update(model, Message::SubmitDraft);
    model = update(model, Message::SubmitDraft);
    model = update(model, Message::SwitchFocus);
    model = update(model, Message::SelectLast);
    model = update(model, Message::ToggleEnding);

    let dir = tempfile::tempdir().unwrap();
    let path = write_export(&model.story, dir.path()).unwrap();
    assert!(path.ends_with("the_long_dark.json"));

    let loaded = read_story(&path).unwrap();
    assert_eq!(loaded, model.story);
    assert!(loaded.card(2).unwrap().is_ending());
}

#[test]
fn test_export_writes_exact_pretty_json_bytes() {
    let story = Story {
        title: String::from("Tiny Tale"),
        entries: vec![Card {
            id: 1,
            text: String::from("The end is immediate."),
            options: BTreeMap::new(),
        }],
    };

    let dir = tempfile::tempdir().unwrap();
    let path = write_export(&story, dir.path()).unwrap();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("tiny_tale.json")
    );

    let written = std::fs::read_to_string(&path).unwrap();
    let expected = "{\n  \"title\": \"Tiny Tale\",\n  \"entries\": [\n    {\n      \"id\": 1,\n      \"text\": \"The end is immediate.\",\n      \"options\": {}\n    }\n  ]\n}";
    assert_eq!(written, expected);
}

#[test]
fn test_untitled_story_exports_as_data_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(&Story::default(), dir.path()).unwrap();
    assert_eq!(
        path.file_name().and_then(|name| name.to_str()),
        Some("data.json")
    );
}

#[test]
fn test_export_filename_keeps_unicode() {
    assert_eq!(export_filename("Über Nacht"), "über_nacht.json");
}

#[test]
fn test_read_story_accepts_hand_edited_files() {
    // Play mode reads whatever is on disk, not just our own exports.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hand.json");
    std::fs::write(
        &path,
        r#"{"title":"Hand Made","entries":[{"id":7,"text":"start","options":{"go":{"text":"onward","next_id":99}}}]}"#,
    )
    .unwrap();

    let story = read_story(&path).unwrap();
    assert_eq!(story.title, "Hand Made");
    assert_eq!(story.entries[0].id, 7);
    // A dangling next_id loads untouched; it only matters during play.
    assert_eq!(story.entries[0].options["go"].next_id, 99);
}
