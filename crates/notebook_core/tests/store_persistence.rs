mod common;

use common::Fixture;
use notebook_core::{FileStore, NoteRepository, NoteTree, NotesLookup, StoreError};
use std::fs;

#[test]
fn save_then_load_reproduces_tree() {
    let fixture = Fixture::new();
    let mut repo = NoteRepository::open(fixture.store()).unwrap();
    repo.add_note("Cats", "first", "purr", None).unwrap();
    repo.add_note("dogs", "second", "", Some("https://example.org/?curid=9"))
        .unwrap();
    repo.add_note("cats", "third", "meow", None).unwrap();
    let before = repo.tree().clone();

    let reloaded = fixture.store().load().unwrap();
    assert_eq!(reloaded, before);

    fixture.store().save(&reloaded).unwrap();
    assert_eq!(fixture.store().load().unwrap(), before);
}

#[test]
fn reopen_sees_every_successful_add() {
    let fixture = Fixture::new();
    {
        let mut repo = NoteRepository::open(fixture.store()).unwrap();
        repo.add_note("rust", "ownership", "borrowck", None).unwrap();
    }

    let repo = NoteRepository::open(fixture.store()).unwrap();
    let NotesLookup::Notes(notes) = repo.get_notes("RUST") else {
        panic!("expected notes after reopen");
    };
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "ownership");
}

#[test]
fn corrupt_file_recovers_to_empty_and_stays_well_formed() {
    let fixture = Fixture::new();
    fs::write(&fixture.path, "<data><topic name='x'>").unwrap();

    let repo = NoteRepository::open(fixture.store()).unwrap();
    assert!(repo.topic_names().is_empty());

    let raw = fs::read_to_string(&fixture.path).unwrap();
    let parsed: NoteTree = serde_json::from_str(&raw).unwrap();
    assert!(parsed.topics.is_empty());
}

#[test]
fn hand_edited_notes_degrade_missing_fields() {
    let fixture = Fixture::new();
    fs::write(
        &fixture.path,
        r#"{"topics":[{"name":"manual","notes":[{"title":"no body"},{"title":"no stamp","text":"kept"}]}]}"#,
    )
    .unwrap();

    let repo = NoteRepository::open(fixture.store()).unwrap();
    let NotesLookup::Notes(notes) = repo.get_notes("manual") else {
        panic!("expected notes");
    };
    assert_eq!(notes[0].text, "No text");
    assert_eq!(notes[1].text, "kept");
    assert_eq!(notes[1].timestamp, "No timestamp");
}

#[test]
fn failed_save_rolls_back_and_reports_error() {
    let fixture = Fixture::new();
    let mut repo = NoteRepository::open(fixture.store()).unwrap();
    repo.add_note("dogs", "kept", "woof", None).unwrap();

    // Rename cannot replace a directory, so the next save fails.
    fs::remove_file(&fixture.path).unwrap();
    fs::create_dir(&fixture.path).unwrap();
    fs::write(fixture.path.join("child"), "x").unwrap();

    let err = repo.add_note("cats", "lost", "body", None).unwrap_err();
    assert!(matches!(err, StoreError::Persist { .. }));
    let err = repo.add_note("dogs", "lost", "body", None).unwrap_err();
    assert!(matches!(err, StoreError::Persist { .. }));

    assert_eq!(repo.topic_names(), vec!["dogs".to_string()]);
    assert_eq!(
        repo.get_notes("cats"),
        NotesLookup::TopicNotFound {
            topic: "cats".to_string()
        }
    );
    let NotesLookup::Notes(notes) = repo.get_notes("dogs") else {
        panic!("expected the earlier note to survive");
    };
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].title, "kept");
}

#[test]
fn unreadable_store_is_never_overwritten() {
    let fixture = Fixture::new();
    fs::create_dir(&fixture.path).unwrap();
    fs::write(fixture.path.join("child"), "precious").unwrap();

    let mut repo = NoteRepository::open(FileStore::new(&fixture.path)).unwrap();
    assert!(repo.topic_names().is_empty());

    let err = repo.add_note("cats", "lost", "body", None).unwrap_err();
    assert!(matches!(err, StoreError::ReadOnly { .. }));
    assert!(repo.topic_names().is_empty());
    assert!(repo.flush().is_err());

    assert!(fixture.path.is_dir(), "unreadable path must not be clobbered");
    assert_eq!(
        fs::read_to_string(fixture.path.join("child")).unwrap(),
        "precious"
    );
}

#[test]
fn invalid_utf8_store_is_recreated_at_load() {
    let fixture = Fixture::new();
    let mut seeded = br#"{"topics":[{"name":"vault","notes":[{"title":"t","text":"precious","timestamp":"01.02.2024 10:00"}]}]}"#.to_vec();
    seeded.push(0xFF);
    fs::write(&fixture.path, &seeded).unwrap();

    let mut repo = NoteRepository::open(fixture.store()).unwrap();
    assert!(repo.topic_names().is_empty());

    let raw = fs::read_to_string(&fixture.path).unwrap();
    let parsed: NoteTree = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, NoteTree::new());

    repo.add_note("fresh", "first", "body", None).unwrap();
    let reopened = NoteRepository::open(fixture.store()).unwrap();
    assert_eq!(reopened.topic_names(), vec!["fresh".to_string()]);
}
