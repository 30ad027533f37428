use chrono::{TimeZone, Utc};
use mindbox::clock::{FixedClock, SequentialIds};
use mindbox::color::{BoxColor, Gold, KeywordColor};
use mindbox::error::{MindBoxError, PersistenceError};
use mindbox::model::{BoxNode, ThoughtStatus};
use mindbox::store::backend::StorageBackend;
use mindbox::store::entity_store::EntityStore;
use mindbox::store::fs_backend::FsBackend;
use mindbox::store::Collection;
use std::fs;
use tempfile::TempDir;
use uuid::Uuid;

fn setup() -> (TempDir, FsBackend) {
    let dir = TempDir::new().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    (dir, backend)
}

fn open(dir: &TempDir) -> EntityStore<FsBackend> {
    let start = Utc.with_ymd_and_hms(2024, 5, 20, 9, 0, 0).unwrap();
    EntityStore::open(FsBackend::new(dir.path().to_path_buf()))
        .unwrap()
        .with_clock(FixedClock::new(start))
        .with_ids(SequentialIds::starting_at(1))
}

#[test]
fn test_missing_files_load_as_empty_tables() {
    let (_dir, backend) = setup();
    assert!(backend.load_boxes().unwrap().is_empty());
    assert!(backend.load_thoughts().unwrap().is_empty());
    assert!(backend.load_keywords().unwrap().is_empty());
}

#[test]
fn test_empty_file_loads_as_empty_table() {
    let (dir, backend) = setup();
    fs::write(dir.path().join("boxes.json"), "  \n").unwrap();
    assert!(backend.load_boxes().unwrap().is_empty());
}

#[test]
fn test_save_creates_directory_and_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("data");
    let backend = FsBackend::new(root.clone());

    let b = BoxNode::new(Uuid::from_u128(1), Utc::now(), None);
    backend.save_boxes(&[b]).unwrap();

    assert!(root.join("boxes.json").exists());
    let leftovers: Vec<_> = fs::read_dir(&root)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert_eq!(backend.location(Collection::Boxes), root.join("boxes.json"));
}

#[test]
fn test_round_trip_preserves_every_field() {
    let dir = TempDir::new().unwrap();
    let (boxes, thoughts, keywords) = {
        let mut store = open(&dir);
        let a = store.create_box(None).unwrap();
        let b = store.create_box(Some(a.id)).unwrap();
        store.rename_box(b.id, "Projects").unwrap();
        store
            .recolor_box(a.id, BoxColor::Gold(Gold::MidnightDream))
            .unwrap();
        store.set_box_expanded(a.id, true).unwrap();

        let t = store.create_thought(b.id).unwrap();
        store.rename_thought(t.id, "Launch plan").unwrap();
        store
            .set_thought_body(t.id, "# Launch\n\n- [ ] write *docs*")
            .unwrap();
        store
            .set_thought_status(t.id, ThoughtStatus::Custom("waiting".into()))
            .unwrap();

        let k = store.create_keyword("work", KeywordColor::ForestMoss).unwrap();
        store.link_keyword(t.id, k.id).unwrap();

        (store.boxes(), store.thoughts(), store.keywords())
    };

    let reopened = open(&dir);
    assert_eq!(reopened.boxes(), boxes);
    assert_eq!(reopened.thoughts(), thoughts);
    assert_eq!(reopened.keywords(), keywords);

    let raw = fs::read_to_string(dir.path().join("boxes.json")).unwrap();
    assert!(raw.contains("\"#5F0F40\""));
    assert!(raw.contains("\"parentBoxId\""));
    let raw = fs::read_to_string(dir.path().join("thoughts.json")).unwrap();
    assert!(raw.contains("\"formattedBody\""));
    assert!(raw.contains("\"custom\": \"waiting\""));
}

#[test]
fn test_store_order_is_file_order() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    let ids: Vec<Uuid> = (0..3).map(|_| store.create_box(None).unwrap().id).collect();

    let reopened = open(&dir);
    let loaded: Vec<Uuid> = reopened.boxes().iter().map(|b| b.id).collect();
    assert_eq!(loaded, ids);
}

#[test]
fn test_unknown_color_fails_to_load() {
    let (dir, _backend) = setup();
    let json = format!(
        r##"[{{"id":"{}","name":"Odd","updateDate":"2024-05-20T09:00:00Z","parentBoxId":null,"color":"#123456"}}]"##,
        Uuid::from_u128(1)
    );
    fs::write(dir.path().join("boxes.json"), json).unwrap();

    let err = match EntityStore::open(FsBackend::new(dir.path().to_path_buf())) {
        Ok(_) => panic!("unknown color should not load"),
        Err(err) => err,
    };
    assert!(matches!(
        err,
        MindBoxError::Persistence(PersistenceError::Serialization(_))
    ));
}

#[test]
fn test_legacy_records_without_optional_fields_load() {
    let (dir, backend) = setup();
    let json = format!(
        r##"[{{"id":"{}","boxId":"{}","title":"Old","body":"Old body","updateDate":"2023-01-01T00:00:00Z"}}]"##,
        Uuid::from_u128(10),
        Uuid::from_u128(1)
    );
    fs::write(dir.path().join("thoughts.json"), json).unwrap();

    let thoughts = backend.load_thoughts().unwrap();
    assert_eq!(thoughts.len(), 1);
    assert_eq!(thoughts[0].formatted_body, "");
    assert_eq!(thoughts[0].status, ThoughtStatus::Active);
}
