// Behavior catalog and store tests
//
// The store is exercised against real files in a temp dir so seeding,
// persistence and re-reading go through the same paths the CLI uses.

use super::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;

fn behavior(description: &str, calls: &[&str]) -> Behavior {
    Behavior::with_timestamp(
        description,
        calls.iter().map(|c| c.to_string()).collect(),
        1_700_000_000,
    )
    .unwrap()
}

fn write_definitions(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("malicious_behaviors.txt");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_catalog_rejects_empty() {
    let err = BehaviorCatalog::new(vec![]).unwrap_err();
    assert_eq!(err, BehaviorError::EmptyCatalog);
}

#[test]
fn test_catalog_rejects_empty_behavior() {
    let broken = Behavior {
        description: "broken".to_string(),
        sequence: vec![],
        inserted_at: 0,
    };
    let err = BehaviorCatalog::new(vec![broken]).unwrap_err();
    assert!(matches!(err, BehaviorError::EmptySequence(_)));
}

#[test]
fn test_catalog_choose_covers_all_behaviors() {
    let catalog = BehaviorCatalog::new(vec![
        behavior("a", &["x"]),
        behavior("b", &["y"]),
        behavior("c", &["z"]),
    ])
    .unwrap();

    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..200 {
        seen.insert(catalog.choose(&mut rng).description.clone());
    }

    assert_eq!(seen.len(), 3);
}

#[test]
fn test_catalog_load_from_empty_source() {
    let source: Vec<Behavior> = Vec::new();
    let err = BehaviorCatalog::load(&source).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Behavior(BehaviorError::EmptyCatalog)
    ));
}

#[test]
fn test_catalog_get_by_description() {
    let catalog = BehaviorCatalog::new(vec![behavior("ransomware", &["encryptFile"])]).unwrap();
    assert!(catalog.get("ransomware").is_some());
    assert!(catalog.get("spyware").is_none());
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_store_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("behaviors.json"));
    assert!(store.behaviors().unwrap().is_empty());
}

#[test]
fn test_store_seeds_when_empty() {
    let dir = TempDir::new().unwrap();
    let definitions = write_definitions(
        &dir,
        "ransomware:encryptFile,deleteShadowCopy\nspyware:getLocation, sendLocation\n",
    );
    let store_path = dir.path().join("behaviors.json");
    let store = BehaviorStore::open(&store_path).with_definitions(&definitions);

    let behaviors = store.load_behaviors().unwrap();

    assert_eq!(behaviors.len(), 2);
    assert_eq!(behaviors[0].description, "ransomware");
    assert_eq!(behaviors[1].sequence, vec!["getLocation", "sendLocation"]);
    assert!(store_path.exists());
}

#[test]
fn test_store_does_not_reseed_when_populated() {
    let dir = TempDir::new().unwrap();
    let definitions = write_definitions(&dir, "ransomware:encryptFile\n");
    let store = BehaviorStore::open(dir.path().join("behaviors.json")).with_definitions(&definitions);

    store.insert(behavior("existing", &["a", "b"])).unwrap();

    let behaviors = store.load_behaviors().unwrap();
    assert_eq!(behaviors.len(), 1);
    assert_eq!(behaviors[0].description, "existing");
}

#[test]
fn test_store_without_definitions_stays_empty() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("behaviors.json"));

    assert!(store.load_behaviors().unwrap().is_empty());
    assert_eq!(store.seed().unwrap(), 0);
}

#[test]
fn test_store_missing_definitions_file() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("behaviors.json"))
        .with_definitions(dir.path().join("absent.txt"));

    let err = store.load_behaviors().unwrap_err();
    assert!(matches!(err, StoreError::Definitions { .. }));
}

#[test]
fn test_store_insert_replaces_same_description() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("nested/behaviors.json"));

    store.insert(behavior("dropper", &["download"])).unwrap();
    store.insert(behavior("dropper", &["download", "exec"])).unwrap();
    store.insert(behavior("keylogger", &["hook"])).unwrap();

    let rows = store.behaviors().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].sequence, vec!["download", "exec"]);
    assert_eq!(rows[1].description, "keylogger");
}

#[test]
fn test_store_insert_sequence_stamps_timestamp() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("behaviors.json"));

    let stored = store
        .insert_sequence("smsFraud", vec!["sendTextMessage".to_string()])
        .unwrap();

    assert!(stored.inserted_at > 0);
    assert_eq!(store.behaviors().unwrap(), vec![stored]);
}

#[test]
fn test_store_rejects_empty_sequence() {
    let dir = TempDir::new().unwrap();
    let store = BehaviorStore::open(dir.path().join("behaviors.json"));

    let err = store.insert_sequence("nothing", vec![]).unwrap_err();
    assert!(matches!(err, StoreError::Behavior(BehaviorError::EmptySequence(_))));
}

#[test]
fn test_store_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("behaviors.json");
    fs::write(&path, "{ not json").unwrap();

    let err = BehaviorStore::open(&path).behaviors().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[test]
fn test_store_is_a_behavior_source_for_catalog() {
    let dir = TempDir::new().unwrap();
    let definitions = write_definitions(&dir, "ransomware:encryptFile,deleteShadowCopy\n");
    let store = BehaviorStore::open(dir.path().join("behaviors.json")).with_definitions(definitions);

    let catalog = BehaviorCatalog::load(&store).unwrap();
    assert_eq!(catalog.behaviors()[0].len(), 2);
}
