//! Persistence tests - JSON progress file on disk

use std::fs;

use serde::Deserialize;

use candy_match::core::{ProgressStore, ProgressTracker, StoreError};
use candy_match::engine::JsonFileStore;
use candy_match::types::{LEVEL_KEY, SCORE_TO_WIN_KEY};

#[derive(Debug, Deserialize)]
struct SavedProgress {
    #[serde(rename = "currentLevel")]
    current_level: i64,
    #[serde(rename = "scoreToWin")]
    score_to_win: i64,
}

#[test]
fn test_advance_writes_both_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save").join("progress.json");

    let mut store = JsonFileStore::open(&path).unwrap();
    let mut tracker = ProgressTracker::load(&store, 30);
    tracker.add_score(300);
    tracker.advance_level(&mut store).unwrap();

    let saved: SavedProgress = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved.current_level, 2);
    assert_eq!(saved.score_to_win, 330);
}

#[test]
fn test_existing_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    fs::write(&path, r#"{"currentLevel": 7, "scoreToWin": 480}"#).unwrap();

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get_int(LEVEL_KEY), Some(7));
    assert_eq!(store.get_int(SCORE_TO_WIN_KEY), Some(480));
    assert_eq!(store.path(), path.as_path());

    let tracker = ProgressTracker::load(&store, 30);
    assert_eq!(tracker.level(), 7);
    assert_eq!(tracker.score_to_win(), 480);
}

#[test]
fn test_unknown_keys_survive_a_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    fs::write(&path, r#"{"bestScore": 900}"#).unwrap();

    let mut store = JsonFileStore::open(&path).unwrap();
    store.set_int(LEVEL_KEY, 3);
    store.flush().unwrap();

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get_int("bestScore"), Some(900));
    assert_eq!(reopened.get_int(LEVEL_KEY), Some(3));
}

#[test]
fn test_non_integer_values_are_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    fs::write(&path, r#"{"currentLevel": "three"}"#).unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(err.to_string().contains("progress.json"));
}
