use std::fs;

use genmed_core::{Language, Preferences, SessionToken};
use genmed_engine::{
    clear_session_token, ensure_state_dir, load_preferences, load_session_token,
    save_preferences, save_session_token, AtomicFileWriter, DurableStore, FileStore, MemoryStore,
    StoreError, ACCESS_TOKEN_KEY, STORE_FILENAME,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn token() -> SessionToken {
    SessionToken::new("abc", "Bearer")
}

#[test]
fn file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("state");

    let store = FileStore::open(&dir).unwrap();
    save_session_token(&store, &token()).unwrap();
    assert!(store.path().is_file());
    drop(store);

    let reopened = FileStore::open(&dir).unwrap();
    assert_eq!(load_session_token(&reopened).unwrap(), Some(token()));
}

#[test]
fn clearing_token_removes_both_keys() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path()).unwrap();
    save_session_token(&store, &token()).unwrap();

    clear_session_token(&store).unwrap();
    assert_eq!(load_session_token(&store).unwrap(), None);

    let reopened = FileStore::open(temp.path()).unwrap();
    assert_eq!(reopened.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[test]
fn half_stored_token_is_not_loaded() {
    let store = MemoryStore::new();
    store.set(ACCESS_TOKEN_KEY, "abc").unwrap();
    assert_eq!(load_session_token(&store).unwrap(), None);
}

#[test]
fn corrupt_store_file_starts_empty() {
    genmed_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join(STORE_FILENAME), "{{ not ron").unwrap();

    let store = FileStore::open(temp.path()).unwrap();
    assert_eq!(store.get(ACCESS_TOKEN_KEY).unwrap(), None);

    store.set("k", "v").unwrap();
    let reopened = FileStore::open(temp.path()).unwrap();
    assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
}

#[test]
fn state_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    assert!(matches!(
        FileStore::open(&file_path),
        Err(StoreError::Persist(_))
    ));
    assert!(ensure_state_dir(&file_path).is_err());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write(STORE_FILENAME, "first").unwrap();
    let second = writer.write(STORE_FILENAME, "second").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "second");
}

#[test]
fn preferences_round_trip_through_store() {
    let store = MemoryStore::new();
    assert_eq!(load_preferences(&store).unwrap(), None);

    let preferences = Preferences {
        language: Language::Bengali,
        notifications: false,
        ..Preferences::default()
    };
    save_preferences(&store, &preferences).unwrap();
    assert_eq!(load_preferences(&store).unwrap(), Some(preferences));
}

#[test]
fn unreadable_preferences_are_reported() {
    let store = MemoryStore::new();
    store.set("preferences", "not json").unwrap();
    assert!(matches!(
        load_preferences(&store),
        Err(StoreError::Decode { .. })
    ));
}

#[test]
fn session_token_debug_hides_secret() {
    let rendered = format!("{:?}", token());
    assert!(!rendered.contains("abc"));
}
