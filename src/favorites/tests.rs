use crate::favorites::{
    FAVORITES_KEY, FavoritesError, FavoritesStore, FileStorage, KeyValueStorage, MemoryStorage,
    StorageError,
};
use crate::record::RecordId;
use tempfile::tempdir;

/// Storage whose writes always fail.
#[derive(Debug, Default)]
struct ReadOnlyStorage {
    payload: Option<String>,
}

impl KeyValueStorage for ReadOnlyStorage {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.payload.clone())
    }

    fn set_item(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteError {
            key: key.to_string(),
            source: std::io::Error::other("read-only"),
        })
    }
}

fn persisted(store: &FavoritesStore<MemoryStorage>) -> Option<String> {
    store.storage().get_item(FAVORITES_KEY).unwrap()
}

#[test]
fn test_toggle_adds_then_removes() {
    let mut store = FavoritesStore::load(MemoryStorage::new());
    let x = RecordId::from("x");

    let set = store.toggle(&x).expect("Failed to toggle favorite");
    assert_eq!(set.len(), 1);
    assert!(store.contains(&x));
    assert_eq!(persisted(&store).as_deref(), Some(r#"["x"]"#));

    let set = store.toggle(&x).expect("Failed to toggle favorite");
    assert!(set.is_empty());
    assert!(!store.contains(&x));
    assert_eq!(persisted(&store).as_deref(), Some("[]"));
}

#[test]
fn test_insertion_order_is_kept() {
    let mut store = FavoritesStore::load(MemoryStorage::new());
    for id in ["c", "a", "b"] {
        store.toggle(&RecordId::from(id)).unwrap();
    }
    store.toggle(&RecordId::from("a")).unwrap();
    store.toggle(&RecordId::from("a")).unwrap();
    let ids: Vec<&str> = store.ids().iter().map(RecordId::as_str).collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
    assert_eq!(persisted(&store).as_deref(), Some(r#"["c","b","a"]"#));
}

#[test]
fn test_corrupt_payload_loads_empty() {
    for payload in ["{not json", r#"{"a": 1}"#, "42", ""] {
        let mut storage = MemoryStorage::new();
        storage.set_item(FAVORITES_KEY, payload).unwrap();
        let store = FavoritesStore::load(storage);
        assert!(store.ids().is_empty(), "payload {payload:?} should load empty");
    }
}

#[test]
fn test_mixed_payload_entries() {
    let mut storage = MemoryStorage::new();
    storage
        .set_item(FAVORITES_KEY, r#"["a", 7, null, {"x": 1}, "a"]"#)
        .unwrap();
    let store = FavoritesStore::load(storage);
    let ids: Vec<&str> = store.ids().iter().map(RecordId::as_str).collect();
    assert_eq!(ids, vec!["a", "7"]);
}

#[test]
fn test_failed_write_rolls_back() {
    let storage = ReadOnlyStorage {
        payload: Some(r#"["a","b"]"#.to_string()),
    };
    let mut store = FavoritesStore::load(storage);

    let err = store.toggle(&RecordId::from("a")).unwrap_err();
    assert!(matches!(err, FavoritesError::Storage(_)));
    let ids: Vec<&str> = store.ids().iter().map(RecordId::as_str).collect();
    assert_eq!(ids, vec!["a", "b"]);

    assert!(store.toggle(&RecordId::from("c")).is_err());
    assert!(!store.contains(&RecordId::from("c")));
}

#[test]
fn test_file_storage_survives_reload() {
    let dir = tempdir().expect("Failed to create temp directory");
    let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
    let mut store = FavoritesStore::load(storage);
    store.toggle(&RecordId::from("42")).unwrap();
    store.toggle(&RecordId::from("7")).unwrap();
    drop(store);

    let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
    let store = FavoritesStore::load(storage);
    let ids: Vec<&str> = store.ids().iter().map(RecordId::as_str).collect();
    assert_eq!(ids, vec!["42", "7"]);
}

#[test]
fn test_file_storage_corrupt_file_loads_empty() {
    let dir = tempdir().expect("Failed to create temp directory");
    std::fs::write(dir.path().join(FAVORITES_KEY), "[\"trunc").unwrap();
    let storage = FileStorage::new(dir.path()).expect("Failed to create file storage");
    let store = FavoritesStore::load(storage);
    assert!(store.ids().is_empty());
}
