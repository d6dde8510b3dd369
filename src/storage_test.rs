use super::*;

// =============================================================================
// MemoryStorage
// =============================================================================

#[test]
fn memory_get_absent_is_none() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap(), None);
}

#[test]
fn memory_set_then_get() {
    let storage = MemoryStorage::new();
    storage.set(AUTHORIZATION_KEY, "s3cr3tt0ken").unwrap();
    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap().as_deref(), Some("s3cr3tt0ken"));
}

#[test]
fn memory_set_overwrites() {
    let storage = MemoryStorage::new();
    storage.set(AUTHORIZATION_KEY, "first").unwrap();
    storage.set(AUTHORIZATION_KEY, "second").unwrap();
    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap().as_deref(), Some("second"));
}

#[test]
fn memory_remove_absent_is_ok() {
    let storage = MemoryStorage::new();
    storage.remove(AUTHORIZATION_KEY).unwrap();
    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap(), None);
}

// =============================================================================
// FileStorage
// =============================================================================

#[test]
fn file_missing_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap(), None);
}

#[test]
fn file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("session.json");
    FileStorage::new(&path).set(AUTHORIZATION_KEY, "s3cr3tt0ken").unwrap();

    let reopened = FileStorage::new(&path);
    assert_eq!(reopened.get(AUTHORIZATION_KEY).unwrap().as_deref(), Some("s3cr3tt0ken"));
}

#[test]
fn file_remove_keeps_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path().join("session.json"));
    storage.set(AUTHORIZATION_KEY, "tok").unwrap();
    storage.set("theme", "dark").unwrap();
    storage.remove(AUTHORIZATION_KEY).unwrap();

    assert_eq!(storage.get(AUTHORIZATION_KEY).unwrap(), None);
    assert_eq!(storage.get("theme").unwrap().as_deref(), Some("dark"));
}

#[test]
fn file_remove_absent_does_not_create_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileStorage::new(&path).remove(AUTHORIZATION_KEY).unwrap();
    assert!(!path.exists());
}

#[test]
fn file_empty_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "").unwrap();
    assert_eq!(FileStorage::new(&path).get(AUTHORIZATION_KEY).unwrap(), None);
}

#[test]
fn file_malformed_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "[1, 2").unwrap();
    let err = FileStorage::new(&path).get(AUTHORIZATION_KEY).unwrap_err();
    assert!(matches!(err, StorageError::Format(_)));
}
