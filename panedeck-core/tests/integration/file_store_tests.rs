//! File-backed storage shared between processes

use std::time::Duration;

use panedeck_core::error::StorageError;
use panedeck_core::persistence::{
    FileStore, FileWatch, KeyValueStore, PersistedSnapshot, PersistenceAdapter, WorkspaceSession,
};
use panedeck_core::workspace::{
    MetaBagResolver, RouteLocation, SequentialIdSource, TabOverrides, WorkspaceStore,
};
use tempfile::TempDir;
use tokio::time::timeout;

const WATCH_TIMEOUT: Duration = Duration::from_secs(5);
const QUIET_PERIOD: Duration = Duration::from_millis(300);

fn store() -> WorkspaceStore {
    WorkspaceStore::with_sources(SequentialIdSource::default(), MetaBagResolver::default())
}

#[test]
fn get_returns_what_was_set() {
    let dir = TempDir::new().unwrap();
    let files = FileStore::open(dir.path()).unwrap();

    assert_eq!(files.get("layout").unwrap(), None);
    files.set("layout", r#"{"a":1}"#).unwrap();
    assert_eq!(files.get("layout").unwrap().as_deref(), Some(r#"{"a":1}"#));

    let path = files.path_for("layout").unwrap();
    assert_eq!(path, dir.path().join("layout.json"));
    assert!(path.exists());
}

#[test]
fn write_leaves_no_temporary_file() {
    let dir = TempDir::new().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    files.set("layout", "first").unwrap();
    files.set("layout", "second").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["layout.json".to_string()]);
}

#[test]
fn path_like_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let files = FileStore::open(dir.path()).unwrap();

    for key in ["", ".hidden", "../escape", "a/b", "a\\b"] {
        assert!(
            matches!(files.set(key, "x"), Err(StorageError::InvalidKey(_))),
            "key {key:?} should be rejected"
        );
    }
}

#[test]
fn missing_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("a").join("b");
    let files = FileStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert_eq!(files.dir(), nested.as_path());
}

#[tokio::test]
async fn watch_reports_writes_from_other_handles() {
    let dir = TempDir::new().unwrap();
    let ours = FileStore::open(dir.path()).unwrap();
    let theirs = FileStore::open(dir.path()).unwrap();
    let mut watch = ours.watch().unwrap();

    theirs.set("layout", "from elsewhere").unwrap();

    let change = timeout(WATCH_TIMEOUT, watch.next())
        .await
        .expect("no change reported")
        .expect("watch closed");
    assert_eq!(change.key, "layout");
    assert_eq!(change.new_value.as_deref(), Some("from elsewhere"));
}

#[tokio::test]
async fn watch_ignores_own_writes() {
    let dir = TempDir::new().unwrap();
    let files = FileStore::open(dir.path()).unwrap();
    let mut watch = files.watch().unwrap();

    files.set("layout", "ours").unwrap();

    assert!(timeout(QUIET_PERIOD, watch.next()).await.is_err());
}

async fn wait_for_value(watch: &mut FileWatch, value: &str) -> bool {
    timeout(WATCH_TIMEOUT, async {
        while let Some(change) = watch.next().await {
            if change.new_value.as_deref() == Some(value) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false)
}

#[tokio::test]
async fn watch_reports_foreign_rewrite_of_own_value() {
    let dir = TempDir::new().unwrap();
    let ours = FileStore::open(dir.path()).unwrap();
    let theirs = FileStore::open(dir.path()).unwrap();
    let mut watch = ours.watch().unwrap();

    ours.set("layout", "/a").unwrap();
    theirs.set("layout", "/b").unwrap();
    assert!(wait_for_value(&mut watch, "/b").await);

    theirs.set("layout", "/a").unwrap();
    assert!(wait_for_value(&mut watch, "/a").await);
}

#[tokio::test]
async fn sessions_in_one_directory_stay_in_sync() {
    let dir = TempDir::new().unwrap();
    let (mut writer, _) = WorkspaceSession::open(
        store(),
        PersistenceAdapter::new(FileStore::open(dir.path()).unwrap()),
    )
    .unwrap();
    let reader_files = FileStore::open(dir.path()).unwrap();
    let mut watch = reader_files.watch().unwrap();
    let (mut reader, _) =
        WorkspaceSession::open(store(), PersistenceAdapter::new(reader_files)).unwrap();

    writer
        .mutate(|store| {
            let screen = store.active_screen_id().unwrap();
            store.open_route_tab(screen, &RouteLocation::new("/users"), TabOverrides::none());
            store.add_screen(Vec::new(), None);
        })
        .unwrap();

    // Several events may arrive for one write; apply until the reader caught up
    let expected = PersistedSnapshot::from_workspace(writer.store().workspace());
    let synced = timeout(WATCH_TIMEOUT, async {
        while let Some(change) = watch.next().await {
            reader.apply_external(&change);
            if PersistedSnapshot::from_workspace(reader.store().workspace()) == expected {
                return true;
            }
        }
        false
    })
    .await;

    assert_eq!(synced, Ok(true));
    assert_eq!(reader.store().screen_count(), 2);
    // Applying the external state does not write it back
    assert!(!reader.flush().unwrap());
}
