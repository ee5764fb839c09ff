//! Workspace sessions sharing an in-memory store

use panedeck_core::persistence::{
    ExternalChangeOutcome, IgnoreReason, KeyValueStore, LoadOutcome, MemoryStore, PersistedSnapshot,
    PersistenceAdapter, StorageChange, WorkspaceSession,
};
use panedeck_core::workspace::width::is_normalized;
use panedeck_core::workspace::{
    MetaBagResolver, RouteLocation, SequentialIdSource, TabOverrides, WorkspaceStore,
};

fn store(start: u128) -> WorkspaceStore {
    WorkspaceStore::with_sources(
        SequentialIdSource::starting_at(start),
        MetaBagResolver::default(),
    )
}

fn open(storage: &MemoryStore, start: u128) -> (WorkspaceSession<MemoryStore>, LoadOutcome) {
    WorkspaceSession::open(store(start), PersistenceAdapter::new(storage.handle())).unwrap()
}

#[test]
fn changes_propagate_between_sessions() {
    let storage = MemoryStore::new();
    let (mut first, outcome) = open(&storage, 1);
    assert_eq!(outcome, LoadOutcome::Empty);
    let (mut second, _) = open(&storage, 1000);
    let mut second_changes = second.persistence().storage().subscribe();
    let mut first_changes = first.persistence().storage().subscribe();

    first
        .mutate(|store| {
            let screen = store.active_screen_id().unwrap();
            store.open_route_tab(screen, &RouteLocation::new("/users"), TabOverrides::none());
        })
        .unwrap();

    let change = second_changes.try_next().expect("change reported");
    assert_eq!(second.apply_external(&change), ExternalChangeOutcome::Applied);
    assert_eq!(
        PersistedSnapshot::from_workspace(second.store().workspace()),
        PersistedSnapshot::from_workspace(first.store().workspace())
    );

    // The applied change is not echoed back to the first session
    assert!(!second.flush().unwrap());
    assert!(first_changes.try_next().is_none());
}

#[test]
fn reopened_session_restores_layout() {
    let storage = MemoryStore::new();
    let (mut session, _) = open(&storage, 1);
    session
        .mutate(|store| {
            let screen = store.active_screen_id().unwrap();
            store.open_route_tab(screen, &RouteLocation::new("/a"), TabOverrides::none());
            let second = store.add_screen(Vec::new(), None).id;
            store.set_screen_width(second, 30.0);
        })
        .unwrap();
    let saved = PersistedSnapshot::from_workspace(session.store().workspace());

    let (reopened, outcome) = open(&storage, 500);

    assert_eq!(outcome, LoadOutcome::Restored);
    assert_eq!(
        PersistedSnapshot::from_workspace(reopened.store().workspace()),
        saved
    );
    assert!(!reopened.flush().unwrap());
}

#[test]
fn corrupt_snapshot_is_discarded_on_load() {
    let storage = MemoryStore::new();
    let adapter = PersistenceAdapter::new(storage.handle());
    storage.set(adapter.key(), "{not json").unwrap();

    let (session, outcome) = WorkspaceSession::open(store(1), adapter).unwrap();

    assert_eq!(outcome, LoadOutcome::Discarded);
    assert_eq!(session.store().screen_count(), 1);
    assert_eq!(session.store().tab_count(), 0);
}

#[test]
fn repaired_snapshot_is_written_back_on_open() {
    let storage = MemoryStore::new();
    let (mut session, _) = open(&storage, 1);
    session
        .mutate(|store| {
            store.add_screen(Vec::new(), None);
            store.add_screen(Vec::new(), None);
        })
        .unwrap();
    let key = session.persistence().key().to_string();
    let mut drifted = PersistedSnapshot::from_workspace(session.store().workspace());
    for screen in &mut drifted.screens {
        screen.width = 20.0;
    }
    storage.set(&key, &drifted.to_json().unwrap()).unwrap();

    let (reopened, outcome) = open(&storage, 500);

    assert_eq!(outcome, LoadOutcome::Repaired);
    let stored = PersistedSnapshot::from_json(&storage.get(&key).unwrap().unwrap()).unwrap();
    assert_eq!(stored, PersistedSnapshot::from_workspace(reopened.store().workspace()));
    assert!(is_normalized(stored.screens.iter().map(|s| s.width)));
    assert!(!reopened.flush().unwrap());
}

#[test]
fn invalid_external_changes_are_ignored() {
    let storage = MemoryStore::new();
    let (mut session, _) = open(&storage, 1);
    session
        .mutate(|store| {
            let screen = store.active_screen_id().unwrap();
            store.open_route_tab(screen, &RouteLocation::new("/a"), TabOverrides::none());
        })
        .unwrap();
    let before = PersistedSnapshot::from_workspace(session.store().workspace());
    let key = session.persistence().key().to_string();

    let cases = [
        (Some("{broken".to_string()), IgnoreReason::Invalid),
        (
            Some(r#"{"version":1,"activeScreenId":null,"screens":[]}"#.to_string()),
            IgnoreReason::Invalid,
        ),
        (None, IgnoreReason::Removed),
    ];
    for (new_value, reason) in cases {
        let change = StorageChange {
            key: key.clone(),
            new_value,
        };
        assert_eq!(
            session.apply_external(&change),
            ExternalChangeOutcome::Ignored(reason)
        );
    }
    let other_key = StorageChange {
        key: "other".to_string(),
        new_value: Some("{}".to_string()),
    };
    assert_eq!(
        session.apply_external(&other_key),
        ExternalChangeOutcome::Ignored(IgnoreReason::OtherKey)
    );

    assert_eq!(
        PersistedSnapshot::from_workspace(session.store().workspace()),
        before
    );
}
