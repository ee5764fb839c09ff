//! Property tests for workspace snapshots and persistence

use panedeck_core::persistence::{
    ExternalChangeOutcome, IgnoreReason, LoadOutcome, MemoryStore, PersistedSnapshot,
    PersistenceAdapter, StorageChange,
};
use panedeck_core::workspace::width::is_normalized;
use proptest::prelude::*;

use super::{apply, new_store, ops_strategy};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Serializing a workspace and reading it back yields the same screens,
    /// tabs, order, widths and active ids.
    #[test]
    fn snapshot_round_trip(ops in ops_strategy(40)) {
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        let snapshot = PersistedSnapshot::from_workspace(store.workspace());

        let json = snapshot.to_json().unwrap();
        let restored = PersistedSnapshot::parse_workspace(&json).unwrap();

        prop_assert_eq!(PersistedSnapshot::from_workspace(&restored), snapshot);
    }

    /// A workspace persisted through one adapter loads unchanged through
    /// another one sharing the storage.
    #[test]
    fn persisted_workspace_loads_elsewhere(ops in ops_strategy(30)) {
        let storage = MemoryStore::new();
        let writer = PersistenceAdapter::new(storage.handle());
        let reader = PersistenceAdapter::new(storage.handle());

        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        writer.persist(&store).unwrap();

        let mut other = new_store();
        prop_assert_eq!(reader.load(&mut other).unwrap(), LoadOutcome::Restored);
        prop_assert_eq!(
            PersistedSnapshot::from_workspace(other.workspace()),
            PersistedSnapshot::from_workspace(store.workspace())
        );
        prop_assert!(other.check_invariants().is_ok());
    }

    /// Stored widths that drifted from 100 are rescaled on load.
    #[test]
    fn drifted_widths_are_normalized(widths in prop::collection::vec(1.0..80.0f64, 1..6)) {
        let mut store = new_store();
        for _ in 1..widths.len() {
            store.add_screen(Vec::new(), None);
        }
        let mut snapshot = PersistedSnapshot::from_workspace(store.workspace());
        for (screen, width) in snapshot.screens.iter_mut().zip(&widths) {
            screen.width = *width;
        }

        let workspace = snapshot.into_workspace().unwrap();

        prop_assert!(is_normalized(workspace.screens().map(|s| s.width())));
    }

    /// Applying an external change with the current state is a no-op and
    /// never triggers a write back.
    #[test]
    fn echo_of_current_state_is_ignored(ops in ops_strategy(20)) {
        let storage = MemoryStore::new();
        let adapter = PersistenceAdapter::new(storage.handle());
        let mut store = new_store();
        for op in &ops {
            apply(&mut store, op);
        }
        adapter.persist(&store).unwrap();
        let revision = store.revision();

        let echo = StorageChange {
            key: adapter.key().to_string(),
            new_value: Some(PersistedSnapshot::from_workspace(store.workspace()).to_json().unwrap()),
        };

        prop_assert_eq!(
            adapter.on_external_change(&mut store, &echo),
            ExternalChangeOutcome::Ignored(IgnoreReason::Unchanged)
        );
        prop_assert_eq!(store.revision(), revision);
        prop_assert!(!adapter.persist(&store).unwrap());
    }
}
