//! Durable storage of the workspace
//!
//! The workspace is written as a JSON [`PersistedSnapshot`] under a single
//! key of a [`KeyValueStore`]. Changes written by other execution contexts
//! (other handles of a [`MemoryStore`], other processes sharing a
//! [`FileStore`] directory) flow back through
//! [`PersistenceAdapter::on_external_change`].

mod adapter;
mod session;
mod snapshot;
mod storage;

pub use adapter::{
    DEFAULT_STORAGE_KEY, ExternalChangeOutcome, IgnoreReason, LoadOutcome, PersistenceAdapter,
    WriteFlag, WriteGuard,
};
pub use session::WorkspaceSession;
pub use snapshot::{PersistedScreen, PersistedSnapshot, SNAPSHOT_VERSION};
pub use storage::{FileStore, FileWatch, KeyValueStore, MemoryChanges, MemoryStore, StorageChange};
