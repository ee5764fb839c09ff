//! Panedeck Core Library
//!
//! Multi-pane tab workspace: a row of side-by-side screens, each with its
//! own ordered set of route-bound tabs, resizable dividers, tab drag and
//! drop within and across screens, router synchronisation and persistence
//! shared between execution contexts.
//!
//! # Crate Structure
//!
//! - [`workspace`] - Data model, [`WorkspaceStore`] and tab lifecycle
//! - [`drag`] - Tab drag and drop state machine and drop geometry
//! - [`resize`] - Divider dragging between adjacent screens
//! - [`route_sync`] - Mapping router navigations onto the active tab
//! - [`persistence`] - Snapshots, key-value stores and cross-context sync
//! - [`config`] - TOML settings
//! - [`tracing`] - Structured logging setup
//!
//! The store is single-threaded and owned by one task; every mutation is
//! synchronous. Async only appears at the router and storage boundaries.

#![warn(missing_docs)]

pub mod config;
pub mod drag;
pub mod error;
pub mod input;
pub mod persistence;
pub mod resize;
pub mod route_sync;
pub mod tracing;
pub mod workspace;

// =============================================================================
// Convenience re-exports
// =============================================================================

pub use config::{SettingsManager, WorkspaceSettings};
pub use drag::{
    DragData, DragDropController, DragPayload, DropIndicator, DropOutcome, DropRejection,
    DropTarget, Edge, TabBounds, resolve_drop,
};
pub use error::{
    ConfigError, ConfigResult, NavigationError, PanedeckError, PanedeckResult, SnapshotError,
    StorageError, StorageResult,
};
pub use input::{Modifiers, PointerEvent, PointerId, PointerKind};
pub use persistence::{
    ExternalChangeOutcome, FileStore, KeyValueStore, LoadOutcome, MemoryStore, PersistedSnapshot,
    PersistenceAdapter, StorageChange, WorkspaceSession,
};
pub use resize::{PresentationHost, ResizeController};
pub use route_sync::{BootstrapGate, BootstrapSignal, RouteSyncAdapter, RouteSyncOutcome, Router};
pub use crate::tracing::{
    TracingConfig, TracingError, TracingLevel, TracingOutput, TracingResult, init_tracing,
    is_tracing_initialized,
};
pub use workspace::{
    ClosedTab, InvariantViolation, RouteLocation, RouteRef, Screen, ScreenId, Tab, TabId,
    TabOverrides, TabTransfer, Workspace, WorkspaceStore,
};
