//! Multi-pane tab workspace model
//!
//! A workspace is split into resizable screens laid out left to right.
//! Each screen holds an ordered set of route-bound tabs with one of them
//! active. [`WorkspaceStore`] is the only writer of this model and keeps
//! its invariants after every call:
//!
//! - screen widths sum to 100 percent
//! - the active screen names a live screen
//! - each screen's active tab is one of its tabs (`None` only when empty)
//! - tab ids are unique across the whole workspace

mod error;
mod ids;
mod route;
mod store;
mod tabs;
mod types;
pub mod width;

pub use error::InvariantViolation;
pub use ids::{IdentifierSource, SequentialIdSource, UuidSource};
pub use route::{
    META_ICON, META_TITLE, MetaBagResolver, RouteMetadataResolver, TabMeta, TabOverrides,
};
pub use store::WorkspaceStore;
pub(crate) use store::check_workspace;
pub use tabs::{ClosedTab, TabTransfer, left_neighbor_index};
pub use types::{RouteLocation, RouteRef, Screen, ScreenId, Tab, TabId, Workspace};
pub use width::{MIN_SCREEN_WIDTH_PERCENT, WIDTH_EPSILON};
