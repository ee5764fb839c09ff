//! Router used by the CLI.
//!
//! There is no application route table outside the host application, so
//! any absolute path navigates, and the title is derived from the last path
//! segment.

use async_trait::async_trait;
use panedeck_core::error::NavigationError;
use panedeck_core::route_sync::Router;
use panedeck_core::workspace::{META_TITLE, RouteLocation, RouteRef};

/// Title used for the root path
const HOME_TITLE: &str = "Home";

/// Accepts every absolute path.
#[derive(Debug, Clone)]
pub struct PathRouter {
    current: RouteLocation,
}

impl PathRouter {
    /// Creates a router positioned at `current`, or at the root.
    pub fn at(current: Option<&RouteRef>) -> Self {
        Self {
            current: locate(current.map_or("/", RouteRef::full_path)),
        }
    }
}

#[async_trait]
impl Router for PathRouter {
    async fn push(&self, to: &str) -> Result<RouteLocation, NavigationError> {
        if !to.starts_with('/') {
            return Err(NavigationError::NotFound(to.to_string()));
        }
        Ok(locate(to))
    }

    fn current_route(&self) -> RouteLocation {
        self.current.clone()
    }
}

fn locate(full_path: &str) -> RouteLocation {
    let location = RouteLocation::new(full_path);
    let title = title_for(&location.route());
    location.with_meta(META_TITLE, title)
}

/// Derives a title from the last path segment: `/user-groups/7` is "7",
/// `/user-groups` is "User groups".
fn title_for(route: &RouteRef) -> String {
    let Some(segment) = route.path().rsplit('/').find(|s| !s.is_empty()) else {
        return HOME_TITLE.to_string();
    };
    let words = segment.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => HOME_TITLE.to_string(),
    }
}
