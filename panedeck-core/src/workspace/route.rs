//! Route metadata resolution
//!
//! Tabs take their default title and icon from the route they are bound
//! to. The admin application's module registry provides that mapping; this
//! module defines the seam and a resolver that reads it from the router's
//! metadata bag.

use super::types::RouteLocation;

/// Metadata key holding a route's title.
pub const META_TITLE: &str = "title";

/// Metadata key holding a route's icon.
pub const META_ICON: &str = "icon";

/// Default title and icon for a route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabMeta {
    /// Default tab title.
    pub title: String,
    /// Default tab icon.
    pub icon: Option<String>,
}

impl TabMeta {
    /// Creates tab metadata.
    #[must_use]
    pub fn new(title: impl Into<String>, icon: Option<String>) -> Self {
        Self {
            title: title.into(),
            icon,
        }
    }
}

/// Explicit title/icon supplied by the caller instead of route defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TabOverrides {
    /// Title override.
    pub title: Option<String>,
    /// Icon override.
    pub icon: Option<String>,
}

impl TabOverrides {
    /// No overrides.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            title: None,
            icon: None,
        }
    }

    /// Overrides the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Overrides the icon.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Returns true if neither title nor icon is overridden.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.icon.is_none()
    }

    /// Applies the overrides on top of route defaults.
    #[must_use]
    pub fn apply(&self, defaults: TabMeta) -> TabMeta {
        TabMeta {
            title: self.title.clone().unwrap_or(defaults.title),
            icon: self.icon.clone().or(defaults.icon),
        }
    }
}

/// Resolves the default title and icon for a route.
pub trait RouteMetadataResolver {
    /// Returns the defaults for `location`.
    fn resolve(&self, location: &RouteLocation) -> TabMeta;
}

/// Resolver reading `title` and `icon` from the route metadata bag and
/// falling back to a default module when the route carries none.
#[derive(Debug, Clone, Default)]
pub struct MetaBagResolver {
    fallback: TabMeta,
}

impl MetaBagResolver {
    /// Creates a resolver with the given fallback module metadata.
    #[must_use]
    pub const fn new(fallback: TabMeta) -> Self {
        Self { fallback }
    }
}

impl RouteMetadataResolver for MetaBagResolver {
    fn resolve(&self, location: &RouteLocation) -> TabMeta {
        match location.meta.get(META_TITLE) {
            Some(title) => TabMeta {
                title: title.clone(),
                icon: location.meta.get(META_ICON).cloned(),
            },
            None => self.fallback.clone(),
        }
    }
}

impl<F> RouteMetadataResolver for F
where
    F: Fn(&RouteLocation) -> TabMeta,
{
    fn resolve(&self, location: &RouteLocation) -> TabMeta {
        self(location)
    }
}
