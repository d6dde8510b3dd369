//! Route table mapping application paths to feature units.
//!
//! DESIGN
//! ======
//! Each path owns a slot that is filled at most once. Eager routes are filled
//! at registration; lazy routes run their loader on first `resolve` and keep
//! the result for the life of the table. Unknown paths resolve to `None`.

use std::fmt;
use std::sync::OnceLock;

/// A feature area reachable through the router.
pub trait Feature: Send + Sync {
    /// Stable identifier, e.g. `"dashboard"`.
    fn name(&self) -> &'static str;
    /// Human-readable heading.
    fn title(&self) -> &'static str;
}

type Loader = Box<dyn Fn() -> Box<dyn Feature> + Send + Sync>;

struct RouteEntry {
    path: &'static str,
    loader: Option<Loader>,
    slot: OnceLock<Box<dyn Feature>>,
}

#[derive(Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|e| (e.path, e.slot.get().is_some())))
            .finish()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The application's routes: home is built up front, the rest on demand.
    #[must_use]
    pub fn app() -> Self {
        Self::new()
            .eager("", Box::new(Home))
            .lazy("signup", || Box::new(Signup))
            .lazy("dashboard", || Box::new(Dashboard))
            .lazy("login", || Box::new(Login))
    }

    /// Register a feature constructed now. The first registration of a path wins.
    #[must_use]
    pub fn eager(mut self, path: &'static str, feature: Box<dyn Feature>) -> Self {
        let slot = OnceLock::new();
        let _ = slot.set(feature);
        self.entries.push(RouteEntry { path: normalize(path), loader: None, slot });
        self
    }

    /// Register a feature constructed on first resolution.
    #[must_use]
    pub fn lazy<F>(mut self, path: &'static str, loader: F) -> Self
    where
        F: Fn() -> Box<dyn Feature> + Send + Sync + 'static,
    {
        self.entries.push(RouteEntry { path: normalize(path), loader: Some(Box::new(loader)), slot: OnceLock::new() });
        self
    }

    /// Look up `path` (leading and trailing `/` ignored), loading it if needed.
    pub fn resolve(&self, path: &str) -> Option<&dyn Feature> {
        let entry = self.entry(path)?;
        if let Some(feature) = entry.slot.get() {
            return Some(feature.as_ref());
        }
        let load = entry.loader.as_ref()?;
        let feature = entry.slot.get_or_init(|| {
            tracing::debug!(path = entry.path, "route loaded");
            load()
        });
        Some(feature.as_ref())
    }

    /// Whether the feature behind `path` has been constructed.
    #[must_use]
    pub fn is_loaded(&self, path: &str) -> bool {
        self.entry(path).is_some_and(|e| e.slot.get().is_some())
    }

    /// Registered paths in registration order, without leading `/`.
    pub fn paths(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.path)
    }

    fn entry(&self, path: &str) -> Option<&RouteEntry> {
        let path = normalize(path);
        self.entries.iter().find(|e| e.path == path)
    }
}

fn normalize(path: &str) -> &str {
    path.trim().trim_matches('/')
}

// =============================================================================
// FEATURES
// =============================================================================

struct Home;
struct Signup;
struct Dashboard;
struct Login;

impl Feature for Home {
    fn name(&self) -> &'static str {
        "home"
    }
    fn title(&self) -> &'static str {
        "Let's Get Lunch"
    }
}

impl Feature for Signup {
    fn name(&self) -> &'static str {
        "signup"
    }
    fn title(&self) -> &'static str {
        "Sign up"
    }
}

impl Feature for Dashboard {
    fn name(&self) -> &'static str {
        "dashboard"
    }
    fn title(&self) -> &'static str {
        "Dashboard"
    }
}

impl Feature for Login {
    fn name(&self) -> &'static str {
        "login"
    }
    fn title(&self) -> &'static str {
        "Log in"
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
