//! Rendering capability consumed by the web test services
//!
//! The test context never ships a renderer of its own. A rendering backend
//! registers an implementation of [`TestRenderer`], and services that need
//! rendered markup resolve it lazily at first use.

use std::fmt;

/// Identifier of a component instance managed by a test renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub u64);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract a rendering backend satisfies for the test context
pub trait TestRenderer: Send + Sync {
    /// Latest rendered markup for a component, or `None` when this
    /// renderer does not manage it or has not rendered it yet
    fn rendered_markup(&self, component: ComponentId) -> Option<String>;
}
