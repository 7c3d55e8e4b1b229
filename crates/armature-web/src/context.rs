//! Test context owning the services for one test

use armature_di::ServiceRegistry;
use tracing::debug;

use crate::extensions::add_default_test_context_services;

/// Hosts one test's service registry
///
/// Created per test and dropped with it, together with every singleton
/// the registry constructed. Comes with the default web services already
/// registered; register a renderer and any overrides before resolving.
pub struct TestContext {
    services: ServiceRegistry,
}

impl TestContext {
    /// Create a context with the default web services registered
    pub fn new() -> Self {
        let services = ServiceRegistry::new();
        add_default_test_context_services(&services);
        debug!("Created test context");
        Self { services }
    }

    /// The service registry backing this context
    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
