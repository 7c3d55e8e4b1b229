//! Default service registration for web test contexts

use std::sync::Arc;

use armature_di::{ServiceGroup, ServiceRegistry, ServiceRegistryBuilder};
use tracing::debug;

use crate::diffing::HtmlComparer;
use crate::js_interop::{JsRuntime, PlaceholderJsRuntime};
use crate::parsing::HtmlParser;
use crate::rendering::TestRenderer;

/// Register the default services every web test context needs
///
/// Three bindings are added:
///
/// - `dyn JsRuntime`: a [`PlaceholderJsRuntime`] instance, shared eagerly,
///   so interop resolution always succeeds and only invocations fail
/// - [`HtmlComparer`]: a lazy singleton with no dependencies
/// - [`HtmlParser`]: a lazy singleton that resolves the registered
///   `dyn TestRenderer` and the comparer when first used
///
/// No renderer is registered here; the rendering backend supplies one.
/// Until it does, resolving the parser fails while the other services
/// keep working. Calling this twice shadows the earlier defaults, and a
/// test can shadow any single binding afterwards with its own.
///
/// Returns the registry it was given, so calls chain.
pub fn add_default_test_context_services(services: &ServiceRegistry) -> &ServiceRegistry {
    let runtime: Arc<dyn JsRuntime> = Arc::new(PlaceholderJsRuntime::new());
    services.register_instance(runtime);

    services.register(|_| Ok(Arc::new(HtmlComparer::new())));

    services.register(|srv| {
        let renderer = srv.resolve::<dyn TestRenderer>()?;
        let comparer = srv.resolve::<HtmlComparer>()?;
        Ok(Arc::new(HtmlParser::new(renderer, comparer)))
    });

    debug!("Registered default web test context services");
    services
}

/// Builder-side spelling of [`add_default_test_context_services`]
pub trait TestContextServicesExt {
    /// Register the default web test context services
    fn add_default_test_context_services(self) -> Self;
}

impl TestContextServicesExt for ServiceRegistryBuilder {
    fn add_default_test_context_services(self) -> Self {
        add_default_test_context_services(self.registry());
        self
    }
}

fn register_web_defaults(services: &ServiceRegistry) {
    add_default_test_context_services(services);
}

inventory::submit! {
    ServiceGroup::new("web-test-context", register_web_defaults)
}
