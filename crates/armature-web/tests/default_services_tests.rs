//! Tests for the default web test context services

use std::collections::HashMap;
use std::ptr;
use std::sync::Arc;

use armature_di::{
    register_discovered_groups, ServiceError, ServiceRegistry, ServiceRegistryBuilder,
};
use armature_web::{
    add_default_test_context_services, ComponentId, HtmlComparer, HtmlParser, JsRuntime,
    TestContext, TestContextServicesExt, TestRenderer,
};

struct MapRenderer {
    pages: HashMap<ComponentId, String>,
}

impl MapRenderer {
    fn with_page(component: ComponentId, markup: &str) -> Self {
        let mut pages = HashMap::new();
        pages.insert(component, markup.to_string());
        Self { pages }
    }
}

impl TestRenderer for MapRenderer {
    fn rendered_markup(&self, component: ComponentId) -> Option<String> {
        self.pages.get(&component).cloned()
    }
}

#[test]
fn test_bootstrap_returns_the_registry_it_was_given() {
    let services = ServiceRegistry::new();
    let returned = add_default_test_context_services(&services);
    assert!(ptr::eq(returned, &services));
}

#[test]
fn test_bootstrap_registers_three_bindings() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    assert_eq!(services.binding_count(), 3);
    assert!(services.is_registered::<dyn JsRuntime>());
    assert!(services.is_registered::<HtmlComparer>());
    assert!(services.is_registered::<HtmlParser>());
}

#[test]
fn test_js_runtime_resolves_to_a_shared_placeholder() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    let first = services.resolve::<dyn JsRuntime>().unwrap();
    let second = services.resolve::<dyn JsRuntime>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_comparer_is_a_shared_singleton() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    let first = services.resolve::<HtmlComparer>().unwrap();
    let second = services.resolve::<HtmlComparer>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_parser_is_wired_from_the_renderer_and_the_context_comparer() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    // The renderer arrives after the defaults, as it does in real setups.
    let renderer = MapRenderer::with_page(ComponentId(1), "<p>Hi</p>");
    services.register_instance::<dyn TestRenderer>(Arc::new(renderer));

    let parser = services.resolve::<HtmlParser>().unwrap();
    let comparer = services.resolve::<HtmlComparer>().unwrap();
    assert!(Arc::ptr_eq(&parser.comparer(), &comparer));

    let resolved_renderer = services.resolve::<dyn TestRenderer>().unwrap();
    assert!(Arc::ptr_eq(&parser.renderer(), &resolved_renderer));

    let fragment = parser.parse_component(ComponentId(1)).unwrap();
    assert!(fragment.matches("<p>Hi</p>"));
}

#[test]
fn test_parser_resolution_fails_while_other_services_keep_working() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    match services.resolve::<HtmlParser>() {
        Err(ServiceError::NotRegistered { service_type }) => {
            // The missing dependency is the renderer, not the parser.
            assert!(service_type.contains("TestRenderer"));
        }
        Ok(_) => panic!("expected parser resolution to fail"),
        Err(other) => panic!("expected NotRegistered, got {other:?}"),
    }

    // The failure stays scoped to the parser.
    services.resolve::<HtmlComparer>().unwrap();
    services.resolve::<dyn JsRuntime>().unwrap();
}

#[test]
fn test_parser_resolution_recovers_once_a_renderer_is_registered() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    assert!(services.resolve::<HtmlParser>().is_err());

    let renderer = MapRenderer::with_page(ComponentId(2), "<span>late</span>");
    services.register_instance::<dyn TestRenderer>(Arc::new(renderer));

    let parser = services.resolve::<HtmlParser>().unwrap();
    let fragment = parser.parse_component(ComponentId(2)).unwrap();
    assert!(fragment.matches("<span>late</span>"));
}

#[test]
fn test_bootstrapping_twice_shadows_the_earlier_defaults() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);
    add_default_test_context_services(&services);

    assert_eq!(services.binding_count(), 6);

    let all = services.resolve_all::<HtmlComparer>().unwrap();
    assert_eq!(all.len(), 2);

    // Plain resolution uses the later registration.
    let comparer = services.resolve::<HtmlComparer>().unwrap();
    assert!(Arc::ptr_eq(&comparer, &all[1]));
    assert!(!Arc::ptr_eq(&comparer, &all[0]));
}

#[test]
fn test_custom_comparer_registered_on_top_wins_everywhere() {
    let services = ServiceRegistry::new();
    add_default_test_context_services(&services);

    let custom = Arc::new(HtmlComparer::new());
    services.register_instance(Arc::clone(&custom));

    let renderer = MapRenderer::with_page(ComponentId(3), "<p>x</p>");
    services.register_instance::<dyn TestRenderer>(Arc::new(renderer));

    let resolved = services.resolve::<HtmlComparer>().unwrap();
    assert!(Arc::ptr_eq(&resolved, &custom));

    // The parser factory resolves the override as well.
    let parser = services.resolve::<HtmlParser>().unwrap();
    assert!(Arc::ptr_eq(&parser.comparer(), &custom));
}

#[test]
fn test_builder_extension_registers_the_defaults() {
    let services = ServiceRegistryBuilder::new()
        .add_default_test_context_services()
        .build();

    assert_eq!(services.binding_count(), 3);
    services.resolve::<HtmlComparer>().unwrap();
    services.resolve::<dyn JsRuntime>().unwrap();
}

#[test]
fn test_defaults_register_through_group_discovery() {
    let services = ServiceRegistry::new();
    register_discovered_groups(&services);

    assert!(services.is_registered::<dyn JsRuntime>());
    assert!(services.is_registered::<HtmlComparer>());
    assert!(services.is_registered::<HtmlParser>());
}

#[test]
fn test_context_comes_with_defaults_registered() {
    let ctx = TestContext::new();
    assert_eq!(ctx.services().binding_count(), 3);
    ctx.services().resolve::<HtmlComparer>().unwrap();
}

#[test]
fn test_each_context_gets_its_own_singletons() {
    let first = TestContext::new();
    let second = TestContext::new();

    let a = first.services().resolve::<HtmlComparer>().unwrap();
    let b = second.services().resolve::<HtmlComparer>().unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}
