//! Link-time discovery of service registration groups
//!
//! Crates that ship default services declare a [`ServiceGroup`] with
//! `inventory::submit!`. A host then calls [`register_discovered_groups`]
//! on its registry and every submitted group registers itself, ordered by
//! priority. This keeps the host free of compile-time knowledge about
//! which service crates are linked in.

use tracing::{debug, info};

use crate::ServiceRegistry;

/// A named bundle of service registrations, collectable via `inventory`
pub struct ServiceGroup {
    /// Human-readable name, used in logs
    pub name: &'static str,
    /// Runs the group's registrations against a registry
    pub register_fn: fn(&ServiceRegistry),
    /// Lower values register first (default 100)
    pub priority: u32,
}

impl ServiceGroup {
    /// Create a group with the default priority
    pub const fn new(name: &'static str, register_fn: fn(&ServiceRegistry)) -> Self {
        Self {
            name,
            register_fn,
            priority: 100,
        }
    }

    /// Create a group with an explicit priority
    pub const fn with_priority(
        name: &'static str,
        register_fn: fn(&ServiceRegistry),
        priority: u32,
    ) -> Self {
        Self {
            name,
            register_fn,
            priority,
        }
    }
}

inventory::collect!(ServiceGroup);

/// Run every submitted [`ServiceGroup`] against `services`
///
/// Groups run in ascending priority order; ties keep link order. Because
/// bindings are last-registration-wins, a high-priority (late) group can
/// shadow the defaults of an earlier one.
pub fn register_discovered_groups(services: &ServiceRegistry) {
    let mut groups: Vec<&ServiceGroup> = inventory::iter::<ServiceGroup>.into_iter().collect();
    groups.sort_by_key(|group| group.priority);

    info!("Discovered {} service group(s)", groups.len());
    for group in groups {
        debug!(
            "Registering service group '{}' (priority: {})",
            group.name, group.priority
        );
        (group.register_fn)(services);
    }
}

/// Number of groups submitted across all linked crates
pub fn discovered_group_count() -> usize {
    inventory::iter::<ServiceGroup>.into_iter().count()
}

/// Names of all submitted groups, unsorted
pub fn list_discovered_groups() -> Vec<&'static str> {
    inventory::iter::<ServiceGroup>
        .into_iter()
        .map(|group| group.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct ProbeService {
        marker: u32,
    }

    fn register_probe_services(services: &ServiceRegistry) {
        services.register(|_| Ok(Arc::new(ProbeService { marker: 7 })));
    }

    inventory::submit! {
        ServiceGroup::with_priority("probe", register_probe_services, 10)
    }

    #[test]
    fn submitted_group_is_discovered() {
        assert!(discovered_group_count() >= 1);
        assert!(list_discovered_groups().contains(&"probe"));
    }

    #[test]
    fn discovered_groups_register_their_services() {
        let services = ServiceRegistry::new();
        register_discovered_groups(&services);

        let probe = services.resolve::<ProbeService>().unwrap();
        assert_eq!(probe.marker, 7);
    }

    #[test]
    fn group_constructors_set_priority() {
        let group = ServiceGroup::new("default", register_probe_services);
        assert_eq!(group.priority, 100);

        let group = ServiceGroup::with_priority("early", register_probe_services, 1);
        assert_eq!(group.priority, 1);
    }
}
