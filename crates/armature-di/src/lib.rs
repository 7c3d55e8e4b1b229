//! Service registry for Armature test contexts
//!
//! Provides a thread-safe, type-keyed service registry with singleton and
//! transient lifetimes. Registration is append-only: registering a second
//! binding for the same capability type shadows the earlier one, so test
//! setup code can freely override defaults without unregistering anything.
//!
//! ## Features
//!
//! - **Type-safe resolution**: services are keyed by their Rust type,
//!   including trait objects such as `dyn Renderer`
//! - **Singleton and transient lifetimes**: singletons are constructed once,
//!   on first resolution; transients are rebuilt per resolution
//! - **Deferred wiring**: factories receive the registry and resolve their
//!   own dependencies when first invoked, so registration order never
//!   matters and missing dependencies only fail the services that need them
//! - **Auto-discovery**: service groups can be collected at link time via
//!   the `inventory` crate (see [`registration`])
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use armature_di::ServiceRegistry;
//!
//! struct Clock;
//!
//! struct Scheduler {
//!     clock: Arc<Clock>,
//! }
//!
//! let services = ServiceRegistry::new();
//! services
//!     .register(|_| Ok(Arc::new(Clock)))
//!     .register(|srv| {
//!         let clock = srv.resolve::<Clock>()?;
//!         Ok(Arc::new(Scheduler { clock }))
//!     });
//!
//! let scheduler = services.resolve::<Scheduler>().unwrap();
//! assert!(Arc::ptr_eq(&scheduler.clock, &services.resolve::<Clock>().unwrap()));
//! ```
//!
//! ## Thread Safety
//!
//! [`ServiceRegistry`] is `Send + Sync`. The bindings lock is never held
//! while a factory runs, so factories may resolve other services from the
//! same registry without deadlocking.

pub mod registration;

use std::any::{Any, TypeId};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use thiserror::Error;
use tracing::debug;

pub use registration::{register_discovered_groups, ServiceGroup};

/// Errors that can occur during service resolution
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Service not registered: {service_type}")]
    NotRegistered { service_type: String },

    #[error("Service payload did not downcast to {service_type}")]
    TypeMismatch { service_type: String },

    #[error("Failed to construct service {service_type}: {message}")]
    ConstructionFailed { service_type: String, message: String },
}

/// Result type for registry operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service lifetime management
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceLifetime {
    /// One instance per registry, created on first resolution and shared
    Singleton,
    /// A fresh instance on every resolution
    Transient,
}

/// Type-erased service payload. Every payload is a boxed `Arc<T>`, which
/// keeps `T: ?Sized` capabilities (trait objects) representable.
type ServicePayload = Box<dyn Any + Send + Sync>;

/// Factory closure producing a type-erased payload from the registry
type ServiceFactory = Box<dyn Fn(&ServiceRegistry) -> ServiceResult<ServicePayload> + Send + Sync>;

/// A single registration: capability key, lifetime, factory, and the
/// singleton slot the first resolution fills.
struct ServiceBinding {
    key: TypeId,
    type_name: &'static str,
    lifetime: ServiceLifetime,
    factory: ServiceFactory,
    slot: OnceCell<ServicePayload>,
}

/// Thread-safe, type-keyed service registry
///
/// Bindings are stored in registration order. Resolution scans from the
/// most recent binding backwards, which gives later registrations for the
/// same type precedence over earlier ones.
pub struct ServiceRegistry {
    bindings: RwLock<Vec<Arc<ServiceBinding>>>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(Vec::new()),
        }
    }

    /// Register a singleton service
    ///
    /// The factory runs at most once, on the first resolution of `T` through
    /// this binding. It receives the registry and may resolve other services
    /// from it. Returns `&Self` so registrations chain.
    pub fn register<F, T>(&self, factory: F) -> &Self
    where
        F: Fn(&ServiceRegistry) -> ServiceResult<Arc<T>> + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        self.push_binding(ServiceBinding {
            key: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            lifetime: ServiceLifetime::Singleton,
            factory: erase_factory(factory),
            slot: OnceCell::new(),
        });
        debug!("Registered service: {}", std::any::type_name::<T>());
        self
    }

    /// Register an already-constructed singleton instance
    ///
    /// The instance is shared as-is; no factory runs on resolution.
    pub fn register_instance<T>(&self, instance: Arc<T>) -> &Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        // The slot starts filled, so the factory below never runs; it exists
        // to keep every binding uniform and reproduces the same instance.
        let slot = OnceCell::with_value(Box::new(Arc::clone(&instance)) as ServicePayload);
        let factory: ServiceFactory =
            Box::new(move |_| Ok(Box::new(Arc::clone(&instance)) as ServicePayload));
        self.push_binding(ServiceBinding {
            key: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            lifetime: ServiceLifetime::Singleton,
            factory,
            slot,
        });
        debug!("Registered service instance: {}", std::any::type_name::<T>());
        self
    }

    /// Register a transient service
    ///
    /// The factory runs on every resolution of `T` through this binding.
    pub fn register_transient<F, T>(&self, factory: F) -> &Self
    where
        F: Fn(&ServiceRegistry) -> ServiceResult<Arc<T>> + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        self.push_binding(ServiceBinding {
            key: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            lifetime: ServiceLifetime::Transient,
            factory: erase_factory(factory),
            slot: OnceCell::new(),
        });
        debug!("Registered transient service: {}", std::any::type_name::<T>());
        self
    }

    /// Resolve a service by type
    ///
    /// Uses the most recent binding for `T`. For singletons the factory runs
    /// on the first call and the constructed instance is shared afterwards;
    /// construction failures are returned to every caller that hits them and
    /// retried on the next resolution. Factories that resolve their own
    /// dependencies recurse through this method; cycles between factories
    /// are not detected and will not return.
    pub fn resolve<T>(&self) -> ServiceResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let binding = self.last_binding(TypeId::of::<T>()).ok_or_else(|| {
            ServiceError::NotRegistered {
                service_type: std::any::type_name::<T>().to_string(),
            }
        })?;
        self.materialize(&binding)
    }

    /// Resolve every binding registered for `T`, in registration order
    ///
    /// Useful when a capability intentionally has several providers. Fails
    /// on the first binding that cannot be constructed.
    pub fn resolve_all<T>(&self) -> ServiceResult<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let matching: Vec<Arc<ServiceBinding>> = {
            let bindings = self.bindings.read();
            bindings
                .iter()
                .filter(|binding| binding.key == TypeId::of::<T>())
                .cloned()
                .collect()
        };
        matching
            .iter()
            .map(|binding| self.materialize(binding))
            .collect()
    }

    /// Whether at least one binding exists for `T`
    pub fn is_registered<T>(&self) -> bool
    where
        T: ?Sized + 'static,
    {
        let bindings = self.bindings.read();
        bindings.iter().any(|binding| binding.key == TypeId::of::<T>())
    }

    /// Number of bindings, counting shadowed ones
    pub fn binding_count(&self) -> usize {
        self.bindings.read().len()
    }

    /// Type names of all bindings, in registration order
    pub fn registered_types(&self) -> Vec<&'static str> {
        self.bindings
            .read()
            .iter()
            .map(|binding| binding.type_name)
            .collect()
    }

    fn push_binding(&self, binding: ServiceBinding) {
        self.bindings.write().push(Arc::new(binding));
    }

    /// Most recent binding for `key`, if any
    fn last_binding(&self, key: TypeId) -> Option<Arc<ServiceBinding>> {
        let bindings = self.bindings.read();
        bindings.iter().rev().find(|binding| binding.key == key).cloned()
    }

    /// Construct or fetch the payload for a binding and downcast it.
    /// The bindings lock is not held here, so factories are free to
    /// resolve their own dependencies from `self`.
    fn materialize<T>(&self, binding: &ServiceBinding) -> ServiceResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match binding.lifetime {
            ServiceLifetime::Singleton => {
                let payload = binding.slot.get_or_try_init(|| (binding.factory)(self))?;
                downcast_payload(payload, binding.type_name)
            }
            ServiceLifetime::Transient => {
                let payload = (binding.factory)(self)?;
                downcast_payload(&payload, binding.type_name)
            }
        }
    }
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a typed factory into the type-erased form stored in a binding
fn erase_factory<F, T>(factory: F) -> ServiceFactory
where
    F: Fn(&ServiceRegistry) -> ServiceResult<Arc<T>> + Send + Sync + 'static,
    T: ?Sized + Send + Sync + 'static,
{
    Box::new(move |registry| {
        let service = factory(registry)?;
        Ok(Box::new(service) as ServicePayload)
    })
}

/// Recover the typed `Arc<T>` from a type-erased payload
fn downcast_payload<T>(payload: &ServicePayload, type_name: &'static str) -> ServiceResult<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    payload
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| ServiceError::TypeMismatch {
            service_type: type_name.to_string(),
        })
}

/// Builder for assembling a registry before handing it to a test context
///
/// Wraps [`ServiceRegistry`] in a by-value chain for setup code that
/// prefers `builder.register(..).build()` over registering on a shared
/// reference. Extension traits can hook registration bundles onto the
/// builder through [`ServiceRegistryBuilder::registry`].
pub struct ServiceRegistryBuilder {
    registry: ServiceRegistry,
}

impl ServiceRegistryBuilder {
    /// Create a builder around an empty registry
    pub fn new() -> Self {
        Self {
            registry: ServiceRegistry::new(),
        }
    }

    /// Register a singleton service
    pub fn register<F, T>(self, factory: F) -> Self
    where
        F: Fn(&ServiceRegistry) -> ServiceResult<Arc<T>> + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.register(factory);
        self
    }

    /// Register an already-constructed singleton instance
    pub fn register_instance<T>(self, instance: Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.register_instance(instance);
        self
    }

    /// Register a transient service
    pub fn register_transient<F, T>(self, factory: F) -> Self
    where
        F: Fn(&ServiceRegistry) -> ServiceResult<Arc<T>> + Send + Sync + 'static,
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry.register_transient(factory);
        self
    }

    /// The registry under construction
    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Finish and return the assembled registry
    pub fn build(self) -> ServiceRegistry {
        self.registry
    }
}

impl Default for ServiceRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
