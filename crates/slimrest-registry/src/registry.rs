//! The registry and its deferred binding to a hosting server.

use std::sync::Arc;

use http::Method;

use slimrest_pipeline::Pipeline;

use crate::namespace::Namespace;

/// Everything a hosting server needs to mount one endpoint.
pub struct RouteSpec {
    /// Full URL pattern, namespace prefix included.
    pub pattern: String,
    /// HTTP methods the endpoint answers.
    pub methods: Vec<Method>,
    /// Externally visible endpoint name, the key for reverse link
    /// generation.
    pub name: String,
    /// The composed request-handling unit.
    pub pipeline: Arc<Pipeline>,
}

/// Sink for route registrations. Implemented by hosting servers.
pub trait RouteRegistrar: Send + Sync {
    /// Mounts one endpoint.
    fn register_route(&self, route: RouteSpec);
}

enum Binding {
    Unbound,
    Bound(Arc<dyn RouteRegistrar>),
}

/// Records declared namespaces and forwards them to a hosting server.
///
/// Declaration and binding commute. Namespaces declared before [`bind`] are
/// recorded and flushed at bind time; namespaces declared after are
/// forwarded immediately. Until a binding exists no route is live, so a
/// request for a declared endpoint still yields the server's not-found
/// answer.
///
/// [`bind`]: Registry::bind
pub struct Registry {
    namespaces: Vec<Arc<Namespace>>,
    binding: Binding,
}

impl Registry {
    /// Creates an empty, unbound registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespaces: Vec::new(),
            binding: Binding::Unbound,
        }
    }

    /// Declares a namespace, forwarding its endpoints right away when a
    /// binding exists.
    pub fn declare(&mut self, namespace: Namespace) -> Arc<Namespace> {
        let namespace = Arc::new(namespace);
        if let Binding::Bound(registrar) = &self.binding {
            register_namespace(registrar.as_ref(), &namespace);
        }
        self.namespaces.push(namespace.clone());
        namespace
    }

    /// Binds the registry to a hosting server and flushes every recorded
    /// namespace into it, in declaration order.
    ///
    /// Binding again replaces the registrar and replays all namespaces into
    /// the new one. Callers binding the same registrar twice get duplicate
    /// registrations, which a first-match router resolves in favor of the
    /// original.
    pub fn bind(&mut self, registrar: Arc<dyn RouteRegistrar>) {
        tracing::debug!(namespaces = self.namespaces.len(), "binding registry");
        for namespace in &self.namespaces {
            register_namespace(registrar.as_ref(), namespace);
        }
        self.binding = Binding::Bound(registrar);
    }

    /// Returns whether a binding exists.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// Returns the declared namespaces in declaration order.
    #[must_use]
    pub fn namespaces(&self) -> &[Arc<Namespace>] {
        &self.namespaces
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn register_namespace(registrar: &dyn RouteRegistrar, namespace: &Namespace) {
    for route in namespace.route_specs() {
        tracing::debug!(name = %route.name, pattern = %route.pattern, "registering route");
        registrar.register_route(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::Endpoint;
    use parking_lot::Mutex;
    use slimrest_core::payload;
    use slimrest_pipeline::handler_fn;

    #[derive(Default)]
    struct RecordingRegistrar {
        routes: Mutex<Vec<(String, String)>>,
    }

    impl RouteRegistrar for RecordingRegistrar {
        fn register_route(&self, route: RouteSpec) {
            self.routes.lock().push((route.name, route.pattern));
        }
    }

    fn test_namespace() -> Namespace {
        Namespace::builder("/test", "TestNamespace")
            .endpoint(
                Endpoint::builder("/hello", "hello_endpoint")
                    .handler(handler_fn(|_ctx| Ok(payload(String::from("Hello world!"))))),
            )
            .build()
    }

    #[test]
    fn declare_before_bind_is_flushed_at_bind_time() {
        let mut registry = Registry::new();
        registry.declare(test_namespace());
        assert!(!registry.is_bound());

        let registrar = Arc::new(RecordingRegistrar::default());
        registry.bind(registrar.clone());

        assert!(registry.is_bound());
        let routes = registrar.routes.lock();
        assert_eq!(
            *routes,
            vec![(
                String::from("test_namespace_hello_endpoint"),
                String::from("/test/hello"),
            )]
        );
    }

    #[test]
    fn declare_after_bind_registers_immediately() {
        let mut registry = Registry::new();
        let registrar = Arc::new(RecordingRegistrar::default());
        registry.bind(registrar.clone());
        assert!(registrar.routes.lock().is_empty());

        registry.declare(test_namespace());
        assert_eq!(registrar.routes.lock().len(), 1);
    }

    #[test]
    fn rebinding_replays_everything() {
        let mut registry = Registry::new();
        registry.declare(test_namespace());

        let first = Arc::new(RecordingRegistrar::default());
        registry.bind(first.clone());
        let second = Arc::new(RecordingRegistrar::default());
        registry.bind(second.clone());

        assert_eq!(first.routes.lock().len(), 1);
        assert_eq!(second.routes.lock().len(), 1);
    }

    #[test]
    fn binding_twice_to_the_same_registrar_duplicates_routes() {
        let mut registry = Registry::new();
        registry.declare(test_namespace());

        let registrar = Arc::new(RecordingRegistrar::default());
        registry.bind(registrar.clone());
        registry.bind(registrar.clone());

        assert_eq!(registrar.routes.lock().len(), 2);
    }

    #[test]
    fn namespaces_are_kept_in_declaration_order() {
        let mut registry = Registry::new();
        registry.declare(test_namespace());
        registry.declare(
            Namespace::builder("/other", "OtherNamespace")
                .endpoint(
                    Endpoint::builder("/x", "x_endpoint")
                        .handler(handler_fn(|_ctx| Ok(payload(String::new())))),
                )
                .build(),
        );

        let prefixes: Vec<&str> = registry
            .namespaces()
            .iter()
            .map(|n| n.url_prefix())
            .collect();
        assert_eq!(prefixes, vec!["/test", "/other"]);
    }
}
