//! Namespaces and endpoints.
//!
//! A namespace groups related endpoints under a URL prefix and a name
//! prefix. An endpoint's externally visible name is
//! `<name prefix>_<handler name>`; it is the sole key for reverse link
//! generation. Namespaces are built atomically, so binding a namespace
//! never observes a partially declared endpoint set.

use std::sync::Arc;

use http::Method;

use slimrest_pipeline::{Handler, Pipeline, PipelineBuilder, Stage};

use crate::registry::RouteSpec;

/// One routable operation: a URL suffix, an HTTP method set, and a composed
/// pipeline. Immutable once built.
pub struct Endpoint {
    suffix: String,
    methods: Vec<Method>,
    handler_name: String,
    pipeline: Arc<Pipeline>,
}

impl Endpoint {
    /// Starts building an endpoint for a URL suffix (relative to the
    /// namespace prefix) and a handler name. The method set defaults to
    /// GET-only.
    #[must_use]
    pub fn builder(suffix: impl Into<String>, handler_name: impl Into<String>) -> EndpointBuilder {
        EndpointBuilder {
            suffix: suffix.into(),
            methods: vec![Method::GET],
            handler_name: handler_name.into(),
            stages: Pipeline::builder(),
        }
    }

    /// Returns the URL suffix relative to the namespace.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Returns the HTTP methods this endpoint answers.
    #[must_use]
    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    /// Returns the handler name (the endpoint-local part of the external
    /// name).
    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    /// Returns the composed request-handling unit.
    #[must_use]
    pub fn pipeline(&self) -> &Arc<Pipeline> {
        &self.pipeline
    }
}

/// Builder for [`Endpoint`]. Stages are declared outermost first; the
/// handler finishes the build.
pub struct EndpointBuilder {
    suffix: String,
    methods: Vec<Method>,
    handler_name: String,
    stages: PipelineBuilder,
}

impl EndpointBuilder {
    /// Replaces the method set (default: GET-only).
    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }

    /// Appends a stage inside all previously declared stages.
    #[must_use]
    pub fn stage<S: Stage>(mut self, stage: S) -> Self {
        self.stages = self.stages.stage(stage);
        self
    }

    /// Sets the raw handler and builds the endpoint.
    #[must_use]
    pub fn handler<H: Handler>(self, handler: H) -> Endpoint {
        Endpoint {
            suffix: self.suffix,
            methods: self.methods,
            handler_name: self.handler_name,
            pipeline: Arc::new(self.stages.handler(handler)),
        }
    }
}

/// A named group of endpoints sharing a URL prefix.
pub struct Namespace {
    url_prefix: String,
    name_prefix: String,
    endpoints: Vec<Endpoint>,
}

impl Namespace {
    /// Starts building a namespace.
    ///
    /// `declared_as` is the name of the declaring type; the default name
    /// prefix is derived from it by CamelCase → snake_case conversion
    /// (`HeroNamespace` becomes `hero_namespace`). Override it with
    /// [`NamespaceBuilder::name_prefix`].
    #[must_use]
    pub fn builder(url_prefix: impl Into<String>, declared_as: &str) -> NamespaceBuilder {
        NamespaceBuilder {
            url_prefix: url_prefix.into(),
            name_prefix: derive_name_prefix(declared_as),
            endpoints: Vec::new(),
        }
    }

    /// Returns the URL prefix.
    #[must_use]
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Returns the name prefix used for endpoint names.
    #[must_use]
    pub fn name_prefix(&self) -> &str {
        &self.name_prefix
    }

    /// Returns the endpoints in declaration order.
    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Returns the route registrations for every endpoint, in declaration
    /// order.
    #[must_use]
    pub fn route_specs(&self) -> Vec<RouteSpec> {
        self.endpoints
            .iter()
            .map(|endpoint| RouteSpec {
                pattern: join_pattern(&self.url_prefix, &endpoint.suffix),
                methods: endpoint.methods.clone(),
                name: format!("{}_{}", self.name_prefix, endpoint.handler_name),
                pipeline: endpoint.pipeline.clone(),
            })
            .collect()
    }
}

/// Builder for [`Namespace`].
pub struct NamespaceBuilder {
    url_prefix: String,
    name_prefix: String,
    endpoints: Vec<Endpoint>,
}

impl NamespaceBuilder {
    /// Overrides the derived name prefix.
    #[must_use]
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }

    /// Adds an endpoint to the namespace.
    #[must_use]
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoints.push(endpoint);
        self
    }

    /// Finishes the namespace.
    #[must_use]
    pub fn build(self) -> Namespace {
        Namespace {
            url_prefix: self.url_prefix,
            name_prefix: self.name_prefix,
            endpoints: self.endpoints,
        }
    }
}

/// Converts a CamelCase type name to the lowercase-with-separators name
/// prefix.
fn derive_name_prefix(type_name: &str) -> String {
    let chars: Vec<char> = type_name.chars().collect();
    let mut out = String::with_capacity(type_name.len() + 4);

    for (i, c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let after_lower = i > 0 && chars[i - 1].is_lowercase();
            let before_lower = i > 0 && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if after_lower || before_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(*c);
        }
    }

    out
}

/// Joins a namespace prefix and an endpoint suffix into a full URL pattern.
fn join_pattern(prefix: &str, suffix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if suffix.is_empty() {
        format!("{prefix}/")
    } else if suffix.starts_with('/') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}/{suffix}")
    }
}
