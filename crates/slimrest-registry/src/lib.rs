//! Namespace registry and deferred route binding for slimrest.
//!
//! Endpoints are declared in [`Namespace`] groups sharing a URL prefix and a
//! name prefix. A [`Registry`] records namespaces and, once bound to a
//! hosting server (anything implementing [`RouteRegistrar`]), pushes every
//! recorded and every subsequently declared endpoint into it. Declaration
//! and binding can happen in either order; once binding has occurred the two
//! orders are indistinguishable to callers.

pub mod namespace;
pub mod registry;

pub use namespace::{Endpoint, EndpointBuilder, Namespace, NamespaceBuilder};
pub use registry::{Registry, RouteRegistrar, RouteSpec};
