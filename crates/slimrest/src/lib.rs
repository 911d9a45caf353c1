//! # slimrest
//!
//! **Declarative REST endpoint pipelines for Rust**
//!
//! slimrest builds HTTP endpoints out of small, composable processing
//! stages wrapped around a raw handler:
//!
//! - **Pipelines** - deserialize, catch, paginate and serialize stages
//!   composed in declaration order around a handler
//! - **Namespaces** - endpoints grouped under a URL prefix with derived,
//!   collision-free external names
//! - **Deferred binding** - declare endpoints before or after attaching
//!   the registry to a server; the result is the same
//! - **Pagination** - windowing policies with absolute next/prev links
//!   generated through reverse routing
//! - **Schema dispatch** - serialize by value or by runtime type through
//!   a schema mapping
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slimrest::prelude::*;
//!
//! let namespace = Namespace::builder("/heroes", "HeroNamespace")
//!     .endpoint(
//!         Endpoint::builder("/", "hero_collection")
//!             .stage(SerializeStage::single(JsonSchema::<Hero>::new()).paginated())
//!             .stage(PaginateStage::per_page(2))
//!             .handler(handler_fn(|_ctx| Ok(payload_seq(all_heroes())))),
//!     )
//!     .build();
//!
//! let server = Server::new(ServerConfig::default());
//! let mut registry = Registry::new();
//! registry.declare(namespace);
//! registry.bind(server.clone());
//!
//! server.serve().await?;
//! ```

pub use slimrest_core as core;

pub use slimrest_pipeline as pipeline;

pub use slimrest_registry as registry;

pub use slimrest_server as server;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use slimrest::prelude::*;
/// ```
pub mod prelude {
    pub use slimrest_core::{
        payload, payload_seq, JsonSchema, Payload, PipelineError, PipelineErrorKind,
        PipelineResult, Response, ResponseExt, Schema, SchemaMapping, UrlFor, ValidationErrors,
    };

    pub use slimrest_pipeline::{
        handler_fn, per_page, CatchStage, DeserializeJsonStage, DeserializeStage, Handler,
        HandlerResult, Next, Outcome, PagePolicy, PaginateStage, PaginationEnvelope, Pipeline,
        PipelineBuilder, RequestContext, SerializeStage, Stage, StageResult,
    };

    pub use slimrest_registry::{
        Endpoint, EndpointBuilder, Namespace, NamespaceBuilder, Registry, RouteRegistrar,
        RouteSpec,
    };

    pub use slimrest_server::{Server, ServerConfig, ServerError};
}
