//! Endpoint pipeline composition for slimrest.
//!
//! A request-handling unit is composed from an ordered stack of [`Stage`]
//! values wrapped around exactly one raw [`Handler`]. The first declared
//! stage is the outermost: execution order for a request is
//! stage₁(stage₂(…(stageₙ(handler))…)).
//!
//! Each stage either passes processing on to its inner chain (optionally
//! appending a deserialized argument, or transforming the value flowing back
//! out) or short-circuits with a final HTTP response. Errors propagate
//! outward unchanged unless a [`CatchStage`](stages::CatchStage) is
//! configured for their kind.
//!
//! ```rust
//! use slimrest_core::{payload, JsonSchema};
//! use slimrest_pipeline::{handler_fn, Pipeline, RequestContext};
//! use slimrest_pipeline::stages::SerializeStage;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Greeting { hello: String }
//!
//! let pipeline = Pipeline::builder()
//!     .stage(SerializeStage::single(JsonSchema::<Greeting>::new()))
//!     .handler(handler_fn(|_ctx| Ok(payload(Greeting { hello: "world".into() }))));
//!
//! let mut ctx = RequestContext::new(http::Method::GET, "/greeting");
//! let response = pipeline.handle(&mut ctx).unwrap();
//! assert_eq!(response.status(), http::StatusCode::OK);
//! ```

pub mod context;
pub mod handler;
pub mod pagination;
pub mod pipeline;
pub mod stage;
pub mod stages;

pub use context::RequestContext;
pub use handler::{handler_fn, Handler, HandlerResult};
pub use pagination::{per_page, PagePolicy, PaginationEnvelope};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use stage::{Next, Outcome, Stage, StageResult};
pub use stages::{CatchStage, DeserializeJsonStage, DeserializeStage, PaginateStage, SerializeStage};
