//! Core types and traits for the slimrest framework.
//!
//! This crate holds everything the other slimrest crates agree on:
//!
//! - [`Payload`] - the type-erased value flowing through a request pipeline
//! - [`PipelineError`] - the error taxonomy for request processing
//! - [`Schema`] - the serialization/validation capability interface
//! - [`Response`] helpers for building JSON responses
//! - [`UrlFor`] - the reverse-routing seam used for link generation

pub mod error;
pub mod payload;
pub mod response;
pub mod schema;
pub mod url;

pub use error::{PipelineError, PipelineErrorKind, PipelineResult, ValidationErrors};
pub use payload::{payload, payload_seq, Payload};
pub use response::{Body, Response, ResponseExt, JSON_MEDIA_TYPE};
pub use schema::{JsonSchema, Schema, SchemaMapping};
pub use url::UrlFor;
