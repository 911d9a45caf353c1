//! Output serialization stage.
//!
//! [`SerializeStage`] turns the value flowing out of the inner chain into a
//! JSON response. It is configured with either a single schema or a
//! runtime-type mapping, optionally expects a pagination envelope, and
//! supports an overridable success status code.

use http::StatusCode;

use slimrest_core::{
    Payload, PipelineError, PipelineResult, Response, ResponseExt, Schema, SchemaMapping,
};

use crate::context::RequestContext;
use crate::pagination::PaginationEnvelope;
use crate::stage::{Next, Outcome, Stage, StageResult};

enum Serializer {
    Single(Box<dyn Schema>),
    Mapping(SchemaMapping),
}

impl Serializer {
    fn dump(&self, value: &Payload) -> PipelineResult<serde_json::Value> {
        match self {
            Self::Single(schema) => schema.dump(value.as_ref()),
            Self::Mapping(mapping) => mapping.dump(value.as_ref()),
        }
    }

    fn dump_many(&self, values: &[Payload]) -> PipelineResult<serde_json::Value> {
        match self {
            Self::Single(schema) => schema.dump_many(values),
            Self::Mapping(mapping) => {
                let items = values
                    .iter()
                    .map(|value| mapping.dump(value.as_ref()))
                    .collect::<PipelineResult<Vec<_>>>()?;
                Ok(serde_json::Value::Array(items))
            }
        }
    }
}

/// Post-handler stage producing the JSON response body.
///
/// With a single schema the dump is permissive (a mismatched value yields an
/// empty object); with a [`SchemaMapping`] a value whose runtime type has no
/// entry is a hard mapping dispatch failure. In paginated mode the stage
/// requires its input to be a [`PaginationEnvelope`] and emits the envelope
/// body with `items`, `page`, `page_count`, `next` and `prev` fields.
pub struct SerializeStage {
    serializer: Serializer,
    paginated: bool,
    status: StatusCode,
}

impl SerializeStage {
    /// Creates the stage with one schema applied to whatever flows out of
    /// the inner chain.
    #[must_use]
    pub fn single(schema: impl Schema) -> Self {
        Self {
            serializer: Serializer::Single(Box::new(schema)),
            paginated: false,
            status: StatusCode::OK,
        }
    }

    /// Creates the stage with a runtime-type → schema mapping.
    #[must_use]
    pub fn mapping(mapping: SchemaMapping) -> Self {
        Self {
            serializer: Serializer::Mapping(mapping),
            paginated: false,
            status: StatusCode::OK,
        }
    }

    /// Requires the input to be a pagination envelope and serializes its
    /// item list.
    #[must_use]
    pub fn paginated(mut self) -> Self {
        self.paginated = true;
        self
    }

    /// Overrides the success status code (default 200).
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    fn body_for(&self, value: Payload) -> PipelineResult<serde_json::Value> {
        if self.paginated {
            let envelope = value.downcast::<PaginationEnvelope>().map_err(|_| {
                PipelineError::stage_configuration(
                    "paginated serializer expects a pagination envelope",
                )
            })?;
            let items = self.serializer.dump_many(&envelope.items)?;
            Ok(serde_json::json!({
                "items": items,
                "page": envelope.page,
                "page_count": envelope.page_count,
                "next": envelope.next,
                "prev": envelope.prev,
            }))
        } else {
            self.serializer.dump(&value)
        }
    }
}

impl Stage for SerializeStage {
    fn name(&self) -> &'static str {
        "serialize"
    }

    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
        match next.run(ctx)? {
            Outcome::Response(response) => Ok(Outcome::Response(response)),
            Outcome::Value(value) => {
                let body = self.body_for(value)?;
                Ok(Outcome::Response(Response::json(self.status, &body)))
            }
        }
    }
}
