//! Input deserialization stages.
//!
//! Both stages read the request body as JSON and short-circuit with a 400
//! response on any client input problem, so the raw handler never runs on
//! bad input. [`DeserializeStage`] additionally validates and converts the
//! body through a schema; [`DeserializeJsonStage`] passes the decoded JSON
//! value through unchanged.

use std::sync::Arc;

use http::StatusCode;

use slimrest_core::{payload, PipelineError, Response, ResponseExt, Schema, ValidationErrors};

use crate::context::RequestContext;
use crate::stage::{Next, Outcome, Stage, StageResult};

/// Pre-handler stage: validate and convert the JSON body through a schema,
/// appending the typed payload as a handler argument.
pub struct DeserializeStage {
    schema: Arc<dyn Schema>,
}

impl DeserializeStage {
    /// Creates the stage for a schema.
    #[must_use]
    pub fn new(schema: impl Schema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    /// Creates the stage from an already-shared schema.
    #[must_use]
    pub fn from_shared(schema: Arc<dyn Schema>) -> Self {
        Self { schema }
    }
}

impl Stage for DeserializeStage {
    fn name(&self) -> &'static str {
        "deserialize"
    }

    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
        let json = match ctx.json_body() {
            Ok(json) => json,
            Err(error) => return Ok(Outcome::Response(client_error_response(&error))),
        };

        match self.schema.load(json) {
            Ok(value) => {
                ctx.push_arg(value);
                next.run(ctx)
            }
            Err(errors) => {
                tracing::debug!(fields = errors.len(), "request body failed validation");
                Ok(Outcome::Response(validation_response(&errors)))
            }
        }
    }
}

/// Pre-handler stage: decode the body as JSON without schema validation and
/// pass the raw value through as a handler argument.
pub struct DeserializeJsonStage;

impl Stage for DeserializeJsonStage {
    fn name(&self) -> &'static str {
        "deserialize_json"
    }

    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
        match ctx.json_body() {
            Ok(json) => {
                ctx.push_arg(payload(json));
                next.run(ctx)
            }
            Err(error) => Ok(Outcome::Response(client_error_response(&error))),
        }
    }
}

fn client_error_response(error: &PipelineError) -> Response {
    Response::json_message(StatusCode::BAD_REQUEST, &error.to_string())
}

fn validation_response(errors: &ValidationErrors) -> Response {
    let body = serde_json::json!({
        "message": "request body failed validation",
        "errors": errors.fields,
    });
    Response::json(StatusCode::BAD_REQUEST, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::pipeline::Pipeline;
    use bytes::Bytes;
    use http::{HeaderMap, Method};
    use serde::{Deserialize, Serialize};
    use slimrest_core::JsonSchema;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Serialize, Deserialize)]
    struct Greeting {
        hello: String,
    }

    fn json_ctx(body: &str) -> RequestContext {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            "application/json".parse().unwrap(),
        );
        RequestContext::new(Method::POST, "/test/post")
            .with_headers(headers)
            .with_body(Bytes::copy_from_slice(body.as_bytes()))
    }

    fn counting_pipeline(calls: Arc<AtomicUsize>) -> Pipeline {
        Pipeline::builder()
            .stage(DeserializeStage::new(JsonSchema::<Greeting>::new()))
            .handler(handler_fn(move |ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                let arg = ctx.take_arg().expect("deserialize stage appends the body");
                let greeting = arg.downcast::<Greeting>().expect("typed payload");
                Ok(payload(greeting.hello))
            }))
    }

    #[test]
    fn valid_body_reaches_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = counting_pipeline(calls.clone());

        let mut ctx = json_ctx(r#"{"hello": "World"}"#);
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_body_returns_400_without_invoking_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = counting_pipeline(calls.clone());

        let mut ctx = RequestContext::new(Method::POST, "/test/post");
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn malformed_json_returns_400_without_invoking_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = counting_pipeline(calls.clone());

        let mut ctx = json_ctx("Some random stuff");
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn schema_violation_returns_400_with_field_detail() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = counting_pipeline(calls.clone());

        let mut ctx = json_ctx(r#"{"hello": 42}"#);
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn raw_json_stage_passes_the_decoded_value() {
        let pipeline = Pipeline::builder()
            .stage(DeserializeJsonStage)
            .handler(handler_fn(|ctx| {
                let arg = ctx.take_arg().expect("raw JSON appended");
                let json = arg.downcast::<serde_json::Value>().expect("JSON value");
                Ok(payload(*json))
            }));

        let mut ctx = json_ctx(r#"{"anything": ["goes", 1, null]}"#);
        let response = pipeline.handle(&mut ctx).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
