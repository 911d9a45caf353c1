//! The pipeline composer.
//!
//! [`Pipeline`] turns an ordered stage stack plus a raw handler into one
//! request-handling unit. Stages are declared outermost first, so the chain
//! is built back to front: the last declared stage wraps the handler, and
//! the first declared stage wraps everything.

use std::sync::Arc;

use http::StatusCode;

use slimrest_core::{PipelineError, PipelineResult, Response, ResponseExt};

use crate::context::RequestContext;
use crate::handler::Handler;
use crate::stage::{Next, Outcome, Stage};

/// A composed request-handling unit, bound to a route by the registry.
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
    handler: Arc<dyn Handler>,
}

impl Pipeline {
    /// Starts building a pipeline.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder { stages: Vec::new() }
    }

    /// Runs one request through the stage stack and the handler.
    ///
    /// A final `Value` outcome that no serialize stage turned into a
    /// response is converted at this boundary: plain strings become text
    /// responses, JSON values become JSON responses; anything else is a
    /// stage configuration error.
    ///
    /// # Errors
    ///
    /// Server-side faults (uncaught domain errors, mapping dispatch
    /// failures, stage configuration errors) escape here so the hosting
    /// server can log them and answer with its opaque fault response.
    pub fn handle(&self, ctx: &mut RequestContext) -> PipelineResult<Response> {
        let outcome = self.build_chain().run(ctx)?;
        match outcome {
            Outcome::Response(response) => Ok(response),
            Outcome::Value(value) => {
                if let Some(text) = value.downcast_ref::<String>() {
                    return Ok(Response::text(StatusCode::OK, text));
                }
                if let Some(text) = value.downcast_ref::<&str>() {
                    return Ok(Response::text(StatusCode::OK, text));
                }
                match value.downcast::<serde_json::Value>() {
                    Ok(json) => Ok(Response::json(StatusCode::OK, &json)),
                    Err(_) => Err(PipelineError::stage_configuration(
                        "handler returned a value no serialize stage consumed",
                    )),
                }
            }
        }
    }

    /// Returns the declared stage names, outermost first.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    fn build_chain(&self) -> Next<'_> {
        let mut next = Next::handler(self.handler.as_ref());
        for stage in self.stages.iter().rev() {
            next = Next::new(stage.as_ref(), next);
        }
        next
    }
}

/// Builder collecting the ordered stage stack for a [`Pipeline`].
///
/// Stages are added outermost first, matching declaration order in source.
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Appends a stage inside all previously added stages.
    #[must_use]
    pub fn stage<S: Stage>(mut self, stage: S) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Appends an already-shared stage.
    #[must_use]
    pub fn shared_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Finishes the pipeline with the raw handler at the center.
    #[must_use]
    pub fn handler<H: Handler>(self, handler: H) -> Pipeline {
        Pipeline {
            stages: self.stages,
            handler: Arc::new(handler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use crate::stage::StageResult;
    use http::Method;
    use slimrest_core::payload;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Stage for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
            self.order.lock().unwrap().push(self.name);
            next.run(ctx)
        }
    }

    struct ShortCircuit;

    impl Stage for ShortCircuit {
        fn name(&self) -> &'static str {
            "short_circuit"
        }

        fn process(&self, _ctx: &mut RequestContext, _next: Next<'_>) -> StageResult {
            Ok(Outcome::Response(Response::json_message(
                StatusCode::IM_A_TEAPOT,
                "stopped here",
            )))
        }
    }

    #[test]
    fn stages_execute_in_declaration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Recording {
                name: "first",
                order: order.clone(),
            })
            .stage(Recording {
                name: "second",
                order: order.clone(),
            })
            .stage(Recording {
                name: "third",
                order: order.clone(),
            })
            .handler(handler_fn(|_ctx| Ok(payload(String::from("done")))));

        let mut ctx = RequestContext::new(Method::GET, "/");
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn short_circuit_skips_inner_stages_and_handler() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let handler_calls = Arc::new(AtomicUsize::new(0));
        let calls = handler_calls.clone();

        let pipeline = Pipeline::builder()
            .stage(ShortCircuit)
            .stage(Recording {
                name: "inner",
                order: order.clone(),
            })
            .handler(handler_fn(move |_ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(payload(String::from("unreachable")))
            }));

        let mut ctx = RequestContext::new(Method::GET, "/");
        let response = pipeline.handle(&mut ctx).unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert!(order.lock().unwrap().is_empty());
        assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn bare_string_return_becomes_text_response() {
        let pipeline = Pipeline::builder()
            .handler(handler_fn(|_ctx| Ok(payload(String::from("Hello world!")))));

        let mut ctx = RequestContext::new(Method::GET, "/test/hello");
        let response = pipeline.handle(&mut ctx).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn json_value_return_becomes_json_response() {
        let pipeline = Pipeline::builder()
            .handler(handler_fn(|_ctx| Ok(payload(serde_json::json!({"n": 1})))));

        let mut ctx = RequestContext::new(Method::GET, "/");
        let response = pipeline.handle(&mut ctx).unwrap();
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn unconsumed_domain_value_is_a_configuration_error() {
        struct Opaque;
        let pipeline = Pipeline::builder().handler(handler_fn(|_ctx| Ok(payload(Opaque))));

        let mut ctx = RequestContext::new(Method::GET, "/");
        let error = pipeline.handle(&mut ctx).unwrap_err();
        assert_eq!(
            error.kind(),
            slimrest_core::PipelineErrorKind::StageConfiguration
        );
    }

    #[test]
    fn stage_names_follow_declaration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let pipeline = Pipeline::builder()
            .stage(Recording {
                name: "a",
                order: order.clone(),
            })
            .stage(ShortCircuit)
            .handler(handler_fn(|_ctx| Ok(payload(()))));

        assert_eq!(pipeline.stage_names(), vec!["a", "short_circuit"]);
    }
}
