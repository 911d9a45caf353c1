//! Domain-error translation stage.

use http::StatusCode;

use slimrest_core::{PipelineError, Response, ResponseExt};

use crate::context::RequestContext;
use crate::stage::{Next, Outcome, Stage, StageResult};

/// Stage translating one declared error kind into an HTTP response.
///
/// If the configured kind propagates out of the nested chain (inner stages
/// or the raw handler), this stage intercepts it and answers with the
/// configured status and `{"message": <configured message>}`. Any other
/// error kind propagates outward unchanged, toward an outer catch stage or
/// the hosting server's fault boundary.
pub struct CatchStage {
    matches: Box<dyn Fn(&anyhow::Error) -> bool + Send + Sync>,
    kind_name: &'static str,
    message: String,
    status: StatusCode,
}

impl CatchStage {
    /// Creates a stage catching errors of type `E` with a 500 status.
    #[must_use]
    pub fn new<E>(message: impl Into<String>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            matches: Box::new(|error| error.downcast_ref::<E>().is_some()),
            kind_name: std::any::type_name::<E>(),
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Overrides the response status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl Stage for CatchStage {
    fn name(&self) -> &'static str {
        "catch"
    }

    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
        match next.run(ctx) {
            Err(PipelineError::Domain(error)) if (self.matches)(&error) => {
                tracing::debug!(
                    kind = self.kind_name,
                    status = self.status.as_u16(),
                    "translating caught domain error"
                );
                Ok(Outcome::Response(Response::json_message(
                    self.status,
                    &self.message,
                )))
            }
            other => other,
        }
    }
}
