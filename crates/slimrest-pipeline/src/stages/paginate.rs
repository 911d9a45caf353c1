//! Pagination stage.

use slimrest_core::{Payload, PipelineError};

use crate::context::RequestContext;
use crate::pagination::{per_page, PagePolicy};
use crate::stage::{Next, Outcome, Stage, StageResult};

/// Post-handler stage turning the handler's full sequence into one
/// [`PaginationEnvelope`](crate::pagination::PaginationEnvelope) page.
///
/// Declared nearest the raw handler so any serialize stage outside it sees
/// the envelope. The handler must return a `Vec<Payload>`; anything else is
/// a stage configuration error.
pub struct PaginateStage {
    policy: PagePolicy,
}

impl PaginateStage {
    /// Creates the stage with an injected page-size policy.
    #[must_use]
    pub fn new(policy: PagePolicy) -> Self {
        Self { policy }
    }

    /// Creates the stage with the default policy for a fixed page size.
    #[must_use]
    pub fn per_page(page_size: usize) -> Self {
        Self::new(per_page(page_size))
    }
}

impl Stage for PaginateStage {
    fn name(&self) -> &'static str {
        "paginate"
    }

    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult {
        match next.run(ctx)? {
            Outcome::Response(response) => Ok(Outcome::Response(response)),
            Outcome::Value(value) => {
                let items = value.downcast::<Vec<Payload>>().map_err(|_| {
                    PipelineError::stage_configuration(
                        "paginate stage expects the handler to return a sequence",
                    )
                })?;
                let envelope = (self.policy)(ctx, *items)?;
                Ok(Outcome::Value(Box::new(envelope)))
            }
        }
    }
}
