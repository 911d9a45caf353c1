//! The stage contract and the chain that links stages together.
//!
//! A [`Stage`] receives the request context and a consuming [`Next`] handle
//! to the rest of the chain. It can run the inner chain and transform what
//! flows back, append handler arguments to the context before descending, or
//! short-circuit with a final response without descending at all.

use slimrest_core::{Payload, PipelineResult, Response};

use crate::context::RequestContext;
use crate::handler::Handler;

/// The result of running a stage or a chain: either a value still flowing
/// toward serialization, or a finished HTTP response.
pub enum Outcome {
    /// A pass-through value (the raw handler's return, possibly transformed
    /// by inner post-handler stages).
    Value(Payload),
    /// A final response; outer stages pass it on unchanged.
    Response(Response),
}

/// Result type produced by stages and chains.
pub type StageResult = PipelineResult<Outcome>;

/// One reusable unit of request processing.
///
/// # Invariants
///
/// - A stage runs its inner chain at most once; [`Next::run`] consumes the
///   handle, so the compiler enforces this.
/// - A stage only intercepts what it is configured to intercept; everything
///   else must be returned unchanged.
pub trait Stage: Send + Sync + 'static {
    /// Returns the stage's name, used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request, delegating to `next` for the inner chain.
    fn process(&self, ctx: &mut RequestContext, next: Next<'_>) -> StageResult;
}

/// Handle to the remaining chain inside the current stage.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        stage: &'a dyn Stage,
        next: Box<Next<'a>>,
    },
    Handler(&'a dyn Handler),
}

impl<'a> Next<'a> {
    pub(crate) fn new(stage: &'a dyn Stage, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                stage,
                next: Box::new(next),
            },
        }
    }

    pub(crate) fn handler(handler: &'a dyn Handler) -> Self {
        Self {
            inner: NextInner::Handler(handler),
        }
    }

    /// Runs the remaining chain down to the raw handler.
    ///
    /// Consumes `self` so a stage cannot run its inner chain twice.
    pub fn run(self, ctx: &mut RequestContext) -> StageResult {
        match self.inner {
            NextInner::Chain { stage, next } => {
                tracing::trace!(stage = stage.name(), "entering stage");
                stage.process(ctx, *next)
            }
            NextInner::Handler(handler) => {
                let value = handler.call(ctx)?;
                Ok(Outcome::Value(value))
            }
        }
    }
}
