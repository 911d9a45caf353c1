//! The raw handler at the center of a pipeline.

use slimrest_core::Payload;

use crate::context::RequestContext;

/// What a raw handler produces: a type-erased domain value, or a domain
/// error for the surrounding catch stages (or the opaque-500 boundary).
pub type HandlerResult = Result<Payload, anyhow::Error>;

/// The innermost unit of a pipeline.
///
/// Handlers read their inputs from the context: path parameters from the
/// route match and positional arguments appended by pre-handler stages
/// (via [`RequestContext::take_arg`]).
pub trait Handler: Send + Sync + 'static {
    /// Runs the handler.
    fn call(&self, ctx: &mut RequestContext) -> HandlerResult;
}

/// Wraps a closure as a [`Handler`].
///
/// # Example
///
/// ```rust
/// use slimrest_core::payload;
/// use slimrest_pipeline::handler_fn;
///
/// let handler = handler_fn(|_ctx| Ok(payload(String::from("Hello world!"))));
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut RequestContext) -> HandlerResult + Send + Sync + 'static,
{
    HandlerFn { f }
}

/// A [`Handler`] backed by a closure. Built with [`handler_fn`].
pub struct HandlerFn<F> {
    f: F,
}

impl<F> Handler for HandlerFn<F>
where
    F: Fn(&mut RequestContext) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut RequestContext) -> HandlerResult {
        (self.f)(ctx)
    }
}
