//! Reverse routing interface.

use std::collections::HashMap;

use crate::error::PipelineResult;

/// Reverse lookup from an endpoint name to an absolute URL.
///
/// Implemented by the hosting router. The pipeline only depends on this
/// trait, so pagination link generation works against any router that can
/// resolve names back to URL patterns.
pub trait UrlFor: Send + Sync {
    /// Builds an absolute URL for the endpoint registered under `name`.
    ///
    /// `path_params` fill the pattern's `{param}` segments; `query` entries
    /// are appended as a query string.
    ///
    /// # Errors
    ///
    /// Fails when no endpoint is registered under `name` or when a pattern
    /// parameter is missing from `path_params`.
    fn url_for(
        &self,
        name: &str,
        path_params: &HashMap<String, String>,
        query: &[(String, String)],
    ) -> PipelineResult<String>;
}
