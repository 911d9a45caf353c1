//! Per-request processing state.
//!
//! A [`RequestContext`] carries everything a pipeline run needs: the raw
//! inbound request data (method, path, headers, buffered body, query
//! string), the route match (path parameters and endpoint name), the
//! reverse-routing handle, and the positional arguments accumulated by
//! pre-handler stages for the raw handler.
//!
//! All of it lives on the call stack of a single request; nothing here is
//! shared between requests.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderMap, Method};

use slimrest_core::{Payload, PipelineError, PipelineResult, UrlFor, JSON_MEDIA_TYPE};

/// Mutable state for one request's trip through a pipeline.
pub struct RequestContext {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    query: Vec<(String, String)>,
    params: HashMap<String, String>,
    route_name: String,
    url_for: Option<Arc<dyn UrlFor>>,
    args: Vec<Payload>,
}

impl RequestContext {
    /// Creates a context for a request to `path`.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            query: Vec::new(),
            params: HashMap::new(),
            route_name: String::new(),
            url_for: None,
            args: Vec::new(),
        }
    }

    /// Sets the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the buffered request body.
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Sets the parsed query string pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Sets the path parameters extracted by the router.
    #[must_use]
    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Sets the external name of the matched endpoint.
    #[must_use]
    pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = name.into();
        self
    }

    /// Sets the reverse-routing handle used for link generation.
    #[must_use]
    pub fn with_url_for(mut self, url_for: Arc<dyn UrlFor>) -> Self {
        self.url_for = Some(url_for);
        self
    }

    /// Returns the request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns a header value as a string, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the media type of the request body, without parameters.
    ///
    /// `application/json; charset=utf-8` yields `application/json`.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(http::header::CONTENT_TYPE.as_str())
            .map(|value| value.split(';').next().unwrap_or(value).trim())
    }

    /// Returns the first query parameter with the given name.
    #[must_use]
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns a path parameter extracted by the router.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns all path parameters.
    #[must_use]
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns the external name of the matched endpoint.
    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// Returns the raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Reads the request body as JSON.
    ///
    /// # Errors
    ///
    /// Returns a client input error when the content type is not exactly the
    /// JSON media type, the body is missing, or it is not well-formed JSON.
    pub fn json_body(&self) -> PipelineResult<serde_json::Value> {
        match self.content_type() {
            Some(JSON_MEDIA_TYPE) => {}
            Some(other) => {
                return Err(PipelineError::client_input(format!(
                    "expected content type '{JSON_MEDIA_TYPE}', got '{other}'"
                )))
            }
            None => {
                return Err(PipelineError::client_input(format!(
                    "request body must be sent with content type '{JSON_MEDIA_TYPE}'"
                )))
            }
        }

        if self.body.is_empty() {
            return Err(PipelineError::client_input("request body is empty"));
        }

        serde_json::from_slice(&self.body)
            .map_err(|e| PipelineError::client_input(format!("request body is not valid JSON: {e}")))
    }

    /// Appends a positional argument for the raw handler.
    pub fn push_arg(&mut self, arg: Payload) {
        self.args.push(arg);
    }

    /// Removes and returns the next positional argument, in append order.
    pub fn take_arg(&mut self) -> Option<Payload> {
        if self.args.is_empty() {
            None
        } else {
            Some(self.args.remove(0))
        }
    }

    /// Returns the number of accumulated handler arguments.
    #[must_use]
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Builds an absolute URL for a named endpoint.
    ///
    /// # Errors
    ///
    /// Fails when no reverse router is attached or the lookup fails.
    pub fn url_for(&self, name: &str, query: &[(String, String)]) -> PipelineResult<String> {
        let url_for = self.url_for.as_ref().ok_or_else(|| {
            PipelineError::stage_configuration("no reverse router attached to the request context")
        })?;
        url_for.url_for(name, &self.params, query)
    }

    /// Builds an absolute URL for the current route with an overridden
    /// `page` query parameter. Used by pagination link generation.
    pub fn page_url(&self, page: usize) -> PipelineResult<String> {
        let name = self.route_name.clone();
        self.url_for(&name, &[(String::from("page"), page.to_string())])
    }
}
