//! Test client for in-memory request dispatch.

use std::sync::Arc;

use bytes::Bytes;
use http::{header, Method};

use slimrest_server::Server;

use crate::error::TestError;
use crate::response::TestResponse;

/// An in-memory client driving a [`Server`] without binding a port.
///
/// Requests go straight through the server's dispatch path, so routing,
/// pipelines and reverse link generation behave exactly as they do over
/// the wire.
#[must_use]
pub struct TestClient {
    server: Arc<Server>,
}

impl TestClient {
    /// Creates a client for the given server.
    pub fn new(server: Arc<Server>) -> Self {
        Self { server }
    }

    /// Creates a GET request builder.
    pub fn get(&self, uri: impl Into<String>) -> TestRequestBuilder<'_> {
        self.request(Method::GET, uri)
    }

    /// Creates a POST request builder.
    pub fn post(&self, uri: impl Into<String>) -> TestRequestBuilder<'_> {
        self.request(Method::POST, uri)
    }

    /// Creates a PUT request builder.
    pub fn put(&self, uri: impl Into<String>) -> TestRequestBuilder<'_> {
        self.request(Method::PUT, uri)
    }

    /// Creates a DELETE request builder.
    pub fn delete(&self, uri: impl Into<String>) -> TestRequestBuilder<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Creates a request builder with a custom method.
    pub fn request(&self, method: Method, uri: impl Into<String>) -> TestRequestBuilder<'_> {
        TestRequestBuilder {
            client: self,
            method,
            uri: uri.into(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }
}

/// A request builder bound to a test client.
pub struct TestRequestBuilder<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl TestRequestBuilder<'_> {
    /// Sets a header on the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the content type header.
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header(header::CONTENT_TYPE.as_str(), content_type)
    }

    /// Sets the raw request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON request body with the matching content type.
    ///
    /// # Panics
    ///
    /// Panics if the value cannot be serialized.
    pub fn json<T: serde::Serialize>(self, value: &T) -> Self {
        let body = serde_json::to_vec(value).expect("test request body should serialize");
        self.content_type("application/json").body(body)
    }

    /// Sends the request and buffers the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body read.
    pub async fn send(self) -> TestResponse {
        self.try_send().await.expect("test request should succeed")
    }

    /// Sends the request, returning errors instead of panicking.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        let mut request = http::Request::builder().method(self.method).uri(self.uri);
        for (name, value) in self.headers {
            request = request.header(name, value);
        }
        let request = request.body(self.body)?;

        let response = self.client.server.dispatch(request);
        TestResponse::from_http(response).await
    }
}
