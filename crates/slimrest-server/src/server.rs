//! HTTP hosting server.
//!
//! The server owns the [`Router`] and is the binding target for a
//! [`Registry`](slimrest_registry::Registry): it implements
//! [`RouteRegistrar`], so binding a registry to it mounts every declared
//! endpoint. It also implements [`UrlFor`], which is how pipelines generate
//! pagination links without knowing anything about routing.
//!
//! Request handling is split in two layers. [`Server::dispatch`] is the
//! synchronous core taking a fully buffered request and producing a
//! response; it is what the test client calls directly. [`Server::serve`]
//! is the Hyper front end that accepts connections, buffers bodies and
//! feeds `dispatch`.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use parking_lot::RwLock;
use tokio::net::TcpListener;

use slimrest_core::{PipelineResult, Response, ResponseExt, UrlFor};
use slimrest_pipeline::RequestContext;
use slimrest_registry::{RouteRegistrar, RouteSpec};

use crate::config::ServerConfig;
use crate::router::{RouteResolution, Router};

/// The slimrest hosting server.
pub struct Server {
    config: ServerConfig,
    router: RwLock<Router>,
}

impl Server {
    /// Creates a server with the given configuration and no mounted routes.
    ///
    /// The result is wrapped in an [`Arc`] because dispatch attaches the
    /// server to each request context as its reverse router.
    #[must_use]
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let router = Router::new(config.base_url());
        Arc::new(Self {
            config,
            router: RwLock::new(router),
        })
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the number of mounted routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.router.read().route_count()
    }

    /// Handles one fully buffered request.
    pub fn dispatch(self: &Arc<Self>, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let method = parts.method;
        let path = parts.uri.path().to_string();

        let request_id = uuid::Uuid::now_v7();
        let span = tracing::debug_span!("request", %request_id, %method, %path);
        let _guard = span.enter();
        tracing::debug!("dispatching request");

        let query: Vec<(String, String)> = match parts.uri.query() {
            Some(raw) => match serde_urlencoded::from_str(raw) {
                Ok(query) => query,
                Err(error) => {
                    tracing::debug!(%error, "rejecting malformed query string");
                    return Response::json_message(
                        StatusCode::BAD_REQUEST,
                        "malformed query string",
                    );
                }
            },
            None => Vec::new(),
        };

        let matched = match self.router.read().resolve(&method, &path) {
            RouteResolution::Matched(matched) => matched,
            RouteResolution::MethodNotAllowed => {
                return Response::json_message(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
            }
            RouteResolution::NotFound => {
                return Response::json_message(StatusCode::NOT_FOUND, "Not Found")
            }
        };

        let mut ctx = RequestContext::new(method, path)
            .with_headers(parts.headers)
            .with_body(body)
            .with_query(query)
            .with_params(matched.params)
            .with_route_name(&matched.name)
            .with_url_for(self.clone());

        match matched.pipeline.handle(&mut ctx) {
            Ok(response) => response,
            Err(error) if error.is_client_error() => {
                Response::json_message(error.status_code(), &error.to_string())
            }
            Err(error) => {
                tracing::error!(
                    %request_id,
                    endpoint = %matched.name,
                    kind = ?error.kind(),
                    error = %error,
                    "pipeline fault"
                );
                Response::json_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            }
        }
    }

    /// Accepts connections and serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured address cannot be parsed or bound.
    pub async fn serve(self: Arc<Self>) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| ServerError::Bind(format!("invalid address '{}': {e}", self.config.http_addr())))?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, routes = self.route_count(), "server listening");

        loop {
            let (stream, remote_addr) = listener
                .accept()
                .await
                .map_err(|e| ServerError::Io(e.to_string()))?;

            let server = self.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req: http::Request<Incoming>| {
                    let server = server.clone();
                    async move { server.handle(req).await }
                });

                if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::debug!(%remote_addr, error = %e, "connection closed with error");
                }
            });
        }
    }

    /// Buffers the request body and hands the request to [`dispatch`].
    ///
    /// [`dispatch`]: Server::dispatch
    async fn handle(
        self: Arc<Self>,
        req: http::Request<Incoming>,
    ) -> Result<Response, std::convert::Infallible> {
        let (parts, body) = req.into_parts();

        let collected = Limited::new(body, self.config.max_body_bytes())
            .collect()
            .await;
        let body = match collected {
            Ok(collected) => collected.to_bytes(),
            Err(_) => {
                return Ok(Response::json_message(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "Payload Too Large",
                ))
            }
        };

        Ok(self.dispatch(http::Request::from_parts(parts, body)))
    }
}

impl RouteRegistrar for Server {
    fn register_route(&self, route: RouteSpec) {
        self.router.write().mount(route);
    }
}

impl UrlFor for Server {
    fn url_for(
        &self,
        name: &str,
        path_params: &HashMap<String, String>,
        query: &[(String, String)],
    ) -> PipelineResult<String> {
        self.router.read().reverse(name, path_params, query)
    }
}

/// Errors produced while running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured address could not be parsed or bound.
    #[error("bind error: {0}")]
    Bind(String),

    /// An I/O error occurred while accepting connections.
    #[error("i/o error: {0}")]
    Io(String),
}
