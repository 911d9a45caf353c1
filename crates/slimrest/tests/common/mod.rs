//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use slimrest::prelude::*;
use slimrest_test::TestClient;

/// Builds a bound server for one namespace and returns a client for it.
pub fn client_for(namespace: Namespace) -> TestClient {
    let server = Server::new(ServerConfig::default());
    let mut registry = Registry::new();
    registry.declare(namespace);
    registry.bind(server.clone());
    TestClient::new(server)
}

/// Builds a client together with the server, for tests that also need the
/// server handle (e.g. for reverse lookups).
pub fn client_and_server(namespace: Namespace) -> (TestClient, Arc<Server>) {
    let server = Server::new(ServerConfig::default());
    let mut registry = Registry::new();
    registry.declare(namespace);
    registry.bind(server.clone());
    (TestClient::new(server.clone()), server)
}
