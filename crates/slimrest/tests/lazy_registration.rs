//! Declaration and binding commute; unbound endpoints are not live.

use slimrest::prelude::*;
use slimrest_test::TestClient;

fn hello_namespace() -> Namespace {
    Namespace::builder("/test", "TestNamespace")
        .endpoint(
            Endpoint::builder("/hello", "hello_endpoint")
                .handler(handler_fn(|_ctx| Ok(payload(String::from("Hello world!"))))),
        )
        .build()
}

#[tokio::test]
async fn declared_but_unbound_endpoint_is_404() {
    let server = Server::new(ServerConfig::default());
    let mut registry = Registry::new();
    registry.declare(hello_namespace());

    let client = TestClient::new(server);
    let response = client.get("/test/hello").send().await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn binding_after_declaration_makes_the_endpoint_live() {
    let server = Server::new(ServerConfig::default());
    let mut registry = Registry::new();
    registry.declare(hello_namespace());
    registry.bind(server.clone());

    let client = TestClient::new(server);
    let response = client.get("/test/hello").send().await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text().unwrap(), "Hello world!");
}

#[tokio::test]
async fn declaring_after_binding_is_equivalent() {
    let server = Server::new(ServerConfig::default());
    let mut registry = Registry::new();
    registry.bind(server.clone());
    registry.declare(hello_namespace());

    let client = TestClient::new(server);
    let response = client.get("/test/hello").send().await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.text().unwrap(), "Hello world!");
}
