//! In-memory test client for slimrest applications.
//!
//! [`TestClient`] drives a [`Server`](slimrest_server::Server) through its
//! dispatch path without opening a socket, so integration tests exercise
//! routing, pipelines and link generation end to end while staying fast
//! and deterministic.
//!
//! ```rust,ignore
//! let server = Server::new(ServerConfig::default());
//! registry.bind(server.clone());
//!
//! let client = TestClient::new(server);
//! let response = client.get("/heroes/").send().await;
//! assert_eq!(response.status_code(), 200);
//! ```

pub mod client;
pub mod error;
pub mod response;

pub use client::{TestClient, TestRequestBuilder};
pub use error::TestError;
pub use response::TestResponse;
