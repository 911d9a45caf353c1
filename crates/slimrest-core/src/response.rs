//! HTTP response types and builders.
//!
//! The pipeline produces plain `http` responses with fully buffered bodies.
//! [`ResponseExt`] provides the small set of constructors the stages need:
//! a JSON body, the `{"message": ...}` error envelope, and plain text.

use bytes::Bytes;
use http::StatusCode;
use http_body_util::Full;

/// The response body type used throughout slimrest.
pub type Body = Full<Bytes>;

/// The HTTP response type produced by a pipeline.
pub type Response = http::Response<Body>;

/// The only media type accepted and produced by the JSON stages.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Constructors for the response shapes the pipeline emits.
pub trait ResponseExt {
    /// Creates a JSON response from an already-encoded value.
    fn json(status: StatusCode, value: &serde_json::Value) -> Response;

    /// Creates the standard `{"message": ...}` JSON envelope.
    fn json_message(status: StatusCode, message: &str) -> Response;

    /// Creates a plain text response.
    fn text(status: StatusCode, body: &str) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, value: &serde_json::Value) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, JSON_MEDIA_TYPE)
            .body(Full::new(Bytes::from(value.to_string())))
            .expect("failed to build JSON response")
    }

    fn json_message(status: StatusCode, message: &str) -> Response {
        Self::json(status, &serde_json::json!({ "message": message }))
    }

    fn text(status: StatusCode, body: &str) -> Response {
        http::Response::builder()
            .status(status)
            .header(http::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(Full::new(Bytes::from(body.to_string())))
            .expect("failed to build text response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_message_uses_the_message_field() {
        let response = Response::json_message(StatusCode::NOT_FOUND, "No hero with this ID found.");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            JSON_MEDIA_TYPE
        );
    }

    #[test]
    fn json_response_sets_content_type() {
        let response = Response::json(StatusCode::OK, &serde_json::json!({"hello": "world"}));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            JSON_MEDIA_TYPE
        );
    }

    #[test]
    fn text_response_is_plain() {
        let response = Response::text(StatusCode::OK, "Hello world!");
        assert_eq!(
            response.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
