//! Request routing, path matching and reverse link generation.
//!
//! The router maps an incoming method and path to a mounted endpoint
//! pipeline, extracting path parameters from `{name}` template segments.
//! It also runs the mapping in reverse: given an endpoint name and its
//! path parameters it reconstructs the external URL, which is how
//! pagination links are produced.
//!
//! Routes are checked in mount order; the first match wins. A path that
//! matches some route but under a different method resolves to
//! [`RouteResolution::MethodNotAllowed`].

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;

use slimrest_core::{PipelineError, PipelineResult};
use slimrest_pipeline::Pipeline;
use slimrest_registry::RouteSpec;

/// A matched route with its extracted path parameters.
pub struct RouteMatch {
    /// Externally visible endpoint name.
    pub name: String,
    /// Parameters extracted from `{name}` segments.
    pub params: HashMap<String, String>,
    /// The pipeline to run for this request.
    pub pipeline: Arc<Pipeline>,
}

/// Result of resolving a method and path against the mounted routes.
pub enum RouteResolution {
    /// A route matched both path and method.
    Matched(RouteMatch),
    /// The path is known but not under this method.
    MethodNotAllowed,
    /// No mounted route matches the path.
    NotFound,
}

#[derive(Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

struct MountedRoute {
    methods: Vec<Method>,
    segments: Vec<PathSegment>,
    pattern: String,
    name: String,
    pipeline: Arc<Pipeline>,
}

impl MountedRoute {
    fn match_path(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (pattern, actual) in self.segments.iter().zip(path_segments.iter()) {
            match pattern {
                PathSegment::Literal(expected) => {
                    if expected != *actual {
                        return None;
                    }
                }
                PathSegment::Param(name) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
            }
        }

        Some(params)
    }
}

fn parse_segments(pattern: &str) -> Vec<PathSegment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('{') && s.ends_with('}') {
                PathSegment::Param(s[1..s.len() - 1].to_string())
            } else {
                PathSegment::Literal(s.to_string())
            }
        })
        .collect()
}

/// HTTP request router with reverse lookup.
///
/// Both directions key off the endpoint name: forward resolution attaches
/// the name to the match so the request context knows its own route, and
/// [`Router::reverse`] turns a name plus parameters back into a URL.
pub struct Router {
    base_url: String,
    routes: Vec<MountedRoute>,
}

impl Router {
    /// Creates an empty router generating links under `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            routes: Vec::new(),
        }
    }

    /// Mounts one endpoint.
    pub fn mount(&mut self, route: RouteSpec) {
        self.routes.push(MountedRoute {
            methods: route.methods,
            segments: parse_segments(&route.pattern),
            pattern: route.pattern,
            name: route.name,
            pipeline: route.pipeline,
        });
    }

    /// Returns the number of mounted routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Resolves an incoming method and path to a mounted route.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> RouteResolution {
        let mut path_known = false;

        for route in &self.routes {
            if let Some(params) = route.match_path(path) {
                if route.methods.contains(method) {
                    return RouteResolution::Matched(RouteMatch {
                        name: route.name.clone(),
                        params,
                        pipeline: route.pipeline.clone(),
                    });
                }
                path_known = true;
            }
        }

        if path_known {
            RouteResolution::MethodNotAllowed
        } else {
            RouteResolution::NotFound
        }
    }

    /// Builds the absolute URL of a named endpoint.
    ///
    /// Template parameters in the route pattern are filled from
    /// `path_params`; `query` pairs are appended as a query string.
    ///
    /// # Errors
    ///
    /// Fails when no route carries the name or a template parameter is
    /// missing from `path_params`.
    pub fn reverse(
        &self,
        name: &str,
        path_params: &HashMap<String, String>,
        query: &[(String, String)],
    ) -> PipelineResult<String> {
        let route = self
            .routes
            .iter()
            .find(|route| route.name == name)
            .ok_or_else(|| PipelineError::ReverseLookup {
                name: name.to_string(),
            })?;

        let mut path = String::new();
        for piece in route.pattern.split('/') {
            if !path.is_empty() || !piece.is_empty() {
                path.push('/');
            }
            if piece.starts_with('{') && piece.ends_with('}') {
                let param = &piece[1..piece.len() - 1];
                let value =
                    path_params
                        .get(param)
                        .ok_or_else(|| PipelineError::ReverseLookup {
                            name: format!("{name} (missing path parameter '{param}')"),
                        })?;
                path.push_str(value);
            } else {
                path.push_str(piece);
            }
        }

        let mut url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        if !query.is_empty() {
            let encoded = serde_urlencoded::to_string(query).map_err(|e| {
                PipelineError::stage_configuration(format!("query string encoding failed: {e}"))
            })?;
            url.push('?');
            url.push_str(&encoded);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slimrest_core::{payload, PipelineErrorKind};
    use slimrest_pipeline::handler_fn;

    fn pipeline() -> Arc<Pipeline> {
        Arc::new(
            slimrest_pipeline::Pipeline::builder()
                .handler(handler_fn(|_ctx| Ok(payload(String::new())))),
        )
    }

    fn spec(pattern: &str, methods: Vec<Method>, name: &str) -> RouteSpec {
        RouteSpec {
            pattern: pattern.to_string(),
            methods,
            name: name.to_string(),
            pipeline: pipeline(),
        }
    }

    fn heroes_router() -> Router {
        let mut router = Router::new("http://localhost");
        router.mount(spec(
            "/heroes/",
            vec![Method::GET],
            "hero_namespace_hero_collection",
        ));
        router.mount(spec(
            "/heroes/{id}",
            vec![Method::GET],
            "hero_namespace_hero_details",
        ));
        router.mount(spec(
            "/heroes/",
            vec![Method::POST],
            "hero_namespace_hero_post",
        ));
        router
    }

    #[test]
    fn resolves_literal_path() {
        let router = heroes_router();
        match router.resolve(&Method::GET, "/heroes/") {
            RouteResolution::Matched(m) => {
                assert_eq!(m.name, "hero_namespace_hero_collection");
                assert!(m.params.is_empty());
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn trailing_slash_is_not_significant() {
        let router = heroes_router();
        assert!(matches!(
            router.resolve(&Method::GET, "/heroes"),
            RouteResolution::Matched(_)
        ));
    }

    #[test]
    fn extracts_path_parameters() {
        let router = heroes_router();
        match router.resolve(&Method::GET, "/heroes/3") {
            RouteResolution::Matched(m) => {
                assert_eq!(m.name, "hero_namespace_hero_details");
                assert_eq!(m.params.get("id").map(String::as_str), Some("3"));
            }
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        let router = heroes_router();
        assert!(matches!(
            router.resolve(&Method::GET, "/villains/"),
            RouteResolution::NotFound
        ));
    }

    #[test]
    fn known_path_wrong_method_is_method_not_allowed() {
        let router = heroes_router();
        assert!(matches!(
            router.resolve(&Method::DELETE, "/heroes/"),
            RouteResolution::MethodNotAllowed
        ));
    }

    #[test]
    fn first_mounted_route_wins() {
        let mut router = Router::new("http://localhost");
        router.mount(spec("/heroes/", vec![Method::GET], "first"));
        router.mount(spec("/heroes/", vec![Method::GET], "second"));

        match router.resolve(&Method::GET, "/heroes/") {
            RouteResolution::Matched(m) => assert_eq!(m.name, "first"),
            _ => panic!("expected a match"),
        }
    }

    #[test]
    fn reverse_builds_absolute_url() {
        let router = heroes_router();
        let url = router
            .reverse("hero_namespace_hero_collection", &HashMap::new(), &[])
            .unwrap();
        assert_eq!(url, "http://localhost/heroes/");
    }

    #[test]
    fn reverse_substitutes_path_parameters() {
        let router = heroes_router();
        let params = [(String::from("id"), String::from("3"))].into_iter().collect();
        let url = router
            .reverse("hero_namespace_hero_details", &params, &[])
            .unwrap();
        assert_eq!(url, "http://localhost/heroes/3");
    }

    #[test]
    fn reverse_appends_query_string() {
        let router = heroes_router();
        let url = router
            .reverse(
                "hero_namespace_hero_collection",
                &HashMap::new(),
                &[(String::from("page"), String::from("2"))],
            )
            .unwrap();
        assert_eq!(url, "http://localhost/heroes/?page=2");
    }

    #[test]
    fn reverse_unknown_name_fails() {
        let router = heroes_router();
        let error = router
            .reverse("no_such_endpoint", &HashMap::new(), &[])
            .unwrap_err();
        assert_eq!(error.kind(), PipelineErrorKind::ReverseLookup);
    }

    #[test]
    fn reverse_missing_parameter_fails() {
        let router = heroes_router();
        let error = router
            .reverse("hero_namespace_hero_details", &HashMap::new(), &[])
            .unwrap_err();
        assert_eq!(error.kind(), PipelineErrorKind::ReverseLookup);
    }
}
