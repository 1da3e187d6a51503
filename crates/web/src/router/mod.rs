mod pattern;

pub use pattern::PathPattern;

use std::collections::HashMap;
use std::fmt;

use http::Method;
use thiserror::Error;
use tracing::debug;

use crate::handler::RequestHandler;

/// Route table: `(method, template, handler)` entries matched in registration order.
///
/// The first registered route whose pattern matches wins, so more specific templates
/// should be registered before more general ones.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
}

/// A registered route entry.
pub struct Route {
    method: Method,
    template: String,
    pattern: PathPattern,
    handler: Box<dyn RequestHandler>,
}

/// The route selected for a request, with the path parameters it captured.
#[derive(Debug)]
pub struct RouteMatch<'router> {
    route: &'router Route,
    params: HashMap<String, String>,
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("can't compile route pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },
}

impl RouterError {
    pub fn invalid_template<S: ToString>(template: &str, reason: S) -> Self {
        Self::InvalidTemplate { template: template.to_string(), reason: reason.to_string() }
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Finds the first route matching `method` and `path` (the target without its query).
    pub fn at(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let matched = self
            .routes
            .iter()
            .find_map(|route| route.pattern.matches(method, path).map(|params| RouteMatch { route, params }));

        match &matched {
            Some(route_match) => debug!(%method, path, template = route_match.route.template(), "route matched"),
            None => debug!(%method, path, "no route matched"),
        }
        matched
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Route {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn handler(&self) -> &dyn RequestHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route").field("method", &self.method).field("template", &self.template).finish_non_exhaustive()
    }
}

impl<'router> RouteMatch<'router> {
    pub fn route(&self) -> &'router Route {
        self.route
    }

    pub fn handler(&self) -> &'router dyn RequestHandler {
        self.route.handler()
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    pub fn into_params(self) -> HashMap<String, String> {
        self.params
    }
}

/// Collects route registrations; templates are compiled by [`RouterBuilder::build`].
pub struct RouterBuilder {
    entries: Vec<(Method, String, Box<dyn RequestHandler>)>,
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! method_route {
    ($name:ident, $method:expr) => {
        pub fn $name<H: RequestHandler + 'static>(self, template: impl Into<String>, handler: H) -> Self {
            self.route($method, template, handler)
        }
    };
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn route<H: RequestHandler + 'static>(mut self, method: Method, template: impl Into<String>, handler: H) -> Self {
        self.entries.push((method, template.into(), Box::new(handler)));
        self
    }

    method_route!(get, Method::GET);
    method_route!(post, Method::POST);
    method_route!(put, Method::PUT);
    method_route!(delete, Method::DELETE);

    /// Compiles every registered template, keeping registration order.
    ///
    /// # Errors
    ///
    /// Fails on the first template that can't be compiled.
    pub fn build(self) -> Result<Router, RouterError> {
        let routes = self
            .entries
            .into_iter()
            .map(|(method, template, handler)| {
                let pattern = PathPattern::new(&method, &template)?;
                Ok(Route { method, template, pattern, handler })
            })
            .collect::<Result<Vec<_>, RouterError>>()?;

        Ok(Router { routes })
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self.entries.iter().map(|(method, template, _)| format!("{method} {template}")).collect::<Vec<_>>();
        f.debug_struct("RouterBuilder").field("routes", &routes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::handler_fn;
    use nano_http::protocol::{Request, Response};

    fn named(name: &'static str) -> impl RequestHandler {
        handler_fn(move |_request: &Request, response: &mut Response| response.set_body(name))
    }

    fn matched_name(router: &Router, method: &Method, path: &str) -> Option<String> {
        let route_match = router.at(method, path)?;
        Some(route_match.route().template().to_string())
    }

    #[test]
    fn matches_path_parameters() {
        let router = Router::builder().get("/users/:id", named("user")).build().unwrap();

        let route_match = router.at(&Method::GET, "/users/42").unwrap();

        assert_eq!(route_match.params().get("id").map(String::as_str), Some("42"));
        assert_eq!(route_match.route().method(), &Method::GET);
    }

    #[test]
    fn first_registered_route_wins() {
        let router = Router::builder()
            .get("/users/:id", named("by id"))
            .get("/users/me", named("me"))
            .build()
            .unwrap();

        assert_eq!(matched_name(&router, &Method::GET, "/users/me").as_deref(), Some("/users/:id"));

        let router = Router::builder()
            .get("/users/me", named("me"))
            .get("/users/:id", named("by id"))
            .build()
            .unwrap();

        assert_eq!(matched_name(&router, &Method::GET, "/users/me").as_deref(), Some("/users/me"));
        assert_eq!(matched_name(&router, &Method::GET, "/users/7").as_deref(), Some("/users/:id"));
    }

    #[test]
    fn routes_are_kept_per_method() {
        let router = Router::builder()
            .get("/items", named("list"))
            .post("/items", named("create"))
            .put("/items/:id", named("replace"))
            .delete("/items/:id", named("remove"))
            .route(Method::PATCH, "/items/:id", named("patch"))
            .build()
            .unwrap();

        assert_eq!(router.len(), 5);
        assert!(router.at(&Method::POST, "/items").is_some());
        assert!(router.at(&Method::DELETE, "/items/1").is_some());
        assert!(router.at(&Method::PATCH, "/items/1").is_some());
        assert!(router.at(&Method::DELETE, "/items").is_none());
        assert!(router.at(&Method::HEAD, "/items").is_none());
    }

    #[test]
    fn no_route_for_unknown_path() {
        let router = Router::builder().get("/", named("root")).build().unwrap();
        assert!(router.at(&Method::GET, "/missing").is_none());
        assert!(Router::builder().build().unwrap().is_empty());
    }

    #[test]
    fn invalid_template_fails_build() {
        let result = Router::builder().get("/ok", named("ok")).get("broken", named("broken")).build();
        assert!(matches!(result, Err(RouterError::InvalidTemplate { .. })));
    }

    #[test]
    fn matched_handler_is_callable() {
        let router = Router::builder().get("/hello", named("hello")).build().unwrap();
        let request = Request::new(http::Request::builder().uri("/hello").body(()).unwrap().into(), bytes::Bytes::new());

        let mut response = Response::new();
        router.at(request.method(), request.path()).unwrap().handler().invoke(&request, &mut response).unwrap();

        assert_eq!(&response.body()[..], b"hello");
    }
}
