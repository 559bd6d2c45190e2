//! The routing table.
//!
//! One [`Tree`] per HTTP method, built once at startup and read on every
//! request. Registration is builder-style: each call returns `self` so
//! routes chain naturally, and each call either succeeds or aborts startup —
//! a table that made it to [`Server::serve`](crate::Server::serve) is known
//! to be conflict-free.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::RouteError;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::tree::Tree;

/// The application router.
///
/// Pattern segments, in matching priority order:
///
/// - `users` — static, exact match
/// - `:id([0-9]+)` — regex, captures `id` when the expression matches
/// - `:id` — parameter, captures any single segment as `id`
/// - `*` — wildcard, consumes the remainder of the path
///
/// The matcher commits to the first rule that applies and never backtracks.
/// Registrations that would make that choice ambiguous (two parameter names,
/// a wildcard next to a parameter, a duplicate pattern) are rejected at
/// registration time.
///
/// ```rust,no_run
/// # use trellis::{Method, Request, Response, Router};
/// # async fn get_user(_: Request) -> Response { Response::text("") }
/// # async fn get_file(_: Request) -> Response { Response::text("") }
/// let app = Router::new()
///     .on(Method::Get, "/users/:id([0-9]+)", get_user)
///     .get("/files/*", get_file);
/// ```
pub struct Router {
    routes: HashMap<Method, Tree<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Registers a handler for a method + path pattern pair. Returns `self`
    /// for chaining.
    ///
    /// # Panics
    ///
    /// Panics on any [`RouteError`]: a malformed pattern, an expression that
    /// does not compile, or a registration that conflicts with an existing
    /// route. Routes are registered at startup; a bad one should stop the
    /// process, not limp into serving traffic.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        match self.try_on(method, pattern, handler) {
            Ok(router) => router,
            Err(e) => panic!("invalid route `{pattern}`: {e}"),
        }
    }

    /// Fallible registration, for callers that want to report configuration
    /// errors themselves instead of panicking.
    ///
    /// On failure the table is left exactly as it was before the call.
    pub fn try_on(
        mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
    ) -> Result<Self, RouteError> {
        self.routes
            .entry(method)
            .or_default()
            .insert(pattern, handler.into_boxed_handler())?;
        Ok(self)
    }

    /// Shorthand for `on(Method::Get, ..)`.
    pub fn get(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, pattern, handler)
    }

    /// Shorthand for `on(Method::Post, ..)`.
    pub fn post(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, pattern, handler)
    }

    /// Shorthand for `on(Method::Put, ..)`.
    pub fn put(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, pattern, handler)
    }

    /// Shorthand for `on(Method::Patch, ..)`.
    pub fn patch(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Patch, pattern, handler)
    }

    /// Shorthand for `on(Method::Delete, ..)`.
    pub fn delete(self, pattern: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, pattern, handler)
    }

    /// Resolves `(method, path)` to a handler and the captured path
    /// parameters. `None` is the 404 case.
    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path)?;
        Some((Arc::clone(matched.value), matched.params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;

    async fn ok(_req: Request) -> Response {
        Response::text("ok")
    }

    async fn echo_id(req: Request) -> Response {
        Response::text(req.param("id").unwrap_or("missing").to_owned())
    }

    #[test]
    fn trees_are_per_method() {
        let router = Router::new()
            .get("/orders", ok)
            .post("/orders", ok);

        assert!(router.lookup(Method::Get, "/orders").is_some());
        assert!(router.lookup(Method::Post, "/orders").is_some());
        assert!(router.lookup(Method::Delete, "/orders").is_none());
        assert!(router.lookup(Method::Get, "/missing").is_none());
    }

    #[test]
    fn lookup_exposes_captures() {
        let router = Router::new().get("/users/:id", ok);
        let (_, params) = router.lookup(Method::Get, "/users/42").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn try_on_reports_conflicts() {
        let router = Router::new().get("/users/:id", ok);
        let err = router.try_on(Method::Get, "/users/*", ok).unwrap_err();
        assert!(matches!(err, RouteError::KindConflict { .. }));
    }

    #[test]
    #[should_panic(expected = "invalid route `/users/`")]
    fn on_panics_on_bad_pattern() {
        let _ = Router::new().get("/users/", ok);
    }

    #[tokio::test]
    async fn dispatches_to_handler_with_params() {
        let router = Router::new().get("/users/:id", echo_id);
        let (handler, params) = router.lookup(Method::Get, "/users/7").unwrap();

        let (parts, ()) = http::Request::builder()
            .method(http::Method::GET)
            .uri("/users/7")
            .body(())
            .expect("request parts")
            .into_parts();
        let response = handler
            .call(Request::new(parts, bytes::Bytes::new(), params))
            .await;
        assert_eq!(response.body_bytes(), b"7");
    }
}
