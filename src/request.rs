//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

/// An incoming HTTP request, handed to the matched handler.
///
/// Carries the parsed head, the fully collected body, and the path
/// parameters captured by the router. The body is raw bytes — parse it with
/// whatever you like; trellis does not touch it.
pub struct Request {
    parts: http::request::Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        parts: http::request::Parts,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self { parts, body, params }
    }

    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Header lookup by name (case-insensitive). `None` for absent headers
    /// and for values that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42` returns
    /// `Some("42")`. Captures are plain strings; no coercion is performed.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
