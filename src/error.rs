//! Error types.
//!
//! Two domains, kept deliberately separate:
//!
//! - [`RouteError`] — configuration mistakes caught while registering
//!   routes. These are programmer errors; surface them at startup and stop.
//! - [`Error`] — infrastructure failures from [`Server::serve`]
//!   (binding the port, accepting connections).
//!
//! A request that matches no route is neither: lookup misses are plain
//! `None` and become a 404, never an error value.
//!
//! [`Server::serve`]: crate::Server::serve

use std::fmt;

/// The error type returned by trellis's fallible server operations.
#[derive(Debug)]
pub struct Error(std::io::Error);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "io: {}", self.0)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

/// A route registration that was rejected.
///
/// Every variant is detected synchronously inside
/// [`Router::try_on`](crate::Router::try_on) before the first request is
/// served. [`Router::on`](crate::Router::on) panics on any of them.
#[derive(Debug)]
pub enum RouteError {
    /// The pattern was the empty string.
    Empty,
    /// The pattern did not start with `/`.
    NotAbsolute { pattern: String },
    /// The pattern ended with `/` (only `/` itself may).
    TrailingSlash { pattern: String },
    /// The pattern contained `//`.
    EmptySegment { pattern: String },
    /// A `:`-segment with no binding name, or a `(` with no closing `)`.
    MalformedSegment { segment: String },
    /// The expression inside `:name(...)` did not compile.
    InvalidRegex { segment: String, source: regex::Error },
    /// The full pattern was already registered for this method.
    Duplicate { pattern: String },
    /// A parameter with a different name already exists at this position.
    ParamNameConflict { existing: String, requested: String },
    /// A regex segment with a different name or expression already exists
    /// at this position.
    RegexConflict { existing: String, requested: String },
    /// A different dynamic kind (parameter, regex, or wildcard) already
    /// exists at this position.
    KindConflict { existing: &'static str, segment: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "route pattern is empty"),
            Self::NotAbsolute { pattern } => {
                write!(f, "route `{pattern}` must start with `/`")
            }
            Self::TrailingSlash { pattern } => {
                write!(f, "route `{pattern}` must not end with `/`")
            }
            Self::EmptySegment { pattern } => {
                write!(f, "route `{pattern}` contains an empty segment (`//`)")
            }
            Self::MalformedSegment { segment } => {
                write!(f, "malformed segment `{segment}`")
            }
            Self::InvalidRegex { segment, source } => {
                write!(f, "segment `{segment}` has an invalid expression: {source}")
            }
            Self::Duplicate { pattern } => {
                write!(f, "route `{pattern}` is already registered")
            }
            Self::ParamNameConflict { existing, requested } => {
                write!(f, "parameter segment `{requested}` conflicts with existing `{existing}`")
            }
            Self::RegexConflict { existing, requested } => {
                write!(f, "regex segment `{requested}` conflicts with existing `{existing}`")
            }
            Self::KindConflict { existing, segment } => {
                write!(f, "cannot register `{segment}` here: a {existing} segment is already registered at this position")
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRegex { source, .. } => Some(source),
            _ => None,
        }
    }
}
