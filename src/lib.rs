//! # trellis
//!
//! A small HTTP framework built around one idea: an explicit routing tree
//! you can reason about.
//!
//! ## Routing
//!
//! One tree per HTTP method. Each node matches one path segment, in strict
//! priority order:
//!
//! 1. **static** — `users` matches the literal text
//! 2. **regex** — `:id([0-9]+)` matches when the expression does, capturing `id`
//! 3. **param** — `:id` matches any single segment, capturing `id`
//! 4. **wildcard** — `*` consumes the remainder of the path
//!
//! The matcher commits to the first rule that applies and **never
//! backtracks** — lookup is a single root-to-leaf walk, O(segments).
//! Anything that would make that walk ambiguous (a wildcard beside a
//! parameter, two parameter names at one position, a duplicate pattern) is
//! rejected when the route is registered, so misconfiguration stops the
//! process at startup instead of mis-routing traffic at 3 a.m.
//!
//! The table is built before the server starts and never mutated afterwards,
//! which is why concurrent lookups need no locks.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trellis::{Method, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = Router::new()
//!         .on(Method::Get,  "/users/:id", get_user)
//!         .on(Method::Post, "/users",     create_user)
//!         .get("/files/*",                serve_file);
//!
//!     Server::bind("0.0.0.0:3000").serve(app).await.unwrap();
//! }
//!
//! async fn get_user(req: Request) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn create_user(req: Request) -> Response {
//!     # let bytes: Vec<u8> = vec![];
//!     Response::builder()
//!         .status(trellis::StatusCode::CREATED)
//!         .header("location", "/users/99")
//!         .json(bytes)
//! }
//!
//! async fn serve_file(req: Request) -> Response {
//!     Response::text(format!("would serve {}", req.path()))
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod tree;

pub mod health;

pub use error::{Error, RouteError};
pub use handler::Handler;
pub use http::StatusCode;
pub use method::Method;
pub use request::Request;
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
