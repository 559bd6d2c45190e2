//! Minimal trellis example — CRUD-style JSON endpoints, a regex-constrained
//! route, a wildcard, and health checks.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/orders/123          # digits only
//!   curl http://localhost:3000/orders/abc          # 404 — regex miss
//!   curl http://localhost:3000/files/reports/2026/q3.pdf
//!   curl -X POST http://localhost:3000/users \
//!        -H 'content-type: application/json' \
//!        -d '{"name":"alice"}'
//!   curl http://localhost:3000/healthz

use trellis::{Request, Response, Router, Server, StatusCode, health};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .get("/users/:id",            get_user)
        .post("/users",               create_user)
        .delete("/users/:id",         delete_user)
        .get("/orders/:id([0-9]+)",   get_order)
        .get("/files/*",              serve_file)
        .get("/healthz",              health::liveness)
        .get("/readyz",               health::readiness);

    Server::bind("0.0.0.0:3000")
        .serve(app)
        .await
        .expect("server error");
}

// GET /users/:id — any segment binds to `id`.
async fn get_user(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes())
}

// POST /users
//
// req.body() is &[u8] — parse with serde_json::from_slice, simd-json, etc.
// trellis does not touch the bytes.
async fn create_user(req: Request) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }

    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#.to_owned().into_bytes())
}

// DELETE /users/:id → 204 No Content
async fn delete_user(_req: Request) -> Response {
    Response::status(StatusCode::NO_CONTENT)
}

// GET /orders/:id([0-9]+) — only matches when the segment contains digits.
async fn get_order(req: Request) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    Response::json(format!(r#"{{"order":"{id}"}}"#).into_bytes())
}

// GET /files/* — the wildcard consumes however many segments remain.
async fn serve_file(req: Request) -> Response {
    Response::text(format!("would serve {}", req.path()))
}
