//! Liveness check.
//!
//! Answers whether the relay process can serve HTTP at all. The upstream is
//! never contacted.

use std::sync::Arc;

use http::StatusCode;
use serde::Serialize;

use crate::{Request, Response};

#[derive(Serialize)]
struct Health {
    status: &'static str,
    message: &'static str,
}

/// `GET /health`: always `200 OK`, whatever the router's state.
pub async fn liveness<S>(_state: Arc<S>, _req: Request) -> Response {
    Response::json(
        StatusCode::OK,
        &Health { status: "healthy", message: "API is running successfully" },
    )
}
