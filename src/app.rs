//! The relay application: routes, handlers, and the cross-origin policy.

use std::sync::Arc;

use http::StatusCode;
use http::header::{ACCESS_CONTROL_ALLOW_CREDENTIALS, AUTHORIZATION, CONTENT_TYPE};
use tower::ServiceBuilder;
use tower_http::cors::{Cors, CorsLayer};
use tracing::info;

use crate::error::{Envelope, RelayError};
use crate::health;
use crate::middleware::{Origins, cors};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Router, RouterService};
use crate::upstream::Upstream;

pub const DAILY_ROUTE: &str = "/api/v1/get-horoscope/daily";
pub const HEALTH_ROUTE: &str = "/health";

/// Origins allowed to call the relay from a browser.
pub const ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:8000",
    "https://localhost:8000",
    "https://*.onrender.com",
    "http://*.onrender.com",
];

/// The relay as served: the router wrapped in the CORS layer.
pub type App = Cors<RouterService<Upstream>>;

/// Builds the router serving every route of the relay.
pub fn router(upstream: Upstream) -> Router<Upstream> {
    Router::with_state(upstream)
        .get(DAILY_ROUTE, daily_horoscope)
        .get(HEALTH_ROUTE, health::liveness::<Upstream>)
        .fallback(not_found)
}

/// [`router`] as a `tower::Service`, with the cross-origin policy applied.
pub fn service(upstream: Upstream) -> App {
    ServiceBuilder::new()
        .layer(cors_layer())
        .service(router(upstream).into_service())
}

pub fn cors_layer() -> CorsLayer {
    cors::layer(
        Origins::new(ALLOWED_ORIGINS),
        [CONTENT_TYPE, AUTHORIZATION, ACCESS_CONTROL_ALLOW_CREDENTIALS],
    )
}

/// `GET /api/v1/get-horoscope/daily?sign=..&day=..`
///
/// Passes the upstream JSON through byte for byte on success; otherwise
/// renders the error envelope (400 missing parameter, 500 upstream status or
/// bad body, 503 network failure).
pub async fn daily_horoscope(upstream: Arc<Upstream>, req: Request) -> Result<Response, RelayError> {
    let (sign, day) = match (req.query("sign"), req.query("day")) {
        (Some(sign), Some(day)) if !sign.is_empty() && !day.is_empty() => (sign, day),
        _ => return Err(RelayError::MissingParameter),
    };

    info!(sign, day, "relaying daily horoscope");
    let body = upstream.daily(sign, day).await?;
    Ok(Response::json(StatusCode::OK, &body))
}

/// Fallback for unregistered paths.
pub async fn not_found(_upstream: Arc<Upstream>, _req: Request) -> Response {
    Response::json(StatusCode::NOT_FOUND, &Envelope::failure("Resource not found"))
}
