//! # horoscope-relay
//!
//! A single-endpoint HTTP relay. It takes
//! `GET /api/v1/get-horoscope/daily?sign=..&day=..`, forwards the two
//! parameters to a third-party horoscope API, and returns the upstream JSON
//! or a normalized error envelope:
//!
//! ```json
//! { "success": false, "error": "Failed to fetch horoscope data", "status_code": 404 }
//! ```
//!
//! | Outcome | Status |
//! |---|---|
//! | upstream `200` | `200`, upstream body |
//! | missing `sign` or `day` | `400` |
//! | upstream non-200, or a body that is not JSON | `500` |
//! | upstream unreachable | `503` |
//!
//! Nothing is cached, retried, or stored. `GET /health` answers without
//! touching the upstream and every other path gets a JSON 404.
//!
//! ## Running
//!
//! ```rust,no_run
//! use horoscope_relay::{Config, Server, Upstream, app};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), horoscope_relay::Error> {
//!     let config = Config::from_env()?;
//!     let upstream = Upstream::new(&config.upstream_url, config.upstream_timeout())?;
//!     Server::bind(config.addr()).serve(app::service(upstream)).await
//! }
//! ```

mod error;
mod handler;
mod request;
mod response;
mod router;
mod server;

pub mod app;
pub mod config;
pub mod health;
pub mod logger;
pub mod middleware;
pub mod upstream;

pub use crate::config::Config;
pub use error::{Envelope, Error, RelayError};
pub use handler::Handler;
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::{Router, RouterService};
pub use server::{Server, serve_listener};
pub use upstream::Upstream;
