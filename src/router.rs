//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. A miss falls through to
//! the fallback handler; a path that exists under other methods gets a 405.
//! [`Router::into_service`] turns the finished router into a `tower::Service`
//! so layers such as CORS can wrap it.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;

use bytes::Bytes;
use http::header::{ALLOW, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::Full;
use matchit::Router as MatchitRouter;
use tracing::info;

use crate::error::Envelope;
use crate::handler::{BoxedHandler, Handler};
use crate::request::Request;
use crate::response::Response;

/// The application router over shared state `S`.
///
/// Build it once at startup, then either drive it directly with
/// [`Router::respond`] or hand [`Router::into_service`] to the server.
pub struct Router<S = ()> {
    state: Arc<S>,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
    fallback: Option<BoxedHandler<S>>,
}

enum Lookup<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    WrongMethod(Vec<Method>),
    Missing,
}

impl Router<()> {
    pub fn new() -> Self {
        Self::with_state(())
    }
}

impl Default for Router<()> {
    fn default() -> Self { Self::new() }
}

impl<S: Send + Sync + 'static> Router<S> {
    /// A router whose handlers all receive `state`.
    pub fn with_state(state: S) -> Self {
        Self { state: Arc::new(state), routes: HashMap::new(), fallback: None }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax and are read with `req.param("name")`.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        let handler: BoxedHandler<S> = Arc::new(handler);
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Shorthand for `on(Method::GET, ..)`. GET routes also answer HEAD.
    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::GET, path, handler)
    }

    /// Handler for requests whose path matches no route. Defaults to an empty 404.
    pub fn fallback(mut self, handler: impl Handler<S>) -> Self {
        let handler: BoxedHandler<S> = Arc::new(handler);
        self.fallback = Some(handler);
        self
    }

    pub fn into_service(self) -> RouterService<S> {
        RouterService(Arc::new(self))
    }

    /// Routes one request and produces one response.
    ///
    /// Never fails: misses, wrong methods and handler errors all come back as
    /// responses. The request body is ignored.
    pub async fn respond<B>(&self, req: http::Request<B>) -> Response {
        let (parts, _) = req.into_parts();
        let method = parts.method.clone();
        let path = parts.uri.path().to_owned();

        let mut res = match self.lookup(&method, &path) {
            Lookup::Found(handler, params) => {
                handler.call(Arc::clone(&self.state), Request::new(parts, params)).await
            }
            Lookup::WrongMethod(allowed) if method == Method::OPTIONS => {
                Response::empty(StatusCode::OK).header(ALLOW, allow_header(&allowed))
            }
            Lookup::WrongMethod(allowed) => Response::json(
                StatusCode::METHOD_NOT_ALLOWED,
                &Envelope::failure("Method not allowed"),
            )
            .header(ALLOW, allow_header(&allowed)),
            Lookup::Missing => match &self.fallback {
                Some(handler) => {
                    handler.call(Arc::clone(&self.state), Request::new(parts, HashMap::new())).await
                }
                None => Response::empty(StatusCode::NOT_FOUND),
            },
        };

        if method == Method::HEAD {
            res.strip_body();
        }
        res
    }

    fn lookup(&self, method: &Method, path: &str) -> Lookup<S> {
        if let Some(found) = self.find(method, path) {
            return found;
        }
        if *method == Method::HEAD {
            if let Some(found) = self.find(&Method::GET, path) {
                return found;
            }
        }

        let allowed = self.allowed_methods(path);
        if allowed.is_empty() { Lookup::Missing } else { Lookup::WrongMethod(allowed) }
    }

    fn find(&self, method: &Method, path: &str) -> Option<Lookup<S>> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some(Lookup::Found(handler, params))
    }

    /// Methods registered for `path`, plus the implicit HEAD and OPTIONS.
    /// Empty when nothing matches.
    fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| m.clone())
            .collect();
        if methods.is_empty() {
            return methods;
        }
        if methods.contains(&Method::GET) && !methods.contains(&Method::HEAD) {
            methods.push(Method::HEAD);
        }
        if !methods.contains(&Method::OPTIONS) {
            methods.push(Method::OPTIONS);
        }
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }
}

fn allow_header(methods: &[Method]) -> HeaderValue {
    let joined = methods.iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
    HeaderValue::from_str(&joined).unwrap_or_else(|_| HeaderValue::from_static(""))
}

// ── tower adapter ─────────────────────────────────────────────────────────────

/// A finished [`Router`] as a cloneable `tower::Service`. Clones share the
/// routing table.
pub struct RouterService<S>(Arc<Router<S>>);

impl<S> Clone for RouterService<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S, B> tower::Service<http::Request<B>> for RouterService<S>
where
    S: Send + Sync + 'static,
    B: Send + 'static,
{
    type Response = http::Response<Full<Bytes>>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let router = Arc::clone(&self.0);
        Box::pin(async move {
            let method = req.method().clone();
            let path = req.uri().path().to_owned();
            let started = Instant::now();

            let response = router.respond(req).await;

            info!(
                %method,
                %path,
                status = response.status().as_u16(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request"
            );
            Ok(response.into_inner())
        })
    }
}
