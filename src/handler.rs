//! Route handlers over shared application state.
//!
//! A handler receives the router's state as `Arc<S>` next to the request, so
//! nothing has to be cloned into closures at registration time:
//!
//! ```text
//! async fn daily(upstream: Arc<Upstream>, req: Request) -> Result<Response, RelayError>
//!        ↓ Router::with_state(upstream).get(path, daily)
//! Arc<dyn Handler<Upstream>>                     ← stored in the radix tree
//!        ↓ per request
//! handler.call(Arc::clone(&state), req)          ← one refcount bump, one virtual call
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// The future every handler is erased to.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// A route handler for a router whose state is `S`.
///
/// Implemented for every `Fn(Arc<S>, Request) -> impl Future<Output = impl IntoResponse>`,
/// which covers `async fn` items. Implement it by hand for handler structs.
pub trait Handler<S>: Send + Sync + 'static {
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture;
}

impl<S, F, Fut, R> Handler<S> for F
where
    F: Fn(Arc<S>, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, state: Arc<S>, req: Request) -> BoxFuture {
        let fut = self(state, req);
        Box::pin(async move { fut.await.into_response() })
    }
}

pub(crate) type BoxedHandler<S> = Arc<dyn Handler<S>>;
