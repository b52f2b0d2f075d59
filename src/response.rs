//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handlers build a [`Response`] (usually with [`Response::json`]) and return
//! it. The router decorates it with CORS headers afterwards and the server
//! hands it to hyper.

use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;
use tracing::error;

const JSON: &str = "application/json";

/// Body sent when a value fails to serialize. Kept static so the fallback
/// path itself cannot fail.
const SERIALIZE_FAILED: &str = r#"{"success":false,"error":"Unexpected error: failed to serialize response"}"#;

/// An outgoing HTTP response.
///
/// ```rust
/// use horoscope_relay::Response;
/// use http::StatusCode;
///
/// let res = Response::json(StatusCode::OK, &serde_json::json!({ "ok": true }));
/// assert_eq!(res.status(), StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// Serializes `value` as the JSON body with the given status.
    ///
    /// A serialization failure is logged and answered with a fixed 500 body.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::bytes(status, JSON, body),
            Err(e) => {
                error!("failed to serialize response: {e}");
                Self::bytes(StatusCode::INTERNAL_SERVER_ERROR, JSON, SERIALIZE_FAILED)
            }
        }
    }

    /// Response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    fn bytes(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self { status, headers, body: body.into() }
    }

    /// Adds a header, replacing any previous value under the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Drops the body, keeping status and headers (HEAD requests).
    pub(crate) fn strip_body(&mut self) {
        self.body = Bytes::new();
    }

    pub(crate) fn into_inner(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Implement on your own types to return them directly from handlers.
/// [`RelayError`](crate::RelayError) implements it to render the error envelope.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl<T: IntoResponse, E: IntoResponse> IntoResponse for Result<T, E> {
    fn into_response(self) -> Response {
        match self {
            Ok(v) => v.into_response(),
            Err(e) => e.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_sets_content_type() {
        let res = Response::json(StatusCode::CREATED, &serde_json::json!({ "id": 1 }));
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(res.body(), br#"{"id":1}"#);
    }

    #[test]
    fn into_inner_keeps_status_and_headers() {
        let res = Response::empty(StatusCode::NO_CONTENT)
            .header(HeaderName::from_static("x-relay"), HeaderValue::from_static("1"))
            .into_inner();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(res.headers()["x-relay"], "1");
    }
}
