//! Incoming HTTP request type.

use std::collections::HashMap;

/// An incoming HTTP request as seen by a handler.
///
/// Carries the decoded query string and path parameters. Method and path
/// were settled by routing; the body is dropped since every route is a GET.
pub struct Request {
    query: Vec<(String, String)>,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, params: HashMap<String, String>) -> Self {
        let query = parts
            .uri
            .query()
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();

        Self { query, params }
    }

    /// First decoded value of a query parameter.
    ///
    /// `?sign=leo&sign=aries` yields `Some("leo")`; `?sign=` yields `Some("")`.
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `req.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
