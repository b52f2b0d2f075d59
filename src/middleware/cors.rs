//! Cross-origin resource sharing on top of `tower_http::cors`.
//!
//! [`CorsLayer`] does the header work and answers preflights. What it lacks is
//! wildcard-subdomain origins, so origins are matched here through
//! [`AllowOrigin::predicate`]. Patterns are either exact
//! (`http://localhost:8000`) or carry a leading wildcard label
//! (`https://*.onrender.com`), which matches one or more labels:
//! `https://a.b.onrender.com` matches, `https://onrender.com` does not.

use http::header::HeaderName;
use http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

#[derive(Clone, Debug)]
enum OriginPattern {
    Exact(String),
    /// `scheme://*.suffix`, stored as (`scheme://`, `.suffix`).
    Subdomain { scheme: String, suffix: String },
}

impl OriginPattern {
    fn parse(pattern: &str) -> Self {
        let pattern = pattern.to_ascii_lowercase();
        match pattern.split_once("://*.") {
            Some((scheme, rest)) => Self::Subdomain {
                scheme: format!("{scheme}://"),
                suffix: format!(".{rest}"),
            },
            None => Self::Exact(pattern),
        }
    }

    /// `origin` must already be lowercased.
    fn matches(&self, origin: &str) -> bool {
        match self {
            Self::Exact(o) => o == origin,
            Self::Subdomain { scheme, suffix } => origin
                .strip_prefix(scheme.as_str())
                .and_then(|host| host.strip_suffix(suffix.as_str()))
                .is_some_and(|labels| {
                    !labels.is_empty() && labels.split('.').all(|l| !l.is_empty() && !l.contains('/'))
                }),
        }
    }
}

/// A set of origin patterns, compared case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct Origins(Vec<OriginPattern>);

impl Origins {
    pub fn new<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self(patterns.into_iter().map(OriginPattern::parse).collect())
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        let Ok(origin) = origin.to_str() else { return false };
        let origin = origin.to_ascii_lowercase();
        self.0.iter().any(|p| p.matches(&origin))
    }
}

/// Credentialed CORS for `origins`, allowing `headers` on GET/HEAD/OPTIONS.
///
/// A matching `Origin` is echoed back; anything else gets no
/// `Access-Control-Allow-Origin`.
pub fn layer(origins: Origins, headers: impl IntoIterator<Item = HeaderName>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(move |origin, _parts| origins.allows(origin)))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(headers.into_iter().collect::<Vec<_>>())
        .allow_credentials(true)
}
