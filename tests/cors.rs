use horoscope_relay::{Upstream, app};
use http::StatusCode;
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD,
    HeaderMap, HeaderName, ORIGIN,
};
use tower::ServiceExt;

fn app() -> app::App {
    app::service(Upstream::new("http://127.0.0.1:1", None).unwrap())
}

async fn send(req: http::Request<()>) -> http::Response<http_body_util::Full<bytes::Bytes>> {
    app().oneshot(req).await.unwrap()
}

/// Comma-separated header value, lowercased and split.
fn listed(headers: &HeaderMap, name: HeaderName) -> Vec<String> {
    headers[name]
        .to_str()
        .unwrap()
        .split(',')
        .map(|v| v.trim().to_ascii_lowercase())
        .collect()
}

#[tokio::test]
async fn allowed_origins_are_echoed_on_every_route() {
    for origin in [
        "http://localhost:8000",
        "https://localhost:8000",
        "https://my-frontend.onrender.com",
        "http://staging.my-frontend.onrender.com",
    ] {
        for (path, status) in [
            ("/health", StatusCode::OK),
            ("/api/v1/get-horoscope/daily", StatusCode::BAD_REQUEST),
            ("/unknown-path", StatusCode::NOT_FOUND),
        ] {
            let req = http::Request::get(path).header(ORIGIN, origin).body(()).unwrap();
            let res = send(req).await;

            assert_eq!(res.status(), status, "{path}");
            assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], origin, "{path}");
            assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true", "{path}");
        }
    }
}

#[tokio::test]
async fn other_origins_are_not_echoed() {
    for origin in ["http://localhost:3000", "https://example.com", "https://onrender.com"] {
        let req = http::Request::get("/health").header(ORIGIN, origin).body(()).unwrap();
        let res = send(req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none(), "{origin}");
    }
}

#[tokio::test]
async fn preflight_is_answered_by_the_cors_layer() {
    for path in ["/api/v1/get-horoscope/daily", "/nowhere"] {
        let req = http::Request::options(path)
            .header(ORIGIN, "https://app.onrender.com")
            .header(ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .header(ACCESS_CONTROL_REQUEST_HEADERS, "content-type, authorization")
            .body(())
            .unwrap();
        let res = send(req).await;

        assert_eq!(res.status(), StatusCode::OK, "{path}");
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "https://app.onrender.com");
        assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

        let methods = listed(res.headers(), ACCESS_CONTROL_ALLOW_METHODS);
        assert_eq!(methods, ["get", "head", "options"]);

        let headers = listed(res.headers(), ACCESS_CONTROL_ALLOW_HEADERS);
        assert!(headers.iter().any(|h| h == "content-type"), "{headers:?}");
        assert!(headers.iter().any(|h| h == "authorization"), "{headers:?}");
    }
}

#[tokio::test]
async fn plain_options_reaches_the_router() {
    let req = http::Request::options("/health").body(()).unwrap();
    let res = send(req).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[http::header::ALLOW], "GET, HEAD, OPTIONS");
}
