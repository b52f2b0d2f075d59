use horoscope_relay::{Upstream, app, serve_listener};
use httpmock::prelude::*;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[tokio::test]
async fn serves_over_tcp_and_shuts_down_cleanly() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/get-horoscope/daily")
                .query_param("sign", "pisces")
                .query_param("day", "today");
            then.status(200).json_body(json!({ "horoscope": "Swim upstream" }));
        })
        .await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = app::service(Upstream::new(&upstream.base_url(), None).unwrap());

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(serve_listener(listener, service, async move {
        let _ = stop_rx.await;
    }));

    // No idle connections, so the drain after shutdown has nothing to wait on.
    let client = reqwest::Client::builder().pool_max_idle_per_host(0).build().unwrap();
    let base = format!("http://{addr}");

    let res = client
        .get(format!("{base}/api/v1/get-horoscope/daily?sign=pisces&day=today"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    let body: Value = serde_json::from_slice(&res.bytes().await.unwrap()).unwrap();
    assert_eq!(body, json!({ "horoscope": "Swim upstream" }));

    let res = client
        .get(format!("{base}/health"))
        .header("origin", "http://localhost:8000")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["access-control-allow-origin"], "http://localhost:8000");

    let res = client.get(format!("{base}/unknown-path")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = serde_json::from_slice(&res.bytes().await.unwrap()).unwrap();
    assert_eq!(body, json!({ "success": false, "error": "Resource not found" }));

    drop(client);
    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
