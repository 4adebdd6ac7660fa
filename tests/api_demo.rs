mod common;

use axum::{
    http::StatusCode as AxumStatus,
    routing::{get, post},
    Router,
};
use common::{json, post_form, TestServer};
use productapp::modules::api_demo::models::{Method, PostData};
use productapp::modules::api_demo::proxy::{ExternalApiProxy, ReqwestFetcher};
use productapp_kernel::settings::Settings;
use reqwest::StatusCode;
use std::sync::Arc;

const SAMPLE: &str = r#"{"id":1,"title":"foo"}"#;

/// Stand-in for the remote REST host
struct MockRemote {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl MockRemote {
    async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let base_url = format!("http://{}/", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { base_url, handle }
    }

    async fn healthy() -> Self {
        Self::spawn(
            Router::new()
                .route("/posts/1", get(|| async { SAMPLE }))
                .route(
                    "/posts",
                    post(|body: String| async move {
                        let mut echoed: serde_json::Value = serde_json::from_str(&body).unwrap();
                        echoed["id"] = serde_json::json!(101);
                        (AxumStatus::CREATED, echoed.to_string())
                    }),
                ),
        )
        .await
    }

    async fn slow(delay: std::time::Duration) -> Self {
        Self::spawn(Router::new().route(
            "/posts/1",
            get(move || async move {
                tokio::time::sleep(delay).await;
                SAMPLE
            }),
        ))
        .await
    }

    async fn failing() -> Self {
        Self::spawn(Router::new().route(
            "/posts/1",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "upstream stack trace") }),
        ))
        .await
    }
}

impl Drop for MockRemote {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn proxy(base_url: &str) -> ExternalApiProxy {
    ExternalApiProxy::new(Arc::new(ReqwestFetcher::new(base_url).unwrap()))
}

#[tokio::test]
async fn sample_get_returns_remote_text() {
    let remote = MockRemote::healthy().await;

    let result = proxy(&remote.base_url).fetch_sample().await;

    assert_eq!(result.method, Method::Get);
    assert!(result.succeeded);
    assert_eq!(result.response, SAMPLE);
}

#[tokio::test]
async fn submit_returns_remote_echo() {
    let remote = MockRemote::healthy().await;
    let post = PostData {
        user_id: 1,
        title: "t".to_string(),
        body: "b".to_string(),
    };

    let result = proxy(&remote.base_url).submit(&post).await;

    assert!(result.succeeded);
    let echoed: serde_json::Value = serde_json::from_str(&result.response).unwrap();
    assert_eq!(
        echoed,
        serde_json::json!({ "userId": 1, "title": "t", "body": "b", "id": 101 })
    );
}

#[tokio::test]
async fn remote_failure_is_reported_not_raised() {
    let remote = MockRemote::failing().await;

    let result = proxy(&remote.base_url).fetch_sample().await;

    assert!(!result.succeeded);
    assert!(result.response.starts_with("GET error:"));
    assert!(!result.response.contains("stack trace"));
}

#[tokio::test]
async fn unreachable_remote_is_reported_through_http() {
    // Bind then drop to obtain a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut settings = Settings::default();
    settings.remote_api.base_url = format!("http://{}/", addr);
    let srv = TestServer::spawn(settings).await;

    let res = reqwest::Client::new()
        .get(srv.url("/api/api-demo/posts/sample"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    assert_eq!(body["method"], "GET");
    assert_eq!(body["succeeded"], false);
    assert!(body["response"].as_str().unwrap().starts_with("GET error:"));
}

#[tokio::test]
async fn demo_routes_proxy_through_the_application() {
    let remote = MockRemote::healthy().await;
    let mut settings = Settings::default();
    settings.remote_api.base_url = remote.base_url.clone();
    let srv = TestServer::spawn(settings).await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/api/api-demo/posts/sample"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await["response"], SAMPLE);

    let res = post_form(
        &client,
        &srv.url("/api/api-demo/posts"),
        "userId=7&title=hello&body=world",
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    assert_eq!(body["method"], "POST");
    assert_eq!(body["succeeded"], true);
    let echoed: serde_json::Value =
        serde_json::from_str(body["response"].as_str().unwrap()).unwrap();
    assert_eq!(echoed["userId"], 7);
    assert_eq!(echoed["id"], 101);

    let res = post_form(&client, &srv.url("/api/api-demo/posts"), "userId=7&title=&body=").await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn slow_remote_reply_is_awaited_through_http() {
    let remote = MockRemote::slow(std::time::Duration::from_millis(1500)).await;
    let mut settings = Settings::default();
    settings.remote_api.base_url = remote.base_url.clone();
    let srv = TestServer::spawn(settings).await;

    let res = reqwest::Client::new()
        .get(srv.url("/api/api-demo/posts/sample"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body = json(res).await;
    assert_eq!(body["succeeded"], true);
    assert_eq!(body["response"], SAMPLE);
}
