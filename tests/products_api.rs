mod common;

use common::{json, post_form, TestServer};
use productapp_kernel::settings::{DecimalSeparator, Settings};
use reqwest::StatusCode;

#[tokio::test]
async fn healthz_and_openapi_are_served() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/healthz")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));

    let res = client.get(srv.url("/docs/openapi.json")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let doc = json(res).await;
    assert!(doc["paths"]["/api/products"].is_object());
    assert!(doc["paths"]["/api/products/{id}"].is_object());
    assert!(doc["paths"]["/api/api-demo/posts/sample"].is_object());
}

#[tokio::test]
async fn product_lifecycle_over_http() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/api/products")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await, serde_json::json!([]));

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=12%2C50&description=A+widget",
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.headers()["location"], "/api/products/1");
    let created = json(res).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["price"], "12.50");

    let res = post_form(
        &client,
        &srv.url("/api/products/1"),
        "id=1&name=Gadget&price=3&description=Renamed",
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json(res).await["name"], "Gadget");

    let res = client.get(srv.url("/api/products/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched = json(res).await;
    assert_eq!(fetched["name"], "Gadget");
    assert_eq!(fetched["description"], "Renamed");

    let res = client.delete(srv.url("/api/products/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Deleting again is not an error
    let res = post_form(&client, &srv.url("/api/products/1/delete"), "").await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/api/products/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json(res).await["error"]["code"], "not_found");
}

#[tokio::test]
async fn invalid_submissions_are_unprocessable() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=&price=abc&description=",
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json(res).await;
    assert_eq!(body["error"]["code"], "validation_error");
    let fields: Vec<&str> = body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "description", "price"]);

    let res = client.get(srv.url("/api/products")).send().await.unwrap();
    assert_eq!(json(res).await, serde_json::json!([]));
}

#[tokio::test]
async fn unknown_and_unparsable_ids_are_not_found() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    for path in ["/api/products/42", "/api/products/abc"] {
        let res = client.get(srv.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
    }

    let res = post_form(
        &client,
        &srv.url("/api/products/42"),
        "id=42&name=Ghost&price=1&description=none",
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The form id must match the path id
    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=1&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let res = post_form(
        &client,
        &srv.url("/api/products/1"),
        "id=2&name=Other&price=1&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn decimal_comma_is_the_default_format() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=1+234%2C5&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json(res).await["price"], "1234.5");

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=12.50&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn point_separator_is_configurable() {
    let mut settings = Settings::default();
    settings.products.decimal_separator = DecimalSeparator::Point;
    let srv = TestServer::spawn(settings).await;
    let client = reqwest::Client::new();

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=12.50&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json(res).await["price"], "12.50");

    let res = post_form(
        &client,
        &srv.url("/api/products"),
        "name=Widget&price=12%2C50&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn undecodable_edit_form_uses_error_envelope() {
    let srv = TestServer::spawn(Settings::default()).await;
    let client = reqwest::Client::new();

    let res = post_form(
        &client,
        &srv.url("/api/products/1"),
        "id=one&name=Widget&price=1&description=demo",
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(res).await["error"]["code"], "validation_error");
}
