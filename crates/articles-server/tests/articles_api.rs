//! Article endpoints end to end, including cache coherence across requests.

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{Value, json};

fn list_uri(params: &[(&str, &str)]) -> String {
    format!("/articles?{}", serde_urlencoded::to_string(params).unwrap())
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = TestApp::new();
    let response = app
        .send(
            Method::POST,
            "/articles",
            None,
            Some(json!({
                "title": "t",
                "description": "d",
                "publishedAt": "2024-09-01T00:00:00Z",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.store.article_count().await, 0);
}

#[tokio::test]
async fn create_with_token_for_unknown_user_is_unauthorized() {
    // Same signing secrets, but the user was never stored here.
    let issuer = TestApp::new();
    let token = issuer.register("ghost@example.com").await;
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            "/articles",
            Some(&token),
            Some(json!({
                "title": "t",
                "description": "d",
                "publishedAt": "2024-09-01T00:00:00Z",
            })),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(app.store.article_count().await, 0);
}

#[tokio::test]
async fn create_then_get_returns_owner() {
    let app = TestApp::new();
    let token = app.register("alice@example.com").await;
    let created = app
        .create_article(&token, "Hello", "2024-09-01T00:00:00Z")
        .await;

    assert_eq!(created["title"], "Hello");
    assert_eq!(created["author"]["email"], "alice@example.com");
    assert!(created["author"].get("password").is_none());

    let fetched = app.get(&format!("/articles/{}", created["id"])).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created);
}

#[tokio::test]
async fn create_validates_body() {
    let app = TestApp::new();
    let token = app.register("alice@example.com").await;

    for body in [
        json!({ "title": "", "description": "d", "publishedAt": "2024-09-01T00:00:00Z" }),
        json!({ "title": "t", "description": "d" }),
        json!({ "title": "t", "description": "d", "publishedAt": "not a date" }),
    ] {
        let response = app
            .send(Method::POST, "/articles", Some(&token), Some(body.clone()))
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{}", body);
    }
}

#[tokio::test]
async fn get_missing_and_malformed_ids() {
    let app = TestApp::new();

    let missing = app.get("/articles/42").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["error"]["code"], "NOT_FOUND");

    let malformed = app.get("/articles/abc").await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_by_owner_is_visible_through_warm_cache() {
    let app = TestApp::new();
    let token = app.register("alice@example.com").await;
    let created = app
        .create_article(&token, "Before", "2024-09-01T00:00:00Z")
        .await;
    let uri = format!("/articles/{}", created["id"]);

    // Warm both cache scopes.
    app.get(&uri).await;
    app.get("/articles").await;
    assert!(!app.cache.is_empty());

    let updated = app
        .send(
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({ "title": "After" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["title"], "After");
    assert_eq!(updated.body["description"], created["description"]);

    assert_eq!(app.get(&uri).await.body["title"], "After");
    assert_eq!(titles(&app.get("/articles").await.body), ["After"]);
}

#[tokio::test]
async fn non_owner_gets_not_found_and_nothing_changes() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com").await;
    let bob = app.register("bob@example.com").await;
    let created = app
        .create_article(&alice, "Alice's", "2024-09-01T00:00:00Z")
        .await;
    let uri = format!("/articles/{}", created["id"]);

    let update = app
        .send(
            Method::PATCH,
            &uri,
            Some(&bob),
            Some(json!({ "title": "Bob's now" })),
        )
        .await;
    let remove = app.send(Method::DELETE, &uri, Some(&bob), None).await;
    let missing = app.send(Method::DELETE, "/articles/999", Some(&bob), None).await;

    assert_eq!(update.status, StatusCode::NOT_FOUND);
    assert_eq!(remove.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    // Same shape as a genuinely missing article, modulo the id.
    assert_eq!(remove.body["error"]["code"], missing.body["error"]["code"]);

    let fetched = app.get(&uri).await;
    assert_eq!(fetched.body, created);
}

#[tokio::test]
async fn remove_twice() {
    let app = TestApp::new();
    let token = app.register("alice@example.com").await;
    let created = app
        .create_article(&token, "Short-lived", "2024-09-01T00:00:00Z")
        .await;
    let uri = format!("/articles/{}", created["id"]);
    app.get(&uri).await;

    let first = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(first.body, Value::Null);

    let second = app.send(Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(second.status, StatusCode::NOT_FOUND);
    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_empty() {
    let app = TestApp::new();
    let response = app.get("/articles").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn list_pages_are_disjoint() {
    let app = TestApp::new();
    let token = app.register("alice@example.com").await;
    for i in 0..11 {
        app.create_article(&token, &format!("A{:02}", i), "2024-09-01T00:00:00Z")
            .await;
    }

    let first = titles(&app.get(&list_uri(&[("page", "1"), ("limit", "10")])).await.body);
    let second = titles(&app.get(&list_uri(&[("page", "2"), ("limit", "10")])).await.body);

    assert_eq!(first.len(), 10);
    assert_eq!(second, ["A10"]);
    assert!(!first.contains(&second[0]));
}

#[tokio::test]
async fn list_rejects_bad_parameters() {
    let app = TestApp::new();
    for params in [
        vec![("page", "0")],
        vec![("limit", "101")],
        vec![("limit", "ten")],
        vec![("author", "alice")],
        vec![("publishedAt", "last week")],
    ] {
        let response = app.get(&list_uri(&params)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{:?}", params);
    }
}

#[tokio::test]
async fn list_filters_by_author_and_published_date() {
    let app = TestApp::new();
    let alice = app.register("alice@example.com").await;
    let bob = app.register("bob@example.com").await;
    let bob_id = app.send(Method::GET, "/auth/me", Some(&bob), None).await.body["id"].to_string();

    app.create_article(&alice, "old", "2024-01-01T00:00:00Z").await;
    app.create_article(&alice, "new", "2024-06-01T00:00:00Z").await;
    app.create_article(&bob, "bobs", "2024-06-01T00:00:00Z").await;

    let by_bob = app.get(&list_uri(&[("author", bob_id.as_str())])).await;
    assert_eq!(titles(&by_bob.body), ["bobs"]);

    let recent = app.get(&list_uri(&[("publishedAt", "2024-03-01")])).await;
    assert_eq!(titles(&recent.body), ["new", "bobs"]);

    // Strictly after.
    let exact = app
        .get(&list_uri(&[("publishedAfter", "2024-06-01T00:00:00Z")]))
        .await;
    assert_eq!(exact.body, json!([]));
}

#[tokio::test]
async fn new_article_appears_in_every_cached_list() {
    let app = TestApp::new();
    let u1 = app.register("u1@example.com").await;
    let u2 = app.register("u2@example.com").await;
    let u2_id = app.send(Method::GET, "/auth/me", Some(&u2), None).await.body["id"].to_string();

    app.create_article(&u1, "first", "2024-09-01T00:00:00Z").await;

    // Cache the default page and an author-filtered page.
    let default_page = app.get("/articles").await;
    assert_eq!(titles(&default_page.body), ["first"]);
    let u2_page_uri = list_uri(&[("author", u2_id.as_str())]);
    assert_eq!(app.get(&u2_page_uri).await.body, json!([]));

    app.create_article(&u2, "second", "2024-09-02T00:00:00Z").await;

    assert_eq!(titles(&app.get("/articles").await.body), ["first", "second"]);
    assert_eq!(titles(&app.get(&u2_page_uri).await.body), ["second"]);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new();
    let response = app.get("/articles").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.contains_key("x-request-id"));

    let failed = app.get("/articles/404").await;
    assert!(failed.headers.contains_key("x-request-id"));
}
