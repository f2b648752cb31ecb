//! Shared harness: the full router over in-memory backends.

#![allow(dead_code)]

use std::sync::Arc;

use articles_cache::MemoryCache;
use articles_server::{app, config::ServerConfig, state::AppState};
use articles_store::MemoryStore;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub cache: MemoryCache,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = ServerConfig::from_lookup(|name| {
            let value = match name {
                "STORE_BACKEND" => "memory",
                "JWT_ACCESS_SECRET" => "test-access-secret",
                "JWT_REFRESH_SECRET" => "test-refresh-secret",
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap();

        let store = Arc::new(MemoryStore::new());
        let cache = MemoryCache::new();
        let state = AppState::new(
            config,
            store.clone(),
            store.clone(),
            Arc::new(cache.clone()),
        );

        Self {
            router: app(state).unwrap(),
            store,
            cache,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    /// Register `email` and return its access token.
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({ "email": email, "password": "password123" })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["access_token"].as_str().unwrap().to_string()
    }

    /// Create an article and return its JSON.
    pub async fn create_article(&self, token: &str, title: &str, published_at: &str) -> Value {
        let response = self
            .send(
                Method::POST,
                "/articles",
                Some(token),
                Some(json!({
                    "title": title,
                    "description": format!("{} body", title),
                    "publishedAt": published_at,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body
    }
}
