//! Cookie-aware client that drives the router in-process.

use std::collections::HashMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use axum_extra::extract::cookie::Cookie;
use serde_json::Value;
use tower::ServiceExt;

use crate::{app::build_app, state::AppState};

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Raw `Set-Cookie` header values, in order.
    pub set_cookies: Vec<String>,
}

pub struct TestClient {
    app: Router,
    cookies: HashMap<String, String>,
}

impl TestClient {
    pub fn new() -> Self {
        Self::with_state(AppState::fake())
    }

    pub fn with_state(state: AppState) -> Self {
        Self {
            app: build_app(state),
            cookies: HashMap::new(),
        }
    }

    /// A second browser against the same server.
    pub fn fork(&self) -> Self {
        Self {
            app: self.app.clone(),
            cookies: HashMap::new(),
        }
    }

    pub fn has_session(&self) -> bool {
        self.cookies.contains_key("session")
    }

    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.into(), value.into());
    }

    pub fn clear_cookies(&mut self) {
        self.cookies.clear();
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, Body::empty()).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Body::from(body.to_string())).await
    }

    pub async fn post_raw(&mut self, uri: &str, body: &'static str) -> TestResponse {
        self.send(Method::POST, uri, Body::from(body)).await
    }

    async fn send(&mut self, method: Method, uri: &str, body: Body) -> TestResponse {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("; ");
            builder = builder.header(header::COOKIE, cookie);
        }
        let req = builder.body(body).unwrap();

        let res = self.app.clone().oneshot(req).await.unwrap();
        let set_cookies: Vec<String> = res
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|raw| raw.to_str().unwrap().to_owned())
            .collect();
        for raw in &set_cookies {
            let parsed = Cookie::parse(raw.clone()).unwrap();
            if parsed.value().is_empty() {
                self.cookies.remove(parsed.name());
            } else {
                self.cookies
                    .insert(parsed.name().to_owned(), parsed.value().to_owned());
            }
        }

        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse { status, body, set_cookies }
    }
}
