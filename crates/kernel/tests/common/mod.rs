#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Common test utilities for integration tests.
//!
//! [`TestApp`] wires the REAL kernel router, publishing service, and session
//! layer over in-memory stores, so tests verify actual behavior without
//! PostgreSQL or Redis.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore as SessionMemoryStore;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::{Duration, OffsetDateTime};
use tower_sessions::session::{Id, Record};
use tower_sessions::session_store::SessionStore;

use scrivener_kernel::publishing::PublishingService;
use scrivener_kernel::session::create_session_layer;
use scrivener_kernel::settings::{PostRestrictions, PublishingSettings, RoleSettings};
use scrivener_kernel::store::MemoryStore;
use scrivener_kernel::{AppState, build_router};
use scrivener_test_utils::TestUser;

pub const SITE_URL: &str = "http://example.test";
pub const UPLOADS_URL: &str = "http://example.test/uploads";

/// Capability granting instant publication in [`permissive_settings`].
pub const PUBLISH_POSTS: &str = "publish_posts";

/// Settings that accept any well-formed submission.
pub fn permissive_settings() -> PublishingSettings {
    PublishingSettings {
        restrictions: PostRestrictions::permissive(),
        roles: RoleSettings {
            no_check: None,
            instantly_publish: Some(PUBLISH_POSTS.to_string()),
        },
        ..PublishingSettings::default()
    }
}

/// Test application wrapper using the REAL kernel routes and state.
pub struct TestApp {
    router: Router,
    pub store: MemoryStore,
    pub sessions: SessionMemoryStore,
}

impl TestApp {
    /// App with [`permissive_settings`].
    pub fn new() -> Self {
        Self::with_settings(permissive_settings())
    }

    pub fn with_settings(settings: PublishingSettings) -> Self {
        let store = MemoryStore::new();
        let sessions = SessionMemoryStore::default();

        let publishing = PublishingService::new(
            settings,
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            SITE_URL,
            UPLOADS_URL,
        );
        let state = AppState::from_parts(publishing, Arc::new(sessions.clone()));
        let router = build_router(
            state,
            create_session_layer(sessions.clone(), SameSite::Lax, false),
        );

        Self {
            router,
            store,
            sessions,
        }
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Write a logged-in session for `user`, as the host's login flow would,
    /// and return its cookie.
    pub async fn login(&self, user: &TestUser) -> String {
        let mut data = HashMap::new();
        data.insert("user_id".to_string(), Value::from(user.id));
        data.insert(
            "user_permissions".to_string(),
            Value::from(user.permissions.clone()),
        );

        let mut record = Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + Duration::hours(1),
        };
        self.sessions.create(&mut record).await.unwrap();
        format!("id={}", record.id)
    }

    /// Fetch a token for `action`. Without a cookie, a fresh anonymous
    /// session is started; its cookie is returned alongside the token.
    pub async fn token(&self, action: &str, cookie: Option<&str>) -> (String, String) {
        let mut builder = Request::get(format!("/publishing/token/{action}"));
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let response = self.request(builder.body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = match cookie {
            Some(cookie) => cookie.to_string(),
            None => session_cookie(&response).expect("new session cookie"),
        };
        let json = body_json(response).await;
        (json["token"].as_str().unwrap().to_string(), cookie)
    }

    /// POST a form body.
    pub async fn post_form(&self, path: &str, cookie: Option<&str>, body: String) -> Response {
        let mut builder = Request::post(path).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST a form body and decode the JSON response.
    pub async fn post_json(&self, path: &str, cookie: Option<&str>, body: String) -> Value {
        let response = self.post_form(path, cookie, body).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_json(response).await
    }

    /// GET a path.
    pub async fn get(&self, path: &str) -> Response {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }
}

/// The `name=value` part of the session cookie set by a response.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .next()
        .map(str::to_string)
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
