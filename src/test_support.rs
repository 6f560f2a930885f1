// Shared fixtures for in-crate tests.

use std::{path::PathBuf, sync::Arc};

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderMap, Method, Request},
    Router,
};
use hyper::{body::Bytes, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crate::{
    app_state::AppState, config::Settings,
    repositories::memory_repository::InMemoryChatRepository,
};

pub const TEST_SECRET: &str = "test-secret";
pub const PROJECT_FILE_BODY: &str = "project wide static file\n";
pub const APP_FILE_BODY: &str = "app static example\n";

pub fn test_settings() -> Settings {
    Settings {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        database_url: None,
        jwt_secret: TEST_SECRET.to_string(),
        session_ttl_hours: 1,
        static_dir: PathBuf::from("static"),
        app_static_dir: PathBuf::from("chat/static/chat"),
    }
}

pub fn test_state() -> AppState {
    AppState::new(Arc::new(InMemoryChatRepository::new()), test_settings())
}

/// Scratch static roots under the system temp dir, removed on drop
pub struct TempStaticDirs {
    pub root: PathBuf,
    pub project: PathBuf,
    pub app: PathBuf,
}

impl TempStaticDirs {
    pub fn empty() -> Self {
        let root = std::env::temp_dir().join(format!("room_chat-{}", Uuid::new_v4()));
        let project = root.join("static");
        let app = root.join("chat").join("static").join("chat");
        std::fs::create_dir_all(&project).unwrap();
        std::fs::create_dir_all(&app).unwrap();
        Self { root, project, app }
    }

    pub fn with_files() -> Self {
        let dirs = Self::empty();
        std::fs::write(dirs.project.join("project_wide.txt"), PROJECT_FILE_BODY).unwrap();
        std::fs::write(dirs.app.join("example.txt"), APP_FILE_BODY).unwrap();
        dirs
    }
}

impl Drop for TempStaticDirs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

pub fn settings_with_static_dirs(dirs: &TempStaticDirs) -> Settings {
    Settings {
        static_dir: dirs.project.clone(),
        app_static_dir: dirs.app.clone(),
        ..test_settings()
    }
}

pub fn state_with_static_dirs(dirs: &TempStaticDirs) -> AppState {
    AppState::new(
        Arc::new(InMemoryChatRepository::new()),
        settings_with_static_dirs(dirs),
    )
}

pub fn json_request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Runs one request through the router and collects the whole response
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, headers, body)
}
