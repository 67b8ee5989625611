#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use roadwatch_detect::{Classifier, DetectError, Detector, Frame};
use roadwatch_web::{router, AppState, DEFAULT_MAX_BODY_BYTES};

/// Classifier stand-in with a fixed reply
pub struct StubClassifier {
    pub reply: Result<String, u16>,
    pub configured: bool,
    pub calls: AtomicUsize,
}

impl StubClassifier {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            configured: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(status: u16) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(status),
            configured: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unconfigured() -> Arc<Self> {
        Arc::new(Self {
            reply: Ok("[]".to_string()),
            configured: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Classifier for StubClassifier {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn credential_name(&self) -> &str {
        "LOVABLE_API_KEY"
    }

    async fn classify(
        &self,
        _frame: &Frame,
        _timeout: Duration,
    ) -> roadwatch_detect::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(DetectError::UpstreamStatus { status: *status }),
        }
    }
}

/// Build the gateway router around any classifier
pub fn build_app(classifier: Arc<dyn Classifier>) -> Router {
    router(
        AppState::new(Detector::new(classifier)),
        DEFAULT_MAX_BODY_BYTES,
    )
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `app` on an ephemeral local port
pub async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub const IMAGE_BODY: &str = r#"{"image": "data:image/jpeg;base64,/9j/4AAQSkZJRg=="}"#;

pub const ONE_HELMET: &str = r#"[{"type":"HELMET_VIOLATION","confidence":0.9,"description":"d","location":"l","severity":"high"}]"#;
