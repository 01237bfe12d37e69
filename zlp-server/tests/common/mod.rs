//! Shared fixtures for server tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use http::{Request, Response};
use http_body_util::BodyExt;
use shared::models::{AppConfig, PrinterEndpoint};
use tempfile::TempDir;
use tower::ServiceExt;
use zlp_printer::{PrintError, PrintResult, Transport};
use zlp_server::{Config, ServerState};

/// One recorded transport call
#[derive(Debug, Clone)]
pub struct Sent {
    pub endpoint: PrinterEndpoint,
    pub payload: String,
}

/// Transport that records payloads instead of printing
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Sent>>>,
    fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, endpoint: &PrinterEndpoint, payload: &[u8]) -> PrintResult<()> {
        self.sent.lock().unwrap().push(Sent {
            endpoint: endpoint.clone(),
            payload: String::from_utf8_lossy(payload).into_owned(),
        });
        if self.fail {
            return Err(PrintError::Connection(format!("{}: connection refused", endpoint)));
        }
        Ok(())
    }
}

/// Server state over a temp application folder
pub struct Harness {
    pub dir: TempDir,
    pub transport: RecordingTransport,
    pub state: ServerState<RecordingTransport>,
}

impl Harness {
    pub fn new(settings: AppConfig) -> Self {
        Self::with_transport(settings, RecordingTransport::default())
    }

    pub fn with_transport(settings: AppConfig, transport: RecordingTransport) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().to_path_buf(), 5000);
        let state = ServerState::with_transport(config, settings, transport.clone());
        Self {
            dir,
            transport,
            state,
        }
    }

    pub fn print_log(&self) -> String {
        std::fs::read_to_string(self.dir.path().join("log.txt")).unwrap_or_default()
    }

    pub async fn call(&self, request: Request<Body>) -> Response<Body> {
        zlp_server::api::build_app(self.state.clone())
            .oneshot(request)
            .await
            .unwrap()
    }
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

pub fn form_request(body: &str) -> Request<Body> {
    Request::post("/")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}
