//! Non-printing routes

mod common;

use std::time::Duration;

use common::{Harness, body_json, body_string, get, json_request};
use http::StatusCode;
use serde_json::json;
use shared::models::{AppConfig, PriceSuggestionType};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[tokio::test]
async fn test_form_page() {
    let h = Harness::new(AppConfig::default());
    let response = h.call(get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_string(response).await;
    assert!(html.contains(r#"name="oldprice""#));
    assert!(html.contains(r#"name="newprice""#));
    assert!(html.contains(r#"name="discount""#));
    assert!(html.contains(r#"name="printqty""#));
    assert!(html.contains("499 HUF"));
}

#[tokio::test]
async fn test_health() {
    let h = Harness::new(AppConfig::default());
    let body = body_json(h.call(get("/health")).await).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_settings_view() {
    let h = Harness::new(AppConfig {
        decimal_places: 9,
        price_suggestion_type: PriceSuggestionType::Czech,
        ..AppConfig::default()
    });
    let body = body_json(h.call(get("/api/settings")).await).await;

    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["printer"]["address"], "127.0.0.1");
    assert_eq!(data["printer"]["port"], 9100);
    assert_eq!(data["printer"]["transport"], "NET/TCP");
    assert_eq!(data["display"]["decimal_places"], 4);
    assert_eq!(data["price_suggestion_type"], "Czech");
    assert!(!data["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_stop_requests_shutdown() {
    let h = Harness::new(AppConfig::default());
    assert!(!h.state.shutdown.is_cancelled());

    let response = h.call(get("/stop")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, json!({"success": true, "message": "Server is shutting down..."}));

    assert!(h.state.shutdown.is_cancelled());
}

#[tokio::test]
async fn test_stop_ends_running_server() {
    let h = Harness::new(AppConfig::default());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(zlp_server::Server::with_state(h.state.clone()).serve(listener));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /stop HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut reply = String::new();
    stream.read_to_string(&mut reply).await.unwrap();
    assert!(reply.starts_with("HTTP/1.1 200"));
    assert!(reply.contains("Server is shutting down..."));

    tokio::time::timeout(Duration::from_secs(5), server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_scan_finds_fake_printer() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 16];
                if let Ok(n) = socket.read(&mut buf).await
                    && n > 0
                {
                    let _ = socket.write_all(b"ZT230 Zebra Technologies").await;
                }
            });
        }
    });

    let h = Harness::new(AppConfig::default());
    let response = h
        .call(json_request(
            "POST",
            "/api/scan",
            json!({"subnet": "127.0.0.1/32", "timeout_ms": 500, "port": port}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["cancelled"], false);
    let printers = body["data"]["printers"].as_array().unwrap();
    assert_eq!(printers.len(), 1);
    assert_eq!(printers[0]["address"], "127.0.0.1");
    assert_eq!(printers[0]["port"], port);
}

#[tokio::test]
async fn test_scan_rejects_large_subnet() {
    let h = Harness::new(AppConfig::default());
    let response = h
        .call(json_request("POST", "/api/scan", json!({"subnet": "10.0.0.0/8"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_scan_rejects_bad_subnet() {
    let h = Harness::new(AppConfig::default());
    let response = h
        .call(json_request("POST", "/api/scan", json!({"subnet": "printer"})))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
