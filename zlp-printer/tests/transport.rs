//! RawTransport against a local fake printer

use std::time::Duration;

use shared::models::PrinterEndpoint;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use zlp_printer::{PrintError, RawTransport, Transport, generate_label};

/// Accept one connection and return everything written to it
async fn capture_one(listener: TcpListener) -> Vec<u8> {
    let (mut socket, _) = listener.accept().await.unwrap();
    let mut buf = Vec::new();
    socket.read_to_end(&mut buf).await.unwrap();
    buf
}

#[tokio::test]
async fn test_payload_delivered_verbatim() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let capture = tokio::spawn(capture_one(listener));

    let zpl = generate_label(
        &shared::LabelVariant::Normal {
            text: "100 HUF".into(),
        },
        2,
    );
    let endpoint = PrinterEndpoint::network("127.0.0.1", port);
    RawTransport::new().send(&endpoint, &zpl).await.unwrap();

    let received = capture.await.unwrap();
    assert_eq!(received, zpl);
}

#[tokio::test]
async fn test_refused_connection_is_unreachable() {
    // Bind then drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let endpoint = PrinterEndpoint::network("127.0.0.1", port);
    let err = RawTransport::new()
        .with_timeout(Duration::from_secs(1))
        .send(&endpoint, b"^XA^XZ")
        .await
        .unwrap_err();

    assert!(err.is_unreachable(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_host_name_endpoint_is_resolved() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let capture = tokio::spawn(capture_one(listener));

    let endpoint = PrinterEndpoint::network("localhost", port);
    RawTransport::new().send(&endpoint, b"^XA^XZ").await.unwrap();

    assert_eq!(capture.await.unwrap(), b"^XA^XZ");
}

#[tokio::test]
async fn test_unknown_host_is_unreachable() {
    let endpoint = PrinterEndpoint::network("no-such-printer.invalid", 9100);
    let err = RawTransport::new().send(&endpoint, b"^XA^XZ").await.unwrap_err();
    assert!(err.is_unreachable(), "unexpected error: {err}");
}

#[tokio::test]
async fn test_blank_address_is_config_error() {
    let endpoint = PrinterEndpoint::network("", 9100);
    let err = RawTransport::new().send(&endpoint, b"^XA^XZ").await.unwrap_err();
    assert!(matches!(err, PrintError::InvalidConfig(_)));
}

#[cfg(not(windows))]
#[tokio::test]
async fn test_usb_endpoint_unsupported() {
    let endpoint = PrinterEndpoint::usb("ZDesigner GK420d");
    let err = RawTransport::new().send(&endpoint, b"^XA^XZ").await.unwrap_err();
    assert!(matches!(err, PrintError::Unsupported(_)));
}
