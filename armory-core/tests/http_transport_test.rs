//! Tests for the reqwest transport against a loopback HTTP responder
//!
//! The responder accepts one connection per scripted reply, captures the
//! request line and answers with a fixed status and body.

mod common;

use armory_core::catalog::{CatalogFetcher, FetchError};
use armory_core::config::CatalogConfig;
use common::{fixture, init_test_logging};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

/// Serve a single response and report the request line it answered
async fn serve_once(status: u16, body: String) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request_head(&mut socket).await;
        let request_line = request.lines().next().unwrap_or_default().to_string();

        let response = format!(
            "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(request_line);
    });

    (format!("http://{addr}/wot/encyclopedia/vehicles/"), rx)
}

async fn read_request_head(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn fetcher_for(endpoint: String) -> CatalogFetcher {
    let config = CatalogConfig {
        endpoint,
        timeout_seconds: 5,
        ..Default::default()
    };
    CatalogFetcher::from_config(&config).unwrap()
}

#[tokio::test]
async fn test_http_success_returns_sorted_vehicles() {
    init_test_logging();
    let (endpoint, request_line) = serve_once(200, fixture("vehicles_ok.json")).await;

    let catalog = fetcher_for(endpoint).fetch(None).await.unwrap();
    let names: Vec<&str> = catalog.vehicles().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Т-34", "Bourrasque", "Löwe"]);

    let request_line = request_line.await.unwrap();
    assert!(request_line.starts_with("GET /wot/encyclopedia/vehicles/?"));
    assert!(request_line.contains("application_id="));
    assert!(request_line.contains("fields=tank_id"));
}

#[tokio::test]
async fn test_http_500_is_network_error() {
    let (endpoint, _) = serve_once(500, String::new()).await;

    let err = fetcher_for(endpoint).fetch(None).await.unwrap_err();
    assert!(matches!(err, FetchError::Network { status: 500 }));
    assert_eq!(err.to_string(), "Network error (500)");
}

#[tokio::test]
async fn test_http_api_error_payload() {
    let (endpoint, _) = serve_once(200, fixture("api_error.json")).await;

    let err = fetcher_for(endpoint).fetch(None).await.unwrap_err();
    assert_eq!(err.to_string(), "INVALID_APPLICATION_ID");
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind and drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = fetcher_for(format!("http://{addr}/"))
        .fetch(None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.user_message().is_some());
}

#[tokio::test]
async fn test_cancellation_aborts_hanging_request() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept and never answer
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        drop(socket);
    });

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let fetcher = fetcher_for(format!("http://{addr}/"));
    let result = tokio::time::timeout(Duration::from_secs(4), fetcher.fetch(Some(&token)))
        .await
        .expect("cancellation should end the fetch well before the timeout");

    assert!(matches!(result, Err(FetchError::Cancelled)));
    server.abort();
}
