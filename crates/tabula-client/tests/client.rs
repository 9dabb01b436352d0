//! Client behavior against a one-shot local HTTP server.

use std::time::Duration;

use tabula_client::{report_error, ApiClient, ApiError, CancellationToken, ClientConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves a single canned response and returns the raw request it received.
async fn serve_once(
    status: &'static str,
    body: &'static str,
    delay: Duration,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        tokio::time::sleep(delay).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes()).await;
        String::from_utf8_lossy(&request).into_owned()
    });

    (base, handle)
}

#[tokio::test]
async fn fetches_rows_with_bearer_token() {
    let (base, server) = serve_once("200 OK", r#"{"data": [{"name": "Ann"}, {"name": "Bob"}]}"#, Duration::ZERO).await;
    let client = ApiClient::new(ClientConfig::new(&base).unwrap().token("t0ken"));

    let rows = client
        .fetch_rows("/users", &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["name"], "Bob");

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /api/users HTTP/1.1"));
    assert!(request.to_ascii_lowercase().contains("authorization: bearer t0ken"));
}

#[tokio::test]
async fn error_body_message_becomes_notice() {
    let (base, _server) = serve_once("403 Forbidden", r#"{"message": "Admins only"}"#, Duration::ZERO).await;
    let client = ApiClient::new(ClientConfig::new(&base).unwrap());

    let err = client
        .fetch_rows("users", &CancellationToken::new())
        .await
        .unwrap_err();
    match &err {
        ApiError::Http { status, message } => {
            assert_eq!(*status, 403);
            assert_eq!(message, "Admins only");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(report_error(&err, false).is_some());
    assert!(report_error(&err, true).is_none());
}

#[tokio::test]
async fn falls_back_to_status_reason() {
    let (base, _server) = serve_once("500 Internal Server Error", "oops", Duration::ZERO).await;
    let client = ApiClient::new(ClientConfig::new(&base).unwrap());

    let err = client
        .get_json::<serde_json::Value>("users", &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let (base, _server) = serve_once("200 OK", "{not json", Duration::ZERO).await;
    let client = ApiClient::new(ClientConfig::new(&base).unwrap());

    let err = client
        .get_json::<serde_json::Value>("users", &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Parse { body: Some(ref b), .. } if b == "{not json"));
}

#[tokio::test]
async fn cancelling_mid_flight_drops_response() {
    let (base, _server) = serve_once("200 OK", "[]", Duration::from_secs(5)).await;
    let client = ApiClient::new(ClientConfig::new(&base).unwrap());
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = client.fetch_rows("users", &cancel).await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(report_error(&err, false).is_none());
}
