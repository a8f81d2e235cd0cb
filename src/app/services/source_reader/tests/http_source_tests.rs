//! Tests for the realtime HTTP source

use crate::Error;
use crate::app::services::source_reader::{HttpSource, parse_records_body};
use serde_json::json;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const URL: &str = "http://localhost/records";

/// Serve one canned HTTP response on a local port and return the URL
async fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 4096];
        let _ = socket.read(&mut request).await.unwrap();

        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    format!("http://{}/records", address)
}

#[test]
fn test_records_envelope() {
    let body = json!({
        "records": [
            {"kerbsideid": 1, "status_description": "Present"},
            {"kerbsideid": 2, "status_description": "Unoccupied"}
        ]
    })
    .to_string();

    let records = parse_records_body(URL, &body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kerbsideid"], json!(1));
    assert_eq!(records[1]["status_description"], json!("Unoccupied"));
}

#[test]
fn test_results_alias_is_accepted() {
    let body = json!({"total_count": 1, "results": [{"kerbsideid": 9}]}).to_string();
    let records = parse_records_body(URL, &body).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn test_records_preferred_over_results() {
    let body = json!({
        "records": [{"kerbsideid": 1}, {"kerbsideid": 2}],
        "results": [{"kerbsideid": 9}]
    })
    .to_string();

    let records = parse_records_body(URL, &body).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["kerbsideid"], json!(1));
}

#[test]
fn test_missing_records_key_yields_empty_list() {
    let body = json!({"total_count": 0}).to_string();
    assert!(parse_records_body(URL, &body).unwrap().is_empty());
}

#[test]
fn test_non_json_body_is_invalid_response() {
    let result = parse_records_body(URL, "<html>Service Unavailable</html>");
    assert!(matches!(result, Err(Error::InvalidResponse { .. })));
}

#[test]
fn test_non_object_record_is_invalid_response() {
    let body = json!({"records": [1, 2, 3]}).to_string();
    assert!(matches!(
        parse_records_body(URL, &body),
        Err(Error::InvalidResponse { .. })
    ));
}

#[tokio::test]
async fn test_fetch_returns_records() {
    let body = json!({"records": [{"kerbsideid": 22959, "status_description": "Present"}]});
    let url = serve_once("200 OK", body.to_string()).await;

    let source = HttpSource::new(url.clone(), Duration::from_secs(5)).unwrap();
    assert_eq!(source.url(), url);

    let records = source.fetch().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["kerbsideid"], json!(22959));
}

#[tokio::test]
async fn test_fetch_error_status_is_source_unavailable() {
    let url = serve_once("503 Service Unavailable", "{}".to_string()).await;
    let source = HttpSource::new(url, Duration::from_secs(5)).unwrap();

    match source.fetch().await {
        Err(Error::SourceUnavailable { message, .. }) => assert!(message.contains("503")),
        other => panic!("expected SourceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_connection_refused_is_source_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let source =
        HttpSource::new(format!("http://{}/records", address), Duration::from_secs(5)).unwrap();
    assert!(matches!(
        source.fetch().await,
        Err(Error::SourceUnavailable { .. })
    ));
}
