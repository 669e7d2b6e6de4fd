/// Backend client tests
/// Wire-format and failure-model checks against canned local HTTP fixtures

extern crate sidechat_core;

use std::time::Duration;

use sidechat_core::directory::load_peers;
use sidechat_core::dispatch::{DeliveryDispatcher, OutboundMessage};
use sidechat_core::ApiClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const CLIENT_TIMEOUT: Duration = Duration::from_secs(2);

fn json_response(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    )
}

fn header_end(req: &[u8]) -> Option<usize> {
    req.windows(4).position(|w| w == b"\r\n\r\n")
}

fn request_complete(req: &[u8]) -> bool {
    let Some(pos) = header_end(req) else {
        return false;
    };
    let head = String::from_utf8_lossy(&req[..pos]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.eq_ignore_ascii_case("content-length") {
                value.trim().parse::<usize>().ok()
            } else {
                None
            }
        })
        .unwrap_or(0);
    req.len() >= pos + 4 + content_length
}

/// Serve exactly one connection with a canned response; resolves to the
/// raw request the client sent
async fn serve_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut req = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            req.extend_from_slice(&buf[..n]);
            if request_complete(&req) {
                break;
            }
        }
        stream.write_all(response.as_bytes()).await.unwrap();
        let _ = stream.shutdown().await;
        String::from_utf8_lossy(&req).to_string()
    });

    (format!("http://{}", addr), handle)
}

/// Bind then immediately drop a listener to get an address nothing serves
async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_list_users_decodes_directory() {
    let body = r#"[{"id":"u1","username":"alice"},{"id":"u2","username":"bob"}]"#;
    let (url, handle) = serve_once(json_response(body)).await;

    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();
    let peers = client.list_users().await.unwrap();

    assert_eq!(peers.len(), 2);
    assert_eq!(peers[0].id, "u1");
    assert_eq!(peers[0].username, "alice");
    assert_eq!(peers[1].username, "bob");

    let request = timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    assert!(
        request.starts_with("GET /api/users"),
        "unexpected request line: {}",
        request.lines().next().unwrap_or("")
    );
}

#[tokio::test]
async fn test_directory_fetch_failure_collapses_to_empty() {
    let url = dead_endpoint().await;
    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();

    let peers = load_peers(&client).await;
    assert!(peers.is_empty());
}

#[tokio::test]
async fn test_malformed_directory_body_collapses_to_empty() {
    let (url, _handle) = serve_once(json_response("not json at all")).await;
    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();

    let peers = load_peers(&client).await;
    assert!(peers.is_empty());
}

#[tokio::test]
async fn test_error_status_collapses_to_empty() {
    let response =
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            .to_string();
    let (url, _handle) = serve_once(response).await;
    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();

    let peers = load_peers(&client).await;
    assert!(peers.is_empty());
}

#[tokio::test]
async fn test_send_message_posts_camel_case_payload() {
    let (url, handle) = serve_once(json_response("{}")).await;
    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();

    let msg = OutboundMessage {
        sender_id: "u7".to_string(),
        recipient_id: "u1".to_string(),
        body: "hi".to_string(),
    };
    client.send_message(&msg).await.unwrap();

    let request = timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    assert!(request.starts_with("POST /api/chat"));

    let body_start = request.find("\r\n\r\n").unwrap() + 4;
    let payload: serde_json::Value = serde_json::from_str(&request[body_start..]).unwrap();
    assert_eq!(payload["userId"], "u7");
    assert_eq!(payload["recipientId"], "u1");
    assert_eq!(payload["message"], "hi");
}

#[tokio::test]
async fn test_dispatcher_drains_and_delivers() {
    let (url, handle) = serve_once(json_response("{}")).await;
    let client = ApiClient::new(url, CLIENT_TIMEOUT).unwrap();

    let dispatcher = DeliveryDispatcher::spawn(client);
    dispatcher.dispatch(OutboundMessage {
        sender_id: "u7".to_string(),
        recipient_id: "u1".to_string(),
        body: "queued".to_string(),
    });

    let request = timeout(Duration::from_secs(5), handle).await.unwrap().unwrap();
    assert!(request.starts_with("POST /api/chat"));
    assert!(request.contains("\"queued\""));
}

#[tokio::test]
async fn test_delivery_failure_never_blocks_later_sends() {
    // Sends against a dead backend fail inside the drain task; the
    // dispatcher must keep accepting payloads regardless.
    let dead = dead_endpoint().await;
    let client = ApiClient::new(dead, CLIENT_TIMEOUT).unwrap();
    let dispatcher = DeliveryDispatcher::spawn(client);

    dispatcher.dispatch(OutboundMessage {
        sender_id: "u7".to_string(),
        recipient_id: "u1".to_string(),
        body: "lost".to_string(),
    });
    dispatcher.dispatch(OutboundMessage {
        sender_id: "u7".to_string(),
        recipient_id: "u1".to_string(),
        body: "also lost".to_string(),
    });

    // Both dispatch calls return immediately; the drain task swallows
    // the failures without tearing anything down.
    tokio::time::sleep(Duration::from_millis(200)).await;
    dispatcher.dispatch(OutboundMessage {
        sender_id: "u7".to_string(),
        recipient_id: "u1".to_string(),
        body: "still accepted".to_string(),
    });
}
