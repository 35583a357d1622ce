#![allow(dead_code)]

use std::sync::Once;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub fn init_tracing() {
    static START: Once = Once::new();
    START.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else {
            tracing_subscriber::EnvFilter::new("quizify=debug")
        };

        let _ = tracing_subscriber::fmt()
            .with_test_writer() // ensure logs are captured by the test harness
            .without_time()
            .with_env_filter(filter)
            .try_init();
    });
}

pub const SAMPLE_CONTENT: &str = "The Eiffel Tower was completed in 1889 for the World's Fair in Paris. \
It is 330 metres tall and was the tallest man-made structure in the world until 1930.";

pub const MCQ_RESPONSE: &str = r#"{"questions":[
  {"question":"When was the Eiffel Tower completed?","options":["1889","1900","1930","1875"],"answer":"1889"},
  {"question":"Where is the Eiffel Tower?","options":["Paris","Berlin","Madrid","Rome"],"answer":"Paris"}
]}"#;

pub const DESCRIPTIVE_RESPONSE: &str = r#"[
  {"question":"Why was the Eiffel Tower built?","answer":"It was built for the 1889 World's Fair in Paris."}
]"#;

/// Wrap `text` the way the Gemini API returns it.
pub fn gemini_envelope(text: &str) -> String {
    serde_json::json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}
        ]
    })
    .to_string()
}

#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|pos| pos + 4)
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Serve exactly one HTTP exchange with a canned status and body.
/// Returns the base URL and a handle resolving to the captured request.
pub async fn serve_once(status: u16, body: String) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept connection");
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.expect("read request");
            assert!(n > 0, "connection closed before headers were complete");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(end) = find_header_end(&buf) {
                break end;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let total = header_end + content_length(&head);
        while buf.len() < total {
            let n = socket.read(&mut chunk).await.expect("read body");
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            reason,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.expect("write response");
        let _ = socket.shutdown().await;

        CapturedRequest {
            request_line: head.lines().next().unwrap_or_default().to_string(),
            body: String::from_utf8_lossy(&buf[header_end..total.min(buf.len())]).to_string(),
        }
    });

    (format!("http://{}", addr), handle)
}
