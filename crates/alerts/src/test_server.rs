//! One-shot HTTP server for channel tests.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct CannedResponse {
    status: u16,
    body: String,
    delay: Duration,
}

impl CannedResponse {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the reply back for `delay` after the request has been read.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub body: String,
}

/// Accept a single connection, record the request and answer with `response`.
/// Returns the server base URL and a receiver for the captured request.
pub async fn serve_once(
    response: CannedResponse,
) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let (header_end, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let length = headers
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
            if n == 0 {
                break (buf.len(), 0);
            }
        };

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        let text = String::from_utf8_lossy(&buf).to_string();
        let request_line = text.lines().next().unwrap_or_default().to_string();
        let body = text.get(header_end..).unwrap_or_default().to_string();

        tokio::time::sleep(response.delay).await;

        let reply = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.status,
            response.body.len(),
            response.body
        );
        // The client may have given up already.
        let _ = socket.write_all(reply.as_bytes()).await;
        socket.shutdown().await.ok();

        let _ = tx.send(CapturedRequest { request_line, body });
    });

    (format!("http://{}", addr), rx)
}
