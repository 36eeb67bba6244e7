//! One-shot HTTP server for page fetch tests.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

pub struct CannedPage {
    status: u16,
    body: String,
    delay: Duration,
}

impl CannedPage {
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

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Request line and lowercased header block of the captured request.
#[derive(Debug)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_lowercase());
        self.headers
            .lines()
            .find_map(|l| l.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }
}

/// Accept a single connection, record the request head and answer with `page`.
pub async fn serve_once(page: CannedPage) -> (String, oneshot::Receiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos;
            }
            if n == 0 {
                break buf.len();
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
        let mut lines = head.lines();
        let request_line = lines.next().unwrap_or_default().to_string();
        let headers = lines.collect::<Vec<_>>().join("\n").to_lowercase();
        let _ = tx.send(CapturedRequest {
            request_line,
            headers,
        });

        tokio::time::sleep(page.delay).await;

        let reply = format!(
            "HTTP/1.1 {} Canned\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            page.status,
            page.body.len(),
            page.body
        );
        // The client may have timed out already.
        let _ = socket.write_all(reply.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    (format!("http://{}", addr), rx)
}
