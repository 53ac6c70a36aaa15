//! In-process HTTP fixtures for exercising the dashboard client.

use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

pub(crate) struct CannedResponse {
    status_line: &'static str,
    body: String,
    delay: Duration,
}

impl CannedResponse {
    pub(crate) fn ok(body: &str) -> Self {
        Self {
            status_line: "HTTP/1.1 200 OK",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub(crate) fn server_error(body: &str) -> Self {
        Self {
            status_line: "HTTP/1.1 500 Internal Server Error",
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Hold the response back for `delay` after the request arrives.
    pub(crate) fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Serve the given responses in order, one connection each, then stop
/// listening. Returns the base URL to point a client at.
pub(crate) async fn serve_responses(responses: Vec<CannedResponse>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener addr");

    tokio::spawn(async move {
        for resp in responses {
            let Ok((mut sock, _)) = listener.accept().await else {
                break;
            };

            // Drain the request head before answering.
            let mut buf = vec![0u8; 8192];
            let mut read_total = 0;
            loop {
                match sock.read(&mut buf[read_total..]).await {
                    Ok(0) => break,
                    Ok(n) => {
                        read_total += n;
                        if buf[..read_total].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                        if read_total == buf.len() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }

            if !resp.delay.is_zero() {
                tokio::time::sleep(resp.delay).await;
            }

            let payload = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                resp.status_line,
                resp.body.len(),
                resp.body
            );
            let _ = sock.write_all(payload.as_bytes()).await;
            let _ = sock.shutdown().await;
        }
    });

    format!("http://{addr}/")
}
