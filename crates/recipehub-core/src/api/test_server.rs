//! Minimal HTTP/1.1 stub for exercising `ApiClient` against real sockets.
//!
//! Serves the queued responses in order, one per connection, and records each
//! request it receives.

use std::collections::HashMap;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Lowercased header names
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StubResponse {
    status: u16,
    content_type: Option<String>,
    body: String,
}

impl StubResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self::raw(status, Some("application/json"), &body.to_string())
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self::raw(status, Some("text/plain"), body)
    }

    pub fn raw(status: u16, content_type: Option<&str>, body: &str) -> Self {
        Self {
            status,
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        }
    }
}

pub(crate) struct StubServer {
    pub base_url: String,
    requests: mpsc::UnboundedReceiver<RecordedRequest>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<StubResponse>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, requests) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            for response in responses {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                match serve_one(stream, &response).await {
                    Ok(request) => {
                        let _ = tx.send(request);
                    }
                    Err(_) => break,
                }
            }
        });

        Self {
            base_url,
            requests,
            handle,
        }
    }

    pub async fn next_request(&mut self) -> RecordedRequest {
        tokio::time::timeout(std::time::Duration::from_secs(5), self.requests.recv())
            .await
            .expect("no request reached the stub server")
            .expect("stub server stopped")
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one(stream: TcpStream, response: &StubResponse) -> std::io::Result<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).await?;

    let mut head = format!(
        "HTTP/1.1 {} Stub\r\nContent-Length: {}\r\nConnection: close\r\n",
        response.status,
        response.body.len()
    );
    if let Some(ref content_type) = response.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", content_type));
    }
    head.push_str("\r\n");

    let mut stream = reader.into_inner();
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(response.body.as_bytes()).await?;
    stream.shutdown().await?;

    Ok(RecordedRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
