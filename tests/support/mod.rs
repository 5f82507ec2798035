//! Minimal HTTP stub server for integration tests
//!
//! Accepts one request per connection, records it, and answers with
//! whatever the test's responder function returns. Just enough HTTP/1.1 to
//! satisfy a reqwest client; connections are closed after each response.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request the stub server received
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request target (path plus query string)
    pub target: String,
    /// Raw request body
    pub body: Vec<u8>,
}

impl RecordedRequest {
    /// Body interpreted as UTF-8, lossily
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Responder deciding the (status, body) for each request
pub type Responder = dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync;

/// Stub HTTP server bound to an ephemeral local port
pub struct StubServer {
    addr: SocketAddr,
    hits: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    /// Start a server answering every request through `responder`
    pub async fn start(responder: Arc<Responder>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let hits: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&hits);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let responder = Arc::clone(&responder);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(async move {
                    serve_connection(stream, responder.as_ref(), &recorded).await;
                });
            }
        });

        Self { addr, hits }
    }

    /// Base URL clients should point at
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Snapshot of the requests received so far
    pub fn hits(&self) -> Vec<RecordedRequest> {
        self.hits.lock().expect("hits lock").clone()
    }
}

/// Read one request off the stream, record it, and answer it
///
/// The record is pushed before the response is written, so a test that has
/// seen the response is guaranteed to see the hit.
async fn serve_connection(
    mut stream: tokio::net::TcpStream,
    responder: &Responder,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    // Read until the end of the header block
    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let content_length = lines
        .filter_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .next()
        .unwrap_or(0);

    // Read the remainder of the body
    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let request = RecordedRequest {
        method,
        target,
        body,
    };
    let (status, response_body) = responder(&request);
    recorded.lock().expect("hits lock").push(request);

    let reason = match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        _ => "Unknown",
    };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{response_body}",
        response_body.len()
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.flush().await.ok()?;

    Some(())
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}
