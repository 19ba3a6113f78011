use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

type Responder = Arc<dyn Fn(usize, &str) -> Vec<u8> + Send + Sync>;

/// Minimal HTTP/1.1 server for engine tests. Each connection carries one
/// request; the responder sees the arrival number and the raw request.
pub(crate) struct ScriptedServer {
    pub(crate) base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl ScriptedServer {
    pub(crate) async fn start<F>(respond: F) -> Result<Self, String>
    where
        F: Fn(usize, &str) -> Vec<u8> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("local_addr failed: {}", err))?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let hits = Arc::new(AtomicUsize::new(0));
        let respond: Responder = Arc::new(respond);

        let recorded = Arc::clone(&requests);
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let hits = Arc::clone(&hits);
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    drop(serve_one(stream, recorded, hits, respond).await);
                });
            }
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn requests(&self) -> Result<Vec<String>, String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| format!("request log poisoned: {}", err))
    }
}

impl Drop for ScriptedServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn serve_one(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<String>>>,
    hits: Arc<AtomicUsize>,
    respond: Responder,
) -> std::io::Result<()> {
    let raw = read_request(&mut stream).await?;
    let hit = hits.fetch_add(1, Ordering::SeqCst);
    if let Ok(mut guard) = recorded.lock() {
        guard.push(raw.clone());
    }
    let response = respond(hit, &raw);
    stream.write_all(&response).await?;
    stream.shutdown().await
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];
    loop {
        let read = stream.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(chunk.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&buffer);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let body_len = content_length(text.get(..header_end).unwrap_or_default());
            if buffer.len() >= header_end.saturating_add(4).saturating_add(body_len) {
                break;
            }
        }
    }
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// A complete response with `Content-Length` and `Connection: close`.
pub(crate) fn http_response(status_line: &str, headers: &[(&str, &str)], body: &str) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status_line,
        body.len()
    );
    for (name, value) in headers {
        response.push_str(name);
        response.push_str(": ");
        response.push_str(value);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response.push_str(body);
    response.into_bytes()
}

/// Header value from a raw request, matched case-insensitively.
pub(crate) fn request_header(raw: &str, name: &str) -> Option<String> {
    raw.split("\r\n\r\n")
        .next()
        .unwrap_or_default()
        .lines()
        .skip(1)
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case(name))
        .map(|(_, value)| value.trim().to_owned())
}

/// First line of a raw request, e.g. `POST /coupon HTTP/1.1`.
pub(crate) fn request_line(raw: &str) -> String {
    raw.lines().next().unwrap_or_default().to_owned()
}

/// Body of a raw request.
pub(crate) fn request_body(raw: &str) -> String {
    raw.split_once("\r\n\r\n")
        .map(|(_, body)| body.to_owned())
        .unwrap_or_default()
}
