#![allow(dead_code)]

//! A throwaway HTTP server answering requests with canned responses.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
}

pub struct TestServer {
    pub base_url: String,
    pub host: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> (u16, &'static str) + Send + Sync>;

/// Answers every request with `status` and `body`.
pub async fn serve(status: u16, body: &'static str) -> TestServer {
    serve_with(Arc::new(move |_: &RecordedRequest| (status, body))).await
}

/// Behaves like a private repository: 200 with `body` for requests carrying
/// `Bearer <token>`, 404 for everything else.
pub async fn serve_private(token: &'static str, body: &'static str) -> TestServer {
    let expected = format!("Bearer {token}");
    serve_with(Arc::new(move |request: &RecordedRequest| {
        if request.authorization.as_deref() == Some(expected.as_str()) {
            (200, body)
        } else {
            (404, "")
        }
    }))
    .await
}

async fn serve_with(respond: Responder) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let recorded = recorded.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                loop {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&chunk[..n]),
                    }
                    if head.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let head = String::from_utf8_lossy(&head);
                let mut lines = head.lines();
                let path = lines
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or_default()
                    .to_string();
                let authorization = lines.find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("authorization")
                        .then(|| value.trim().to_string())
                });
                let request = RecordedRequest {
                    path,
                    authorization,
                };
                let (status, body) = respond(&request);
                recorded.lock().unwrap().push(request);

                let reason = match status {
                    200 => "OK",
                    401 => "Unauthorized",
                    404 => "Not Found",
                    _ => "Internal Server Error",
                };
                let response = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    TestServer {
        base_url: format!("http://{addr}"),
        host: addr.to_string(),
        requests,
    }
}
