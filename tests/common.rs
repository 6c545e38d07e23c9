//! Common test harness utilities for integration tests.
//!
//! This module provides helpers for:
//! - Building contest fixtures with scaled millisecond windows
//! - A scripted `RegistrationApi` that records calls
//! - A one-shot HTTP stub standing in for the contest backend

// Not all test files use all helpers; silence dead_code warnings for unused exports.
#![allow(dead_code)]

use arena::client::ApiError;
use arena::contest::{Contest, RegistrationAction, RegistrationApi};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// Registration window `[1_000_000, 2_000_000]`.
pub const REG_START: u64 = 1_000_000;
pub const REG_END: u64 = 2_000_000;
/// Contest window `[2_000_000, 5_000_000]`.
pub const CONTEST_START: u64 = 2_000_000;
pub const CONTEST_END: u64 = 5_000_000;

pub fn contest(is_registered: bool) -> Contest {
    Contest {
        id: "weekly-42".into(),
        name: "Weekly 42".into(),
        description: Some("Four problems, three hours".into()),
        start_time: CONTEST_START,
        end_time: CONTEST_END,
        registration_start_time: REG_START,
        registration_end_time: REG_END,
        eligible_to: vec![2, 3],
        is_registered,
    }
}

pub fn contest_json(is_registered: bool) -> String {
    serde_json::to_string(&contest(is_registered)).expect("encode contest")
}

/// `RegistrationApi` that replays queued results (defaulting to success) and
/// records every call it receives.
#[derive(Default)]
pub struct ScriptedApi {
    results: Mutex<VecDeque<Result<(), ApiError>>>,
    calls: Mutex<Vec<(String, RegistrationAction)>>,
}

impl ScriptedApi {
    pub fn replying(results: impl IntoIterator<Item = Result<(), ApiError>>) -> Self {
        Self {
            results: Mutex::new(results.into_iter().collect()),
            calls: Mutex::default(),
        }
    }

    pub fn status(status: u16, message: &str) -> Self {
        Self::replying([Err(ApiError::Status {
            status,
            message: message.into(),
        })])
    }

    pub fn calls(&self) -> Vec<(String, RegistrationAction)> {
        self.calls.lock().clone()
    }
}

impl RegistrationApi for ScriptedApi {
    async fn submit(&self, contest_id: &str, action: RegistrationAction) -> Result<(), ApiError> {
        self.calls.lock().push((contest_id.to_string(), action));
        self.results.lock().pop_front().unwrap_or(Ok(()))
    }
}

/// A request captured by [`StubServer`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Minimal HTTP/1.1 responder on an ephemeral loopback port. Each connection
/// gets the next canned `(status, body)`; the last one repeats.
pub struct StubServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let task = tokio::spawn(async move {
            let mut queue: VecDeque<(u16, String)> = responses.into();
            let mut last = (500, String::from("stub exhausted"));
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                if let Some(next) = queue.pop_front() {
                    last = next;
                }
                if let Some(request) = read_request(&mut socket).await {
                    recorded.lock().push(request);
                }
                let (status, body) = &last;
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        Self {
            base_url: format!("http://{addr}"),
            requests,
            task,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let path = first.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body_end = buf.len().min(header_end + content_length);
    let body = String::from_utf8_lossy(&buf[header_end..body_end]).to_string();
    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}
