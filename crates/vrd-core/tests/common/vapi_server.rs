//! Minimal HTTP/1.1 server for export-loop integration tests.
//!
//! Serves `/call` from a queue of canned page responses (one per request,
//! in arrival order; an exhausted queue yields an empty page) and any
//! other path from a static recording map. Records every request line and
//! Authorization header so tests can assert cursor and auth behavior.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Token in canned page bodies replaced with the server's base URL at
/// startup, so pages can point recording URLs back at this server.
pub const BASE_URL_TOKEN: &str = "{base}";

/// One canned response for a `/call` list request.
#[derive(Debug, Clone)]
pub enum PageResponse {
    /// 200 with this JSON array body (after `{base}` substitution).
    Calls(String),
    /// 500, simulating an upstream failure.
    ServerError,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request path including the query string.
    pub path: String,
    pub authorization: Option<String>,
}

pub struct VapiServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl VapiServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests against the call list endpoint, in arrival order.
    pub fn list_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with("/call"))
            .collect()
    }

    /// Requests for recording bodies (everything that is not `/call`).
    pub fn recording_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| !r.path.starts_with("/call"))
            .collect()
    }
}

/// Starts the server in a background thread. Connections are handled
/// sequentially; the client under test is single-threaded anyway. Runs
/// until the process exits.
pub fn start(pages: Vec<PageResponse>, recordings: HashMap<String, Vec<u8>>) -> VapiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base_url = format!("http://127.0.0.1:{}", port);

    let requests = Arc::new(Mutex::new(Vec::new()));
    let pages = pages
        .into_iter()
        .map(|p| match p {
            PageResponse::Calls(json) => {
                PageResponse::Calls(json.replace(BASE_URL_TOKEN, &base_url))
            }
            other => other,
        })
        .collect::<VecDeque<_>>();
    let pages = Arc::new(Mutex::new(pages));
    let recordings = Arc::new(recordings);

    let requests_bg = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            handle(stream, &pages, &recordings, &requests_bg);
        }
    });

    VapiServer { base_url, requests }
}

fn handle(
    mut stream: TcpStream,
    pages: &Mutex<VecDeque<PageResponse>>,
    recordings: &HashMap<String, Vec<u8>>,
    requests: &Mutex<Vec<RecordedRequest>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));

    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
                if buf.len() > 64 * 1024 {
                    return;
                }
            }
            Err(_) => return,
        }
    }
    let request = match std::str::from_utf8(&buf) {
        Ok(s) => s,
        Err(_) => return,
    };

    let path = match request.split_whitespace().nth(1) {
        Some(p) => p.to_string(),
        None => return,
    };
    let authorization = request.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        name.eq_ignore_ascii_case("authorization")
            .then(|| value.trim().to_string())
    });
    requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        authorization,
    });

    if path.starts_with("/call") {
        match pages.lock().unwrap().pop_front() {
            Some(PageResponse::Calls(json)) => {
                respond(&mut stream, "200 OK", "application/json", json.as_bytes())
            }
            Some(PageResponse::ServerError) => respond(
                &mut stream,
                "500 Internal Server Error",
                "application/json",
                b"{\"message\":\"boom\"}",
            ),
            None => respond(&mut stream, "200 OK", "application/json", b"[]"),
        }
        return;
    }

    let bare_path = path.split('?').next().unwrap_or(&path);
    match recordings.get(bare_path) {
        Some(body) => respond(&mut stream, "200 OK", "application/octet-stream", body),
        None => respond(&mut stream, "404 Not Found", "text/plain", b"no such recording"),
    }
}

fn respond(stream: &mut TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let header = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
}
