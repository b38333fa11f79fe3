use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One request as it arrived on the wire. Header names are lowercased.
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Client that ignores proxy settings from the environment.
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client should build")
}

/// Serves a single canned response on a random local port.
///
/// Returns the base URL and a handle that yields the captured request once
/// the connection has been answered.
pub fn serve_once(status_line: &str, body: &[u8]) -> (String, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let port = listener.local_addr().expect("local addr").port();
    let status_line = status_line.to_string();
    let body = body.to_vec();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept connection");

        let mut raw = Vec::new();
        let mut buf = [0u8; 1024];
        let header_end = loop {
            let read = stream.read(&mut buf).expect("read request");
            assert!(read > 0, "connection closed before headers ended");
            raw.extend_from_slice(&buf[..read]);
            if let Some(position) = raw.windows(4).position(|window| window == b"\r\n\r\n") {
                break position;
            }
        };

        let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
        let mut lines = head.split("\r\n");
        let mut request_line = lines.next().unwrap_or_default().split(' ');
        let method = request_line.next().unwrap_or_default().to_string();
        let path = request_line.next().unwrap_or_default().to_string();
        let headers: HashMap<String, String> = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .collect();

        let content_length = headers
            .get("content-length")
            .and_then(|value| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut request_body = raw[header_end + 4..].to_vec();
        while request_body.len() < content_length {
            let read = stream.read(&mut buf).expect("read request body");
            assert!(read > 0, "connection closed before body ended");
            request_body.extend_from_slice(&buf[..read]);
        }

        let head = format!(
            "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        stream.write_all(head.as_bytes()).expect("write response head");
        stream.write_all(&body).expect("write response body");
        stream.flush().expect("flush response");

        CapturedRequest {
            method,
            path,
            headers,
            body: request_body,
        }
    });

    (format!("http://127.0.0.1:{port}"), handle)
}
