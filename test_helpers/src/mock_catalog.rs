//! Local stand-in for the filter catalog's HTTP endpoint.
//!
//! Every connection gets the same canned [`MockResponse`]. The server runs
//! on a background thread bound to an ephemeral port and lives until the
//! test process exits.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What the mock catalog does with each request
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// `200 OK` with this XML body
    Body(String),

    /// An HTTP error status with an empty body
    Status(u16),

    /// Wait this long before answering at all
    StallHeaders(Duration),

    /// Send headers announcing `total_len` bytes, write `partial`, then wait
    StallBody {
        partial: String,
        total_len: usize,
        delay: Duration,
    },
}

/// Handle to a running mock catalog
pub struct MockCatalog {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    /// Bind to `127.0.0.1:0` and start serving `response`
    pub fn start(response: MockResponse) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock catalog");
        let addr = listener.local_addr().expect("Mock catalog has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let requests_clone = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                match stream {
                    Ok(stream) => {
                        let response = response.clone();
                        let requests = requests_clone.clone();
                        thread::spawn(move || serve(stream, &response, &requests));
                    }
                    Err(e) => log::warn!("Mock catalog accept failed: {e}"),
                }
            }
        });

        Self { addr, requests }
    }

    /// Endpoint URL to put in the catalog configuration
    pub fn endpoint(&self) -> String {
        format!("http://{}/theory/fps/fps.php", self.addr)
    }

    /// Request targets (path and query) received so far
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request_head(stream: &mut TcpStream) -> Option<String> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(0) | Err(_) => return None,
            Ok(_) => head.push(byte[0]),
        }
    }
    Some(String::from_utf8_lossy(&head).into_owned())
}

fn serve(mut stream: TcpStream, response: &MockResponse, requests: &Mutex<Vec<String>>) {
    let Some(head) = read_request_head(&mut stream) else {
        return;
    };
    if let Some(target) = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    {
        requests.lock().unwrap().push(target.to_string());
    }

    // Write errors mean the client gave up, which some tests expect
    let _ = match response {
        MockResponse::Body(body) => write_response(&mut stream, 200, "OK", body.as_bytes()),
        MockResponse::Status(code) => write_response(&mut stream, *code, "Error", b""),
        MockResponse::StallHeaders(delay) => {
            thread::sleep(*delay);
            write_response(&mut stream, 200, "OK", b"")
        }
        MockResponse::StallBody {
            partial,
            total_len,
            delay,
        } => {
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {total_len}\r\nConnection: close\r\n\r\n"
            );
            let result = stream
                .write_all(head.as_bytes())
                .and_then(|_| stream.write_all(partial.as_bytes()))
                .and_then(|_| stream.flush());
            thread::sleep(*delay);
            result
        }
    };
}

fn write_response(
    stream: &mut TcpStream,
    code: u16,
    reason: &str,
    body: &[u8],
) -> std::io::Result<()> {
    let head = format!(
        "HTTP/1.1 {code} {reason}\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()
}
