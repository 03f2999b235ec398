//! Minimal HTTP/1.1 server standing in for the CDN in integration tests.
//!
//! Serves a fixed route table: static bodies, redirects, or bare status codes.
//! Every request path is recorded so tests can assert request order.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub enum Route {
    /// 200 with this body.
    Body(Vec<u8>),
    /// 302 with this `Location` (absolute or relative).
    Redirect(String),
    /// Bare status with an empty body.
    Status(u16),
}

pub struct CdnServer {
    /// e.g. "http://127.0.0.1:12345"
    pub origin: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CdnServer {
    /// Paths requested so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }
}

/// Starts a server in a background thread. Unknown paths get 404.
/// The server runs until the process exits.
pub fn start(routes: HashMap<String, Route>) -> CdnServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    CdnServer {
        origin: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// Route table with `hops` chained redirects from `path` ending at `body`.
pub fn redirect_chain(routes: &mut HashMap<String, Route>, path: &str, hops: usize, body: &[u8]) {
    let mut from = path.to_string();
    for i in 0..hops {
        let to = format!("{}.hop{}", path, i + 1);
        routes.insert(from, Route::Redirect(to.clone()));
        from = to;
    }
    routes.insert(from, Route::Body(body.to_vec()));
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, Route>,
    log: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(path.clone());

    let (status, extra, body) = match routes.get(&path) {
        Some(Route::Body(body)) => ("200 OK", String::new(), body.clone()),
        Some(Route::Redirect(location)) => (
            "302 Found",
            format!("Location: {}\r\n", location),
            Vec::new(),
        ),
        Some(Route::Status(code)) => (status_line(*code), String::new(), Vec::new()),
        None => ("404 Not Found", String::new(), Vec::new()),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
        status,
        body.len(),
        extra
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(&body);
}

fn status_line(code: u16) -> &'static str {
    match code {
        301 => "301 Moved Permanently",
        403 => "403 Forbidden",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        503 => "503 Service Unavailable",
        _ => "400 Bad Request",
    }
}
