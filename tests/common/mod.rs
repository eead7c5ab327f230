//! Throwaway HTTP server standing in for a Shelly on localhost
#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::{SocketAddr, TcpListener, TcpStream},
    sync::{Arc, Mutex},
    thread,
};

pub struct FakeShelly {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl FakeShelly {
    /// Serve one canned `(status, body)` per incoming connection, in order.
    pub fn serve(responses: Vec<(u16, &'static str)>) -> FakeShelly {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(vec![]));

        let seen = requests.clone();
        thread::spawn(move || {
            for (status, body) in responses {
                let (mut stream, _) = match listener.accept() {
                    Ok(conn) => conn,
                    Err(_) => return,
                };
                if let Some(line) = read_request_line(&mut stream) {
                    seen.lock().unwrap().push(line);
                }
                let reply = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason(status),
                    body.len(),
                    body
                );
                let _ = stream.write_all(reply.as_bytes());
            }
        });

        FakeShelly { addr, requests }
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    /// Request lines received so far, e.g. `GET /status HTTP/1.1`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn read_request_line(stream: &mut TcpStream) -> Option<String> {
    let mut head = vec![];
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let read = stream.read(&mut buf).ok()?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(&buf[..read]);
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .map(str::to_string)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// An address nothing listens on.
pub fn refused_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}
