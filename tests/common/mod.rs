#![allow(dead_code)]

use std::{
    io::{Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

pub struct CapturedRequest {
    pub head: String,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }

    pub fn request_line(&self) -> &str {
        self.head.lines().next().unwrap_or("")
    }
}

/// Accepts `count` connections, answering each with `status`, and hands back what was received.
pub fn serve(status: u16, count: usize) -> (String, JoinHandle<Vec<CapturedRequest>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/logs", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let mut requests = Vec::new();
        for _ in 0..count {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);

            let response = format!(
                "HTTP/1.1 {} Stub\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok",
                status
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            requests.push(request);
        }
        requests
    });

    (url, handle)
}

fn read_request(stream: &mut impl Read) -> CapturedRequest {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before headers");
        data.extend_from_slice(&chunk[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8(data[..head_end].to_vec()).unwrap();
    let mut request = CapturedRequest {
        head,
        body: Vec::new(),
    };
    let length: usize = request
        .header("content-length")
        .map(|v| v.parse().unwrap())
        .unwrap_or(0);

    while data.len() < head_end + length {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before body");
        data.extend_from_slice(&chunk[..n]);
    }

    request.body = data[head_end..head_end + length].to_vec();
    request
}
