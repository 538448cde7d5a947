// src/api/mock.rs
//! In-process HTTP backend for tests.
use std::io::Read;
use std::thread::{self, JoinHandle};

use tiny_http::{Header, Response, Server, StatusCode};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
    pub location: Option<String>,
}

impl Canned {
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into(), location: None }
    }

    pub fn redirect(to: &str) -> Self {
        Self { status: 303, body: String::new(), location: Some(to.to_string()) }
    }
}

/// Serve `responses` in order, one per request, then stop.
pub fn serve(responses: Vec<Canned>) -> (String, JoinHandle<Vec<Recorded>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for canned in responses {
            let mut request = server.recv().unwrap();
            let mut body = Vec::new();
            request.as_reader().read_to_end(&mut body).unwrap();
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string());
            recorded.push(Recorded {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body,
            });

            let mut response = Response::from_data(canned.body.into_bytes())
                .with_status_code(StatusCode(canned.status))
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            if let Some(location) = canned.location {
                response = response.with_header(Header::from_bytes("Location", location.as_bytes()).unwrap());
            }
            request.respond(response).unwrap();
        }
        recorded
    });

    (format!("http://127.0.0.1:{}", port), handle)
}
