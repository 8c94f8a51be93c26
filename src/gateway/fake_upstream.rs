//! Local stand-in for a third-party HTTP service, used by the live client tests.

use std::{
    io::Read,
    sync::{Arc, Mutex, mpsc::Sender},
    thread::JoinHandle,
};

use rouille::{Response, Server};

#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    /// path and query as sent
    pub url: String,
    pub authorization: Option<String>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Answers every request with the same canned response and records what it got.
pub struct FakeUpstream {
    pub base: String,
    captured: Arc<Mutex<Vec<Captured>>>,
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeUpstream {
    pub fn start(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        let body: Vec<u8> = body.into();
        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);

        let server = Server::new("127.0.0.1:0", move |request| {
            let mut received = Vec::new();
            if let Some(mut data) = request.data() {
                data.read_to_end(&mut received).unwrap();
            }
            sink.lock().unwrap().push(Captured {
                method: request.method().to_string(),
                url: request.raw_url().to_string(),
                authorization: request.header("Authorization").map(str::to_string),
                body: received,
            });
            Response::from_data(content_type, body.clone()).with_status_code(status)
        })
        .unwrap();

        let base = format!("http://{}", server.server_addr());
        let (handle, stop) = server.stoppable();

        Self {
            base,
            captured,
            stop: Some(stop),
            handle: Some(handle),
        }
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

impl Drop for FakeUpstream {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
