// tests/common/mod.rs
//
// A stand-in for the Jamsocket API, served by actix-web on an ephemeral port.
// `{base}` in scripted bodies is replaced with the server's own address so
// spawn responses can point status and connect requests back at it.
#![allow(dead_code)]

use actix_web::http::StatusCode;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub accept: Option<String>,
    pub body: Option<serde_json::Value>,
}

pub struct MockApi {
    spawn_response: (u16, String),
    statuses: Mutex<VecDeque<(u16, String)>>,
    connect_body: String,
    pub spawn_requests: Mutex<Vec<RecordedRequest>>,
    pub status_requests: Mutex<Vec<RecordedRequest>>,
    pub connect_requests: Mutex<Vec<RecordedRequest>>,
    pub status_times: Mutex<Vec<Instant>>,
    connect_hits: AtomicUsize,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            spawn_response: (
                200,
                r#"{"url":"{base}/conn","status_url":"{base}/status","name":"abc12","spawned":true}"#
                    .to_string(),
            ),
            statuses: Mutex::new(VecDeque::from([(200, r#"{"state":"Ready"}"#.to_string())])),
            connect_body: "hello".to_string(),
            spawn_requests: Mutex::new(Vec::new()),
            status_requests: Mutex::new(Vec::new()),
            connect_requests: Mutex::new(Vec::new()),
            status_times: Mutex::new(Vec::new()),
            connect_hits: AtomicUsize::new(0),
        }
    }

    pub fn with_spawn_response(mut self, status: u16, body: &str) -> Self {
        self.spawn_response = (status, body.to_string());
        self
    }

    /// Status responses served in order; the last one repeats forever.
    pub fn with_statuses(self, statuses: &[(u16, &str)]) -> Self {
        *self.statuses.lock().unwrap() = statuses
            .iter()
            .map(|(code, body)| (*code, body.to_string()))
            .collect();
        self
    }

    pub fn with_states(self, states: &[&str]) -> Self {
        let bodies: Vec<String> = states
            .iter()
            .map(|s| format!(r#"{{"state":"{}"}}"#, s))
            .collect();
        let scripted: Vec<(u16, &str)> = bodies.iter().map(|b| (200, b.as_str())).collect();
        self.with_statuses(&scripted)
    }

    pub fn spawn_count(&self) -> usize {
        self.spawn_requests.lock().unwrap().len()
    }

    pub fn status_count(&self) -> usize {
        self.status_requests.lock().unwrap().len()
    }

    pub fn connect_count(&self) -> usize {
        self.connect_hits.load(Ordering::SeqCst)
    }
}

pub struct MockServer {
    pub api: Arc<MockApi>,
    pub addr: SocketAddr,
}

impl MockServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

fn record(req: &HttpRequest, body: Option<serde_json::Value>) -> RecordedRequest {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string())
    };
    RecordedRequest {
        path: req.path().to_string(),
        authorization: header("authorization"),
        accept: header("accept"),
        body,
    }
}

fn respond(req: &HttpRequest, status: u16, body: &str) -> HttpResponse {
    let base = format!("http://{}", req.connection_info().host());
    HttpResponse::build(StatusCode::from_u16(status).unwrap())
        .content_type("application/json")
        .body(body.replace("{base}", &base))
}

async fn spawn(req: HttpRequest, body: web::Bytes, api: web::Data<MockApi>) -> HttpResponse {
    let json = serde_json::from_slice(&body).ok();
    api.spawn_requests.lock().unwrap().push(record(&req, json));
    let (status, body) = &api.spawn_response;
    respond(&req, *status, body)
}

async fn status(req: HttpRequest, api: web::Data<MockApi>) -> HttpResponse {
    api.status_times.lock().unwrap().push(Instant::now());
    api.status_requests.lock().unwrap().push(record(&req, None));

    let (code, body) = {
        let mut statuses = api.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().cloned().unwrap()
        }
    };
    respond(&req, code, &body)
}

async fn connect(req: HttpRequest, api: web::Data<MockApi>) -> HttpResponse {
    api.connect_hits.fetch_add(1, Ordering::SeqCst);
    api.connect_requests.lock().unwrap().push(record(&req, None));
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(api.connect_body.clone())
}

/// Starts the mock on its own actix system thread and returns once it is bound.
pub fn start(api: MockApi) -> MockServer {
    let api = Arc::new(api);
    let data = web::Data::from(api.clone());
    let (tx, rx) = std::sync::mpsc::channel();

    std::thread::spawn(move || {
        let _ = actix_rt::System::new().block_on(async move {
            let server = HttpServer::new(move || {
                App::new()
                    .app_data(data.clone())
                    .route(
                        "/user/{account}/service/{service}/spawn",
                        web::post().to(spawn),
                    )
                    .route("/status", web::get().to(status))
                    .route("/conn", web::get().to(connect))
            })
            .workers(1)
            .disable_signals()
            .bind(("127.0.0.1", 0))
            .expect("bind mock api");

            tx.send(server.addrs()[0]).expect("report mock address");
            server.run().await
        });
    });

    let addr = rx.recv().expect("mock api failed to start");
    MockServer { api, addr }
}
