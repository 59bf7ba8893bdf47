#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use mymdc_proposal::{ClientConfig, ProposalConfig};
use serde_json::{json, Value};

pub const TOKEN: &str = "foo";
pub const TIMESTAMP: &str = "2025-01-02T10:00:00.000000";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub api_key: Option<String>,
}

pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(value: Value) -> Self {
        Self {
            status: 200,
            body: value.to_string(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: json!({ "detail": "mock error" }).to_string(),
        }
    }
}

/// Minimal HTTP server answering from a closure and logging every request.
pub struct MockServer {
    server: Arc<tiny_http::Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
    pub base_url: String,
}

impl MockServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&RecordedRequest) -> Reply + Send + 'static,
    {
        let server = Arc::new(tiny_http::Server::http("127.0.0.1:0").expect("bind mock server"));
        let port = server
            .server_addr()
            .to_ip()
            .expect("mock server on tcp")
            .port();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let worker_server = Arc::clone(&server);
        let log = Arc::clone(&requests);
        let handle = std::thread::spawn(move || {
            for request in worker_server.incoming_requests() {
                let recorded = RecordedRequest {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    api_key: request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("X-API-key"))
                        .map(|h| h.value.to_string()),
                };
                let reply = handler(&recorded);
                log.lock().expect("request log").push(recorded);
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Type"[..],
                    &b"application/json"[..],
                )
                .expect("content type header");
                let response = tiny_http::Response::from_string(reply.body)
                    .with_status_code(reply.status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        Self {
            server,
            requests,
            handle: Some(handle),
            base_url: format!("http://127.0.0.1:{}", port),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn count(&self, method: &str, url_fragment: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url.contains(url_fragment))
            .count()
    }

    /// Requests are logged once their handler returns, which for slow
    /// handlers is after the client gave up. Polls until `expected` shows up,
    /// then waits `settle` for stragglers before returning the count.
    pub fn count_settled(
        &self,
        method: &str,
        url_fragment: &str,
        expected: usize,
        settle: Duration,
    ) -> usize {
        let deadline = Instant::now() + Duration::from_secs(15);
        while self.count(method, url_fragment) < expected && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(50));
        }
        std::thread::sleep(settle);
        self.count(method, url_fragment)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run_record(id: u64, cal_num_requests: u32) -> Value {
    json!({
        "id": id,
        "sample_id": 1,
        "experiment_id": 1,
        "cal_num_requests": cal_num_requests,
        "begin_at": TIMESTAMP,
        "end_at": TIMESTAMP,
        "migration_request_at": TIMESTAMP,
        "migration_begin_at": TIMESTAMP,
        "migration_end_at": TIMESTAMP,
        "cal_last_begin_at": TIMESTAMP,
        "cal_last_end_at": TIMESTAMP,
    })
}

/// Catalog for proposal 8034: run 1 calibrated once, run 2 calibrated
/// twice, every other run unknown.
pub fn catalog_reply(request: &RecordedRequest) -> Reply {
    if request.api_key.as_deref() != Some(TOKEN) {
        return Reply::status(401);
    }
    let path = request.url.split('?').next().unwrap_or_default();
    match path {
        "/api/mymdc/proposals/by_number/8034/runs/1" => Reply::json(json!({
            "runs": [run_record(1, 1)],
            "title": "Test Proposal",
            "id": 1234,
        })),
        "/api/mymdc/proposals/by_number/8034/runs/2" => Reply::json(json!({
            "runs": [run_record(2, 2)],
        })),
        p if p.starts_with("/api/mymdc/proposals/by_number/8034/runs/") => {
            Reply::json(json!({ "runs": [] }))
        }
        "/api/mymdc/samples/1" => Reply::json(json!({ "name": "mithril", "id": 1 })),
        "/api/mymdc/experiments/1" => Reply::json(json!({ "name": "alchemy", "id": 1 })),
        "/api/mymdc/runs/1" => Reply::json(json!({
            "techniques": [
                { "identifier": "PaNET01168", "name": "SFX" },
                { "identifier": "PaNET01188", "name": "SAXS" },
            ]
        })),
        "/api/mymdc/runs/2" => Reply::json(json!({ "techniques": [] })),
        _ => Reply::status(404),
    }
}

static TREE_SEQ: AtomicUsize = AtomicUsize::new(0);

/// `<data_root>/MID/202501/p008034/usr` under the system temp dir.
pub struct ProposalTree {
    pub data_root: PathBuf,
}

impl ProposalTree {
    pub fn new(tag: &str) -> Self {
        let data_root = std::env::temp_dir().join(format!(
            "mymdc_it_{}_{}_{}",
            tag,
            std::process::id(),
            TREE_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        let _ = fs::remove_dir_all(&data_root);
        fs::create_dir_all(data_root.join("MID/202501/p008034/usr")).expect("proposal tree");
        Self { data_root }
    }

    pub fn proposal_root(&self) -> PathBuf {
        self.data_root.join("MID/202501/p008034")
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.proposal_root().join("usr/mymdc-credentials.yml")
    }

    pub fn write_credentials(&self, server: &str) {
        write_credentials(&self.credentials_path(), server);
    }

    pub fn config(&self, init_server: &str) -> ProposalConfig {
        ProposalConfig {
            data_root: self.data_root.clone(),
            mymdc: ClientConfig {
                timeout_secs: 5,
                init_server: init_server.to_string(),
                enable_cache: true,
            },
        }
    }
}

impl Drop for ProposalTree {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.data_root);
    }
}

pub fn write_credentials(path: &std::path::Path, server: &str) {
    fs::write(path, format!("token: {}\nserver: {}\n", TOKEN, server)).expect("write credentials");
}

/// Handler that stalls past a one second client timeout before answering.
pub fn slow<F>(inner: F) -> impl Fn(&RecordedRequest) -> Reply + Send + 'static
where
    F: Fn(&RecordedRequest) -> Reply + Send + 'static,
{
    move |request| {
        std::thread::sleep(Duration::from_millis(1500));
        inner(request)
    }
}

/// An address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind free port");
    let port = listener.local_addr().expect("free port addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}
