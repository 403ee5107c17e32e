// src/test_support.rs
// DOCUMENTATION: Shared helpers for unit tests
// PURPOSE: Local stub servers for upstream APIs, in-memory store, fake translators

use crate::errors::ScraperError;
use crate::db::{ResourceBatch, ResourceStore};
use crate::models::DailyResource;
use crate::services::{HttpClient, RetryPolicy, TranslationProvider};
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use std::cell::RefCell;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

/// Smallest valid JPEG header, enough for content checks
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// Actix server on an ephemeral port standing in for a remote API
pub struct StubServer {
    addr: SocketAddr,
    handle: ServerHandle,
}

impl StubServer {
    /// Must be called from inside an actix system (`#[actix_web::test]`)
    pub fn start<F>(configure: F) -> Self
    where
        F: Fn(&mut web::ServiceConfig) + Send + Clone + 'static,
    {
        let server = HttpServer::new(move || {
            let configure = configure.clone();
            App::new().configure(move |cfg| configure(cfg))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("bind stub server");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_rt::spawn(server);

        Self { addr, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Route answering with a fixed JSON body
pub fn json_route(cfg: &mut web::ServiceConfig, path: &str, body: &'static str) {
    cfg.route(
        path,
        web::get().to(move || async move {
            HttpResponse::Ok()
                .content_type("application/json")
                .body(body)
        }),
    );
}

/// Route answering with a small JPEG
pub fn image_route(cfg: &mut web::ServiceConfig, path: &str) {
    cfg.route(
        path,
        web::get().to(|| async { HttpResponse::Ok().content_type("image/jpeg").body(JPEG_BYTES) }),
    );
}

/// Client with the production retry count but no waiting between attempts
pub fn no_backoff_client() -> HttpClient {
    HttpClient::new(RetryPolicy {
        max_retries: 5,
        backoff_factor: Duration::ZERO,
    })
    .expect("build http client")
}

/// Translation provider prefixing the target language
#[derive(Default)]
pub struct PrefixProvider {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TranslationProvider for PrefixProvider {
    async fn translate(&self, text: &str, target: &str) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{}] {}", target, text))
    }
}

/// Translation provider that always fails
#[derive(Default)]
pub struct FailingProvider {
    pub calls: AtomicUsize,
}

#[async_trait]
impl TranslationProvider for FailingProvider {
    async fn translate(&self, _text: &str, _target: &str) -> Result<String, ScraperError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ScraperError::Translation("quota exceeded".to_string()))
    }
}

#[derive(Default)]
struct MemoryState {
    rows: Vec<DailyResource>,
    truncates: usize,
    begins: usize,
    commits: usize,
}

/// In-memory store with the same conflict rules as recursos_diarios
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_truncate: bool,
    fail_commit: bool,
    reject_titles: Arc<Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every truncate call fails like a lost connection
    pub fn failing_truncate() -> Self {
        Self {
            fail_truncate: true,
            ..Self::default()
        }
    }

    /// Every commit fails and nothing pending is applied
    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Self::default()
        }
    }

    /// Upserts of rows with these titles fail
    pub fn rejecting(titles: &[&str]) -> Self {
        Self {
            reject_titles: Arc::new(titles.iter().map(|t| t.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn seed(&self, row: DailyResource) {
        self.state.lock().unwrap().rows.push(row);
    }

    pub fn rows(&self) -> Vec<DailyResource> {
        self.state.lock().unwrap().rows.clone()
    }

    pub fn truncates(&self) -> usize {
        self.state.lock().unwrap().truncates
    }

    pub fn begins(&self) -> usize {
        self.state.lock().unwrap().begins
    }

    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn truncate(&self) -> Result<(), ScraperError> {
        if self.fail_truncate {
            return Err(ScraperError::Database("connection refused".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        state.truncates += 1;
        state.rows.clear();
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn ResourceBatch>, ScraperError> {
        self.state.lock().unwrap().begins += 1;
        Ok(Box::new(MemoryBatch {
            store: self.clone(),
            pending: Vec::new(),
        }))
    }
}

struct MemoryBatch {
    store: MemoryStore,
    pending: Vec<DailyResource>,
}

fn apply_upsert(rows: &mut Vec<DailyResource>, row: &DailyResource) {
    match rows
        .iter_mut()
        .find(|r| r.fecha == row.fecha && r.titulo == row.titulo)
    {
        Some(existing) => {
            existing.descripcion = row.descripcion.clone();
            existing.path_imagen = row.path_imagen.clone();
        }
        None => rows.push(row.clone()),
    }
}

#[async_trait]
impl ResourceBatch for MemoryBatch {
    async fn upsert(&mut self, resource: &DailyResource) -> Result<(), ScraperError> {
        if self.store.reject_titles.contains(&resource.titulo) {
            return Err(ScraperError::Database("value too long".to_string()));
        }
        apply_upsert(&mut self.pending, resource);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), ScraperError> {
        if self.store.fail_commit {
            return Err(ScraperError::Database("connection reset during commit".to_string()));
        }
        let mut state = self.store.state.lock().unwrap();
        for row in &self.pending {
            apply_upsert(&mut state.rows, row);
        }
        state.commits += 1;
        Ok(())
    }
}

thread_local! {
    static CAPTURED: RefCell<Vec<(log::Level, String)>> = RefCell::new(Vec::new());
}

/// Logger keeping records per thread, so parallel tests see only their own output
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        CAPTURED.with(|captured| {
            captured
                .borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;
static INSTALL_LOGGER: Once = Once::new();

/// Install the capture logger and drop anything recorded so far on this thread
pub fn capture_logs() {
    INSTALL_LOGGER.call_once(|| {
        log::set_logger(&CAPTURE_LOGGER).expect("install capture logger");
        log::set_max_level(log::LevelFilter::Trace);
    });
    CAPTURED.with(|captured| captured.borrow_mut().clear());
}

/// Messages logged on this thread at `level` since `capture_logs`
pub fn logged(level: log::Level) -> Vec<String> {
    CAPTURED.with(|captured| {
        captured
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
