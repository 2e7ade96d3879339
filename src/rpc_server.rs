//! CRM Workspace RPC Server — JSON-RPC over stdin/stdout for the host UI.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"location.changed", "params":{"location":"/app/acme/sales"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//! Events:   {"event":"tab.updated", ...} when a background title fetch completes.

use std::io::{self, Write};
use std::sync::Mutex;
use std::time::Instant;

use crm_workspace::app::App;
use crm_workspace::database::Database;
use crm_workspace::managers::navigator::HostNavigator;
use crm_workspace::managers::persistence_adapter::SqliteKeyValueStore;
use crm_workspace::platform;
use crm_workspace::rpc_handler::handle_method;
use crm_workspace::services::record_fetcher::HttpRecordFetcher;
use crm_workspace::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crm_workspace::types::errors::FetchError;
use crm_workspace::types::route::TitleRequest;

use log::{LevelFilter, Metadata, Record};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

const LOG_LEVEL_ENV: &str = "CRM_WORKSPACE_LOG";

/// Writes log records to stderr; stdout carries the RPC stream.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|v| v.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn emit(value: &Value) {
    let mut out = io::stdout().lock();
    let _ = writeln!(out, "{}", value);
    let _ = out.flush();
}

/// Opens the on-disk store, falling back to memory so a broken data dir
/// only costs restoration on the next start.
fn open_store() -> SqliteKeyValueStore {
    let dir = platform::get_data_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("could not create data dir {}: {}", dir.display(), e);
    }
    let db_path = dir.join("workspace.db");
    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            log::error!("could not open {}: {}; tabs will not survive restart", db_path.display(), e);
            match Database::open_in_memory() {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("failed to open any database: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };
    SqliteKeyValueStore::new(db)
}

fn build_fetcher(engine_settings: &crm_workspace::types::settings::ApiSettings) -> Option<HttpRecordFetcher> {
    match HttpRecordFetcher::new(engine_settings) {
        Ok(fetcher) => Some(fetcher),
        Err(e) => {
            log::error!("record titles disabled: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() {
    init_logging();

    let mut settings_engine = SettingsEngine::new(None);
    if let Err(e) = settings_engine.load() {
        log::warn!("using default settings: {}", e);
    }
    let mut fetcher = build_fetcher(&settings_engine.get_settings().api);

    let app = Mutex::new(App::new(settings_engine, open_store(), HostNavigator::new("/")));
    let (tx, mut rx) = mpsc::unbounded_channel::<(String, Result<String, FetchError>)>();

    emit(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    // Max 200 RPC requests per second
    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(l)) => l,
                    Ok(None) | Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }

                let req: Value = match serde_json::from_str(&line) {
                    Ok(v) => v,
                    Err(e) => {
                        emit(&json!({"id": null, "error": format!("parse error: {}", e)}));
                        continue;
                    }
                };
                let id = req.get("id").cloned().unwrap_or(Value::Null);

                if !rate_limiter.check() {
                    emit(&json!({"id": id, "error": "rate limit exceeded"}));
                    continue;
                }

                let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                let params = req.get("params").cloned().unwrap_or(json!({}));
                let result = handle_method(&app, method, &params);

                if method == "settings.set" && result.is_ok() {
                    if let Ok(a) = app.lock() {
                        fetcher = build_fetcher(&a.settings().api);
                    }
                }

                if let (Ok(val), Some(fetcher)) = (&result, &fetcher) {
                    let requests = val
                        .get("fetches")
                        .and_then(|f| f.as_array())
                        .cloned()
                        .unwrap_or_default();
                    for raw in requests {
                        let Ok(request) = serde_json::from_value::<TitleRequest>(raw) else {
                            continue;
                        };
                        let fetcher = fetcher.clone();
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = fetcher.fetch_title(&request).await;
                            let _ = tx.send((request.tab_id, outcome));
                        });
                    }
                }

                let response = match result {
                    Ok(val) => json!({"id": id, "result": val}),
                    Err(err) => json!({"id": id, "error": err}),
                };
                emit(&response);
            }
            Some((tab_id, outcome)) = rx.recv() => {
                let event = match &outcome {
                    Ok(title) => json!({"event": "tab.updated", "tab_id": tab_id, "title": title}),
                    Err(e) => json!({"event": "tab.title_failed", "tab_id": tab_id, "error": e.to_string()}),
                };
                let applied = match app.lock() {
                    Ok(mut a) => a.apply_title(&tab_id, outcome),
                    Err(_) => false,
                };
                if applied || event["event"] == "tab.title_failed" {
                    emit(&event);
                }
            }
        }
    }

    let mut a = match app.lock() {
        Ok(a) => a,
        Err(_) => return,
    };
    if a.is_logged_in() {
        let _ = a.logout();
    }
}
