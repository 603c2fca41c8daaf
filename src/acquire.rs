//! Dataset acquisition. Exactly one suspension point exists in the app: this
//! initial load. Sources are tried in order and each fallback fully replaces
//! the prior attempt; only when the whole chain fails does the caller get an
//! error to surface as a notice.
//!
//! Precedence: embedded demo data (absent once a source is configured) >
//! network fetch via `SB_RANKINGS_URL` > local file via `SB_RANKINGS_FILE`.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT};
use serde::{Deserialize, Serialize};

pub const URL_ENV: &str = "SB_RANKINGS_URL";
pub const FILE_ENV: &str = "SB_RANKINGS_FILE";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "sb26_rankings";
const CACHE_FILE: &str = "http_cache.json";

static CLIENT: OnceCell<Client> = OnceCell::new();
static CACHE: Mutex<Option<CacheStore>> = Mutex::new(None);

/// Raw tabular text from the first source in the chain that yields any.
pub fn load_raw_table() -> Result<String> {
    if let Some(embedded) = embedded_dataset() {
        return Ok(embedded.to_string());
    }

    let mut failures: Vec<String> = Vec::new();

    if let Some(url) = env_value(URL_ENV) {
        match fetch_text_cached(&url) {
            Ok(body) => return Ok(body),
            Err(err) => failures.push(format!("fetch {url}: {err}")),
        }
    }

    if let Some(path) = env_value(FILE_ENV) {
        match fs::read_to_string(&path) {
            Ok(body) => return Ok(body),
            Err(err) => failures.push(format!("read {path}: {err}")),
        }
    }

    Err(anyhow!(
        "no rankings source succeeded: {}",
        failures.join("; ")
    ))
}

/// The bundled demo dataset, dropped as soon as any explicit source is
/// configured so the fallback chain below gets exercised.
fn embedded_dataset() -> Option<&'static str> {
    if env_value(URL_ENV).is_some() || env_value(FILE_ENV).is_some() {
        return None;
    }
    Some(include_str!("../data/sample_rankings.csv"))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

/// On-disk validator cache keyed by URL. Loaded lazily, rewritten after every
/// successful fetch; any read problem (missing file, bad JSON, stale version)
/// resets it to empty rather than failing the fetch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheStore {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

impl CacheStore {
    fn open() -> Self {
        Self::path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|raw| Self::from_json(&raw))
            .unwrap_or_default()
    }

    fn from_json(raw: &str) -> Self {
        match serde_json::from_str::<Self>(raw) {
            Ok(store) if store.version == CACHE_VERSION => store,
            _ => Self::default(),
        }
    }

    fn lookup(&self, url: &str) -> Option<CacheEntry> {
        self.entries.get(url).cloned()
    }

    /// Record a fetch result and write the store back out; persistence
    /// failures are ignored, the cache is an optimization only.
    fn remember(&mut self, url: &str, entry: CacheEntry) {
        self.version = CACHE_VERSION;
        self.entries.insert(url.to_string(), entry);
        let _ = self.persist();
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = Self::path() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let json = serde_json::to_string(self).context("serialize http cache")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write http cache")?;
        fs::rename(&tmp, &path).context("swap http cache")?;
        Ok(())
    }

    fn path() -> Option<PathBuf> {
        let base = match std::env::var("XDG_CACHE_HOME") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => {
                let home = std::env::var("HOME").ok()?;
                if home.trim().is_empty() {
                    return None;
                }
                PathBuf::from(home).join(".cache")
            }
        };
        Some(base.join(CACHE_DIR).join(CACHE_FILE))
    }
}

fn cached_entry(url: &str) -> Option<CacheEntry> {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    guard.get_or_insert_with(CacheStore::open).lookup(url)
}

fn remember_entry(url: &str, entry: CacheEntry) {
    let mut guard = CACHE.lock().expect("http cache lock poisoned");
    guard.get_or_insert_with(CacheStore::open).remember(url, entry);
}

/// Conditional GET with an ETag/Last-Modified cache on disk; a 304 serves the
/// cached body, any other non-2xx status is a failure.
fn fetch_text_cached(url: &str) -> Result<String> {
    let client = http_client()?;
    let cached = cached_entry(url);

    let mut req = client.get(url).header(USER_AGENT, "Mozilla/5.0");
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().context("request failed")?;
    let status = resp.status();
    let headers = resp.headers().clone();
    if status == StatusCode::NOT_MODIFIED {
        if let Some(entry) = cached {
            remember_entry(url, entry.clone());
            return Ok(entry.body);
        }
        return Err(anyhow!("received 304 without cache body"));
    }

    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }

    let header_text = |name| {
        headers
            .get(name)
            .and_then(|v: &reqwest::header::HeaderValue| v.to_str().ok())
            .map(str::to_string)
    };
    let entry = CacheEntry {
        body: body.clone(),
        etag: header_text(ETAG),
        last_modified: header_text(LAST_MODIFIED),
        fetched_at: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default(),
    };
    remember_entry(url, entry);
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_cache_version_resets_the_store() {
        let raw = r#"{"version":0,"entries":{"u":{"body":"x","etag":null,"last_modified":null,"fetched_at":0}}}"#;
        assert!(CacheStore::from_json(raw).entries.is_empty());
        assert!(CacheStore::from_json("not json").entries.is_empty());
    }

    #[test]
    fn current_cache_versions_round_through() {
        let mut store = CacheStore::default();
        store.version = CACHE_VERSION;
        store.entries.insert(
            "u".to_string(),
            CacheEntry {
                body: "x".to_string(),
                etag: Some("\"abc\"".to_string()),
                last_modified: None,
                fetched_at: 1,
            },
        );
        let raw = serde_json::to_string(&store).expect("serializes");
        let reread = CacheStore::from_json(&raw);
        assert_eq!(reread.lookup("u").map(|e| e.body), Some("x".to_string()));
    }
}
