//! Firebase Realtime Database over its REST streaming endpoint.
//!
//! `GET {database}/{path}.json` with `Accept: text/event-stream` yields
//! server-sent `put`/`patch` events carrying `{"path": ..., "data": ...}`.
//! The first `put` at `/` is the full snapshot; later writes address single
//! children. [`ChildTracker`] turns that into child-added events.

use std::collections::HashSet;
use std::time::Duration;

use futures::StreamExt;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use super::realtime::{ChildAdded, ChildAddedCallback, RealtimeStore, Subscription};
use crate::error::RealtimeError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("dishdesk/", env!("CARGO_PKG_VERSION"));

/// One parsed server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub event: String,
    pub data: String,
}

/// Incremental `text/event-stream` parser. Chunks may split anywhere,
/// including inside a multi-byte character.
#[derive(Debug, Default)]
pub struct EventStreamParser {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already searched for a block terminator
    scanned: usize,
}

impl EventStreamParser {
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

        let mut events = Vec::new();
        let mut start = 0;
        // Back up one byte: the terminator may straddle the previous chunk
        let mut from = self.scanned.saturating_sub(1);
        while let Some(pos) = self.buffer[from..].windows(2).position(|w| w == b"\n\n") {
            let end = from + pos;
            let text = String::from_utf8_lossy(&self.buffer[start..end]);
            if let Some(event) = parse_block(&text) {
                events.push(event);
            }
            start = end + 2;
            from = start;
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();
        events
    }
}

fn parse_block(block: &str) -> Option<StreamEvent> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();
    for line in block.lines() {
        if line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }
    event.map(|event| StreamEvent {
        event,
        data: data.join("\n"),
    })
}

#[derive(Debug, Deserialize)]
struct Payload {
    path: String,
    data: Value,
}

/// Tracks known children of one collection and reports additions.
#[derive(Debug)]
pub struct ChildTracker {
    path: String,
    known: HashSet<String>,
}

impl ChildTracker {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            known: HashSet::new(),
        }
    }

    pub fn apply(&mut self, event: &StreamEvent) -> Result<Vec<ChildAdded>, RealtimeError> {
        match event.event.as_str() {
            "put" => {
                let write = parse_write(&event.data)?;
                Ok(self.apply_put(write))
            }
            "patch" => {
                let write = parse_write(&event.data)?;
                Ok(self.apply_patch(write))
            }
            "cancel" | "auth_revoked" => Err(RealtimeError::StreamClosed {
                path: self.path.clone(),
                reason: event.event.clone(),
            }),
            "keep-alive" => Ok(Vec::new()),
            other => {
                log::trace!("Ignoring stream event '{}'", other);
                Ok(Vec::new())
            }
        }
    }

    fn apply_put(&mut self, write: Payload) -> Vec<ChildAdded> {
        match child_key(&write.path) {
            None => {
                let previous = std::mem::take(&mut self.known);
                let Value::Object(children) = write.data else {
                    return Vec::new();
                };
                children
                    .into_iter()
                    .filter_map(|(key, value)| {
                        self.known.insert(key.clone());
                        (!previous.contains(&key)).then(|| ChildAdded::new(key, value))
                    })
                    .collect()
            }
            Some((key, true)) => self.upsert(key, write.data).into_iter().collect(),
            Some((_, false)) => Vec::new(),
        }
    }

    fn apply_patch(&mut self, write: Payload) -> Vec<ChildAdded> {
        match (child_key(&write.path), write.data) {
            (None, Value::Object(children)) => children
                .into_iter()
                .filter_map(|(key, value)| self.upsert(&key, value))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn upsert(&mut self, key: &str, value: Value) -> Option<ChildAdded> {
        if value.is_null() {
            self.known.remove(key);
            return None;
        }
        self.known
            .insert(key.to_string())
            .then(|| ChildAdded::new(key, value))
    }
}

/// `/` → None; `/key` → (key, true); `/key/deeper` → (key, false).
fn child_key(path: &str) -> Option<(&str, bool)> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.split_once('/') {
        Some((key, _)) => Some((key, false)),
        None => Some((trimmed, true)),
    }
}

fn parse_write(data: &str) -> Result<Payload, RealtimeError> {
    serde_json::from_str(data).map_err(|e| RealtimeError::MalformedEvent {
        message: format!("{}: {}", e, data),
    })
}

/// Realtime store backed by a Firebase database URL.
#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: Client,
    database_url: String,
    auth: Option<String>,
}

impl FirebaseStore {
    pub fn new(database_url: &str) -> Result<Self, RealtimeError> {
        // No overall timeout: the response body never ends.
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RealtimeError::SubscribeFailed {
                path: database_url.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            database_url: database_url.trim_end_matches('/').to_string(),
            auth: None,
        })
    }

    pub fn with_auth(mut self, token: impl Into<String>) -> Self {
        self.auth = Some(token.into());
        self
    }

    pub fn stream_url(&self, path: &str) -> String {
        format!("{}/{}.json", self.database_url, path.trim_matches('/'))
    }

    fn build_request(&self, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(self.stream_url(path))
            .header(reqwest::header::ACCEPT, "text/event-stream");
        if let Some(token) = &self.auth {
            request = request.query(&[("auth", token)]);
        }
        request
    }
}

impl RealtimeStore for FirebaseStore {
    /// Must be called within a tokio runtime; the stream runs as a task
    /// that is aborted when the subscription drops.
    fn subscribe(&self, path: &str, on_child_added: ChildAddedCallback) -> Result<Subscription, RealtimeError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| RealtimeError::SubscribeFailed {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let request = self.build_request(path);
        let owned_path = path.to_string();
        let task = runtime.spawn(async move {
            match run_stream(request, &owned_path, on_child_added).await {
                Ok(()) => log::debug!("Realtime stream for '{}' ended", owned_path),
                Err(e) => log::warn!("Realtime stream for '{}' stopped: {}", owned_path, e),
            }
        });

        Ok(Subscription::new(path, move || task.abort()))
    }
}

async fn run_stream(request: RequestBuilder, path: &str, mut on_child_added: ChildAddedCallback) -> Result<(), RealtimeError> {
    let subscribe_failed = |message: String| RealtimeError::SubscribeFailed {
        path: path.to_string(),
        message,
    };

    let response = request.send().await.map_err(|e| subscribe_failed(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(subscribe_failed(format!("HTTP {}", status.as_u16())));
    }

    let mut body = response.bytes_stream();
    let mut parser = EventStreamParser::default();
    let mut tracker = ChildTracker::new(path);

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| subscribe_failed(e.to_string()))?;
        for event in parser.feed(&chunk) {
            match tracker.apply(&event) {
                Ok(added) => added.into_iter().for_each(&mut on_child_added),
                Err(RealtimeError::MalformedEvent { message }) => {
                    log::warn!("Skipping malformed event on '{}': {}", path, message)
                }
                Err(e) => return Err(e),
            }
        }
    }
    Ok(())
}
