//! In-process store doubles, used by engine tests and local development.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};

use gazette_core::document::model::NewsletterDocument;

use super::{CacheStore, RemoteStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Remote store double holding the single row in memory, with injectable
/// failures and call counters. Change notifications are pushed explicitly
/// via [`MemoryRemoteStore::push_update`], mimicking another device's
/// write landing on the feed.
pub struct MemoryRemoteStore {
    row: Mutex<Option<Value>>,
    feed: broadcast::Sender<Value>,
    fetch_failures_left: AtomicUsize,
    fail_upserts: AtomicBool,
    fetch_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(16);
        MemoryRemoteStore {
            row: Mutex::new(None),
            feed,
            fetch_failures_left: AtomicUsize::new(0),
            fail_upserts: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            upsert_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_row(payload: Value) -> Self {
        let store = Self::new();
        store.set_row(payload);
        store
    }

    pub fn set_row(&self, payload: Value) {
        *self.row.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload);
    }

    pub fn row(&self) -> Option<Value> {
        self.row
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fail the next `n` fetches with a synthetic 503.
    pub fn fail_next_fetches(&self, n: usize) {
        self.fetch_failures_left.store(n, Ordering::SeqCst);
    }

    pub fn fail_upserts(&self, fail: bool) {
        self.fail_upserts.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Deliver a change notification to every subscriber.
    pub fn push_update(&self, payload: Value) {
        let _ = self.feed.send(payload);
    }

    fn unavailable() -> StoreError {
        StoreError::UnexpectedStatus {
            status: 503,
            body: "injected failure".to_string(),
        }
    }
}

impl Default for MemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn fetch(&self) -> Result<Option<Value>, StoreError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let failures = self.fetch_failures_left.load(Ordering::SeqCst);
        if failures > 0 {
            self.fetch_failures_left.store(failures - 1, Ordering::SeqCst);
            return Err(Self::unavailable());
        }
        Ok(self.row())
    }

    async fn upsert(
        &self,
        doc: &NewsletterDocument,
        _updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.set_row(serde_json::to_value(doc)?);
        Ok(())
    }

    fn subscribe(&self) -> mpsc::Receiver<Value> {
        let (tx, rx) = mpsc::channel(16);
        let mut feed = self.feed.subscribe();
        tokio::spawn(async move {
            while let Ok(payload) = feed.recv().await {
                if tx.send(payload).await.is_err() {
                    break;
                }
            }
        });
        rx
    }
}
