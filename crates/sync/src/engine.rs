//! The sync engine: owner of the single authoritative in-memory document.
//!
//! Startup order of precedence: seed synchronously from the local cache (or
//! defaults) so a view can render without any network wait, then fetch the
//! remote row asynchronously with backoff and merge it field-by-field, then
//! keep merging change-feed notifications for as long as the engine runs.
//! Every merged or committed state is written back to the cache so the next
//! process start begins from the freshest seen document.
//!
//! Remote unavailability never blocks reads or writes locally; it only
//! degrades cross-device freshness.

use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

use gazette_core::document::merge::DocumentPatch;
use gazette_core::document::model::NewsletterDocument;
use gazette_core::events::bus::EventBus;
use gazette_core::events::types::{DocumentUpdated, NewsletterEvent, UpdateOrigin};

use crate::backoff::RetryPolicy;
use crate::store::{CacheStore, RemoteStore, StoreError, CACHE_KEY};

/// A commit whose remote write failed. The local document and cache were
/// already updated and are not rolled back; the caller may retry the save.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    #[error("remote save failed: {0}")]
    Remote(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SyncStatus {
    Idle,
    /// A commit's remote write is in flight (held for a minimum duration so
    /// fast networks don't produce an imperceptible flash).
    Syncing,
    /// The last commit's remote write failed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct SyncEngineOptions {
    pub retry: RetryPolicy,
    /// Minimum time the `Syncing` status is held during a commit.
    pub min_syncing_hold: Duration,
}

impl Default for SyncEngineOptions {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            min_syncing_hold: Duration::from_millis(750),
        }
    }
}

pub struct SyncEngine {
    shared: Arc<Shared>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

struct Shared {
    remote: Arc<dyn RemoteStore>,
    cache: Arc<dyn CacheStore>,
    doc: RwLock<NewsletterDocument>,
    bus: EventBus,
    status_tx: watch::Sender<SyncStatus>,
    options: SyncEngineOptions,
}

impl SyncEngine {
    /// Build the engine, seeding the working document synchronously from
    /// the cache (a corrupt cached value reads as "nothing cached").
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        cache: Arc<dyn CacheStore>,
        options: SyncEngineOptions,
    ) -> Self {
        let seed = match cache.get(CACHE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(doc) => doc,
                Err(err) => {
                    tracing::warn!(%err, "cached document does not parse, seeding from defaults");
                    NewsletterDocument::default()
                }
            },
            None => NewsletterDocument::default(),
        };

        let (status_tx, _) = watch::channel(SyncStatus::Idle);
        SyncEngine {
            shared: Arc::new(Shared {
                remote,
                cache,
                doc: RwLock::new(seed),
                bus: EventBus::default(),
                status_tx,
                options,
            }),
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn the initial remote fetch and the change-feed loop. Call once.
    ///
    /// The feed subscription is established before this returns, so no
    /// notification delivered afterwards can be missed.
    pub fn start(&self) {
        let feed = self.shared.remote.subscribe();
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.push(tokio::spawn(Arc::clone(&self.shared).initial_fetch()));
        tasks.push(tokio::spawn(Arc::clone(&self.shared).feed_loop(feed)));
    }

    /// Snapshot of the current authoritative document.
    pub fn document(&self) -> NewsletterDocument {
        self.shared
            .doc
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Commit a full document (typically an editor draft).
    ///
    /// The in-memory document, the cache, and connected views are updated
    /// first and unconditionally; only then is the remote upsert attempted.
    /// A remote failure is returned to the caller for an explicit retry —
    /// the local state stays committed either way.
    pub async fn commit(&self, doc: NewsletterDocument) -> Result<(), CommitError> {
        let started = tokio::time::Instant::now();
        self.shared.status_tx.send_replace(SyncStatus::Syncing);

        {
            let mut current = self
                .shared
                .doc
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *current = doc.clone();
        }
        self.shared
            .persist_and_publish(doc.clone(), UpdateOrigin::LocalCommit);

        let result = self.shared.remote.upsert(&doc, Utc::now()).await;

        let elapsed = started.elapsed();
        if elapsed < self.shared.options.min_syncing_hold {
            tokio::time::sleep(self.shared.options.min_syncing_hold - elapsed).await;
        }

        match result {
            Ok(()) => {
                self.shared.status_tx.send_replace(SyncStatus::Idle);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(%err, "remote write failed; local state remains committed");
                self.shared.status_tx.send_replace(SyncStatus::Failed);
                Err(CommitError::Remote(err))
            }
        }
    }

    /// Subscribe to document change events. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<NewsletterEvent> {
        self.shared.bus.subscribe()
    }

    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    pub fn status(&self) -> SyncStatus {
        *self.shared.status_tx.borrow()
    }

    pub fn watch_status(&self) -> watch::Receiver<SyncStatus> {
        self.shared.status_tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.bus.subscriber_count()
    }

    /// Abort the background tasks. In-flight network operations complete
    /// and are discarded harmlessly.
    pub fn shutdown(&self) {
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SyncEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    /// Fetch the remote row, retrying transient failures with exponential
    /// backoff. Exhausting the attempts leaves the engine on its seeded
    /// document — degraded freshness, silently.
    async fn initial_fetch(self: Arc<Self>) {
        let mut attempt: u32 = 0;
        loop {
            match self.remote.fetch().await {
                Ok(Some(payload)) => {
                    self.apply_remote(&payload);
                    return;
                }
                Ok(None) => {
                    tracing::info!("no remote document yet, keeping local seed");
                    return;
                }
                Err(err) => {
                    attempt += 1;
                    if attempt >= self.options.retry.max_attempts {
                        tracing::warn!(
                            %err,
                            attempts = attempt,
                            "giving up on initial fetch, continuing on local document"
                        );
                        return;
                    }
                    let delay = self.options.retry.delay_for_attempt(attempt - 1);
                    tracing::debug!(%err, ?delay, "initial fetch failed, retrying");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    /// Apply change-feed notifications to the current document for as long
    /// as the feed stays open.
    async fn feed_loop(self: Arc<Self>, mut feed: mpsc::Receiver<Value>) {
        while let Some(payload) = feed.recv().await {
            self.apply_remote(&payload);
        }
        tracing::debug!("change feed closed");
    }

    /// Merge a remote payload field-by-field onto the current in-memory
    /// document, then write the result through to the cache and publish it.
    fn apply_remote(&self, payload: &Value) {
        let patch = DocumentPatch::from_value(payload);
        if patch.is_empty() {
            tracing::debug!("remote payload carried no usable fields");
            return;
        }
        let snapshot = {
            let mut doc = self.doc.write().unwrap_or_else(PoisonError::into_inner);
            patch.apply(&mut doc);
            doc.clone()
        };
        self.persist_and_publish(snapshot, UpdateOrigin::RemoteSync);
    }

    fn persist_and_publish(&self, snapshot: NewsletterDocument, origin: UpdateOrigin) {
        self.write_cache(&snapshot);
        self.bus.publish(NewsletterEvent::Updated(DocumentUpdated {
            document: snapshot,
            updated_at: Utc::now(),
            origin,
        }));
    }

    fn write_cache(&self, doc: &NewsletterDocument) {
        match serde_json::to_string(doc) {
            Ok(raw) => {
                if let Err(err) = self.cache.set(CACHE_KEY, &raw) {
                    tracing::warn!(%err, "could not write local cache");
                }
            }
            Err(err) => tracing::warn!(%err, "document does not serialize for caching"),
        }
    }
}
