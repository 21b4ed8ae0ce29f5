pub mod file_cache;
pub mod memory;
pub mod rest;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::mpsc;

use gazette_core::document::model::NewsletterDocument;

/// Fixed key under which the document is mirrored in the local cache.
pub const CACHE_KEY: &str = "gazette_newsletter_data";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote store answered {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("payload does not encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cache i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-device key-value persistence, read eagerly at startup for instant
/// first paint. A value that cannot be read is indistinguishable from a
/// value that was never written.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// The hosted single-row document store, consumed at its interface
/// boundary only.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// The current document payload, or `Ok(None)` when no row exists yet.
    async fn fetch(&self) -> Result<Option<Value>, StoreError>;

    /// Create-or-replace the single row.
    async fn upsert(
        &self,
        doc: &NewsletterDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Live change notifications for the row. Delivery may duplicate;
    /// consumers merge idempotently. Dropping the receiver unsubscribes.
    fn subscribe(&self) -> mpsc::Receiver<Value>;
}
