use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::model::NewsletterDocument;

/// Events published after document or roster changes, consumed by SSE
/// listeners and any other connected view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NewsletterEvent {
    Welcome,
    Updated(DocumentUpdated),
    WidgetRoster(WidgetRosterChanged),
    Reconnect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdated {
    pub document: NewsletterDocument,
    pub updated_at: DateTime<Utc>,
    pub origin: UpdateOrigin,
}

/// Where a document update came from: this process's own commit, or the
/// remote change feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UpdateOrigin {
    LocalCommit,
    RemoteSync,
}

/// The set of currently active widget cards changed without a document
/// write (a card's time window opened or closed).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRosterChanged {
    pub active_ids: Vec<String>,
    pub checked_at: DateTime<Utc>,
}
