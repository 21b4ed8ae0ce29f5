//! REST client for the hosted document table (PostgREST-style endpoints,
//! as exposed by the usual backend-as-a-service vendors).
//!
//! The change feed is implemented by polling the row's `updatedAt` stamp:
//! the first observation primes the watermark, every later advance emits
//! the row's `data`. Duplicate delivery is acceptable — the consumer's
//! merge is idempotent.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use gazette_core::document::model::NewsletterDocument;

use super::{RemoteStore, StoreError};

#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Service base URL, without the `/rest/v1` suffix.
    pub base_url: String,
    pub api_key: String,
    pub table: String,
    /// Fixed logical identity of the single document row.
    pub document_id: String,
    pub poll_interval: Duration,
}

impl RestStoreConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        RestStoreConfig {
            base_url: base_url.into(),
            api_key: api_key.into(),
            table: "newsletter".to_string(),
            document_id: "main".to_string(),
            poll_interval: Duration::from_secs(5),
        }
    }
}

/// The single newsletter row as stored remotely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRow {
    id: String,
    data: Value,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RestRemoteStore {
    http: reqwest::Client,
    config: RestStoreConfig,
}

impl RestRemoteStore {
    pub fn new(config: RestStoreConfig) -> Self {
        RestRemoteStore {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.base_url, self.config.table)
    }

    async fn fetch_row(&self) -> Result<Option<DocumentRow>, StoreError> {
        let response = self
            .http
            .get(self.table_url())
            .query(&[
                ("id", format!("eq.{}", self.config.document_id)),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let mut rows: Vec<DocumentRow> = response.json().await?;
        Ok(rows.pop())
    }
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn fetch(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.fetch_row().await?.map(|row| row.data))
    }

    async fn upsert(
        &self,
        doc: &NewsletterDocument,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let row = DocumentRow {
            id: self.config.document_id.clone(),
            data: serde_json::to_value(doc)?,
            updated_at,
        };

        let response = self
            .http
            .post(self.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[row])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    fn subscribe(&self) -> mpsc::Receiver<Value> {
        let (tx, rx) = mpsc::channel(16);
        let store = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(store.config.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last_seen: Option<DateTime<Utc>> = None;

            loop {
                interval.tick().await;
                if tx.is_closed() {
                    break;
                }
                match store.fetch_row().await {
                    Ok(Some(row)) => match last_seen {
                        None => last_seen = Some(row.updated_at),
                        Some(seen) if row.updated_at > seen => {
                            last_seen = Some(row.updated_at);
                            if tx.send(row.data).await.is_err() {
                                break;
                            }
                        }
                        _ => {}
                    },
                    Ok(None) => {}
                    Err(err) => {
                        tracing::debug!(%err, "change feed poll failed");
                    }
                }
            }
            tracing::debug!("change feed poll loop stopped");
        });
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> RestRemoteStore {
        RestRemoteStore::new(RestStoreConfig {
            poll_interval: Duration::from_millis(10),
            ..RestStoreConfig::new(server.uri(), "test-key")
        })
    }

    fn row_json(data: Value, updated_at: &str) -> Value {
        json!([{ "id": "main", "data": data, "updatedAt": updated_at }])
    }

    #[tokio::test]
    async fn fetch_returns_the_row_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter"))
            .and(query_param("id", "eq.main"))
            .and(header("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row_json(
                json!({ "sections": [], "widgetEnabled": true }),
                "2026-01-01T00:00:00Z",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let payload = store_for(&server).fetch().await.unwrap().unwrap();
        assert_eq!(payload["widgetEnabled"], true);
    }

    #[tokio::test]
    async fn fetch_of_a_missing_row_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(store_for(&server).fetch().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_surfaces_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = store_for(&server).fetch().await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UnexpectedStatus { status: 503, .. }
        ));
    }

    #[tokio::test]
    async fn upsert_posts_the_row_with_merge_preference() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/newsletter"))
            .and(header("Prefer", "resolution=merge-duplicates"))
            .and(header("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server)
            .upsert(&NewsletterDocument::default(), Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscribe_emits_only_when_the_row_advances() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row_json(
                json!({ "widgetEnabled": true }),
                "2026-01-01T00:00:00Z",
            )))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let mut feed = store.subscribe();

        // Let several polls observe the unchanged row: the first primes the
        // watermark, the rest must stay silent.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(feed.try_recv().is_err());

        server.reset().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/newsletter"))
            .respond_with(ResponseTemplate::new(200).set_body_json(row_json(
                json!({ "widgetEnabled": false }),
                "2026-01-02T00:00:00Z",
            )))
            .mount(&server)
            .await;

        let payload = tokio::time::timeout(Duration::from_secs(2), feed.recv())
            .await
            .expect("poll loop should emit the advanced row")
            .expect("feed should stay open");
        assert_eq!(payload["widgetEnabled"], false);
    }
}
