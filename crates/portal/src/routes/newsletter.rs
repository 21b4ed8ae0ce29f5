use std::convert::Infallible;

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{extract::State, routing::get, Json, Router};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast;

use gazette_core::document::model::NewsletterDocument;
use gazette_core::events::types::NewsletterEvent;

use crate::state::AppState;

/// Guest-facing document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/newsletter", get(current_document))
        .route("/api/newsletter/listen", get(listen))
}

/// The current authoritative document, straight from the sync engine.
async fn current_document(State(state): State<AppState>) -> Json<NewsletterDocument> {
    Json(state.engine().document())
}

/// Server-sent change feed: a `welcome` handshake, then `updated` /
/// `widgetRoster` events for as long as the client stays connected. A
/// client that lags behind the broadcast buffer gets a `reconnect` nudge
/// and should refetch the document.
async fn listen(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.engine().subscribe();

    let welcome = stream::once(async { sse_event(&NewsletterEvent::Welcome) });
    let updates = stream::unfold(receiver, |mut receiver| async move {
        match receiver.recv().await {
            Ok(event) => Some((sse_event(&event), receiver)),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::debug!(skipped, "listener lagged, nudging it to resync");
                Some((sse_event(&NewsletterEvent::Reconnect), receiver))
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    });

    Sse::new(welcome.chain(updates)).keep_alive(KeepAlive::default())
}

fn sse_event(event: &NewsletterEvent) -> Result<Event, Infallible> {
    let name = match event {
        NewsletterEvent::Welcome => "welcome",
        NewsletterEvent::Updated(_) => "updated",
        NewsletterEvent::WidgetRoster(_) => "widgetRoster",
        NewsletterEvent::Reconnect => "reconnect",
    };
    match Event::default().event(name).json_data(event) {
        Ok(sse) => Ok(sse),
        Err(err) => {
            tracing::warn!(%err, "event does not serialize, sending name only");
            Ok(Event::default().event(name))
        }
    }
}
