use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use gazette_core::document::model::{WidgetCard, WidgetConfig};
use gazette_core::widget::active::active_cards;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/widget", get(widget_view))
}

/// What an open widget should show right now: the enable gate, resolved
/// chrome, and only the cards whose time window covers this instant.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WidgetView {
    enabled: bool,
    config: WidgetConfig,
    cards: Vec<WidgetCard>,
}

async fn widget_view(State(state): State<AppState>) -> Json<WidgetView> {
    let doc = state.engine().document();
    let cards = active_cards(&doc.widget_cards, Utc::now())
        .into_iter()
        .cloned()
        .collect();
    Json(WidgetView {
        enabled: doc.widget_enabled,
        config: doc.widget_config_or_default(),
        cards,
    })
}
