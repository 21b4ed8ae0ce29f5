use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use gazette_core::events::types::{NewsletterEvent, WidgetRosterChanged};
use gazette_core::widget::active::active_cards;

use crate::state::AppState;

/// Periodically recompute the active widget roster and broadcast when it
/// changes, so cards roll in and out as their time windows open and close
/// without any document write. The first tick only primes the comparison;
/// connected clients already derived the current roster from the document.
pub fn spawn_widget_ticker(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_active: Option<Vec<String>> = None;

        loop {
            interval.tick().await;
            let doc = state.engine().document();
            let now = Utc::now();
            let active: Vec<String> = active_cards(&doc.widget_cards, now)
                .iter()
                .map(|card| card.id.clone())
                .collect();

            if last_active.as_ref() != Some(&active) {
                if last_active.is_some() {
                    tracing::debug!(count = active.len(), "widget roster changed");
                    state
                        .engine()
                        .bus()
                        .publish(NewsletterEvent::WidgetRoster(WidgetRosterChanged {
                            active_ids: active.clone(),
                            checked_at: now,
                        }));
                }
                last_active = Some(active);
            }
        }
    })
}
