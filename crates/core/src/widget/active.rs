//! Time-window filtering for promotional cards.
//!
//! Pure functions of `(cards, now)`: callers re-run them on document change
//! and on a coarse periodic tick, so cards roll in and out as their windows
//! open and close without a document write.

use chrono::{DateTime, Utc};

use crate::document::model::WidgetCard;

/// A card is eligible iff its manual switch is on and `now` falls inside
/// its `[startTime, endTime]` window (inclusive on both ends).
pub fn is_card_active(card: &WidgetCard, now: DateTime<Utc>) -> bool {
    card.is_active && card.start_time <= now && now <= card.end_time
}

/// The active subset, in document order.
pub fn active_cards(cards: &[WidgetCard], now: DateTime<Utc>) -> Vec<&WidgetCard> {
    cards.iter().filter(|card| is_card_active(card, now)).collect()
}
