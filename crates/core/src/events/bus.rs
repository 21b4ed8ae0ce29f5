use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::NewsletterEvent;

/// In-process event bus backed by `tokio::broadcast`, fanning document
/// changes out to every connected view. Publishing with nobody listening
/// is normal (a guest page may not be open); it is not an error.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: Arc<broadcast::Sender<NewsletterEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Publish an event; returns how many subscribers received it (zero
    /// when nobody is listening).
    pub fn publish(&self, event: NewsletterEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to the event stream. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<NewsletterEvent> {
        self.sender.subscribe()
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
