use tokio::sync::broadcast;
use tracing::debug;

use super::events::MatchEvent;

/// Default capacity of the event channel. Scoring produces at most a few
/// events per delivery, so a lagging receiver indicates a stuck handler.
const CHANNEL_CAPACITY: usize = 256;

/// Event bus for distributing match events throughout the application
///
/// A single broadcast channel carries every event; subscribers filter by
/// match id or event type themselves.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<MatchEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Creates a new event bus with the default capacity
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Emits an event to all current subscribers
    pub async fn emit(&self, event: MatchEvent) {
        match self.sender.send(event) {
            Ok(receiver_count) => {
                debug!(receivers = receiver_count, "Match event emitted");
            }
            Err(error) => {
                debug!(
                    event_type = error.0.event_type(),
                    match_id = error.0.match_id(),
                    "Match event emitted with no receivers"
                );
            }
        }
    }

    /// Subscribe to all match events
    pub fn subscribe(&self) -> broadcast::Receiver<MatchEvent> {
        self.sender.subscribe()
    }
}
