use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use super::{
    bus::EventBus,
    events::MatchEvent,
    handler::{EventError, MatchEventHandler},
};

/// Coordinates event distribution between the event bus and event handlers
///
/// The dispatcher listens for events from the EventBus, routes them to every
/// registered handler, and provides isolation between handlers: a slow or
/// failing scoreboard refresh never blocks the standings recompute.
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn MatchEventHandler>>,
    event_bus: EventBus,
    handler_timeout: Duration,
    max_retries: u32,
}

impl EventDispatcher {
    /// Create a new event dispatcher
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            handlers: Vec::new(),
            event_bus,
            handler_timeout: Duration::from_secs(5),
            max_retries: 3,
        }
    }

    /// Add an event handler to the dispatcher
    ///
    /// The handler will start receiving events once `start_listening` is called.
    pub fn add_handler(&mut self, handler: Arc<dyn MatchEventHandler>) {
        info!(handler_name = handler.name(), "Registering event handler");
        self.handlers.push(handler);
    }

    /// Set the timeout for individual handler execution
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = timeout;
        self
    }

    /// Set the maximum number of retries for failed handlers
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Start listening for events and dispatching them to handlers
    ///
    /// This spawns a background task that runs until the EventBus is dropped.
    pub async fn start_listening(self) {
        let handlers = self.handlers;
        let mut receiver = self.event_bus.subscribe();
        let handler_timeout = self.handler_timeout;
        let max_retries = self.max_retries;

        info!(
            handler_count = handlers.len(),
            timeout_secs = handler_timeout.as_secs(),
            max_retries = max_retries,
            "Starting event dispatcher"
        );

        tokio::spawn(async move {
            while let Ok(event) = receiver.recv().await {
                debug!(
                    event_type = event.event_type(),
                    match_id = event.match_id(),
                    "Dispatching event to {} handlers",
                    handlers.len()
                );

                // Process each handler independently
                for handler in &handlers {
                    let event = event.clone();
                    let handler = handler.clone();
                    let timeout_duration = handler_timeout;

                    // Spawn each handler in its own task for isolation
                    tokio::spawn(async move {
                        if let Err(e) =
                            Self::handle_with_retry(handler, event, timeout_duration, max_retries)
                                .await
                        {
                            error!(error = ?e, "Handler failed permanently");
                        }
                    });
                }
            }

            info!("Event dispatcher stopped listening");
        });
    }

    /// Handle an event with retry logic and timeout
    async fn handle_with_retry(
        handler: Arc<dyn MatchEventHandler>,
        event: MatchEvent,
        handler_timeout: Duration,
        max_retries: u32,
    ) -> Result<(), EventError> {
        let handler_name = handler.name();
        let event_type = event.event_type();
        let match_id = event.match_id().to_string();

        for attempt in 0..=max_retries {
            match timeout(handler_timeout, handler.handle(&event)).await {
                Ok(Ok(())) => {
                    if attempt > 0 {
                        info!(
                            handler = handler_name,
                            event_type = event_type,
                            match_id = %match_id,
                            attempt = attempt + 1,
                            "Handler succeeded after retry"
                        );
                    }
                    return Ok(());
                }
                Ok(Err(e)) if e.is_retryable() && attempt < max_retries => {
                    warn!(
                        handler = handler_name,
                        event_type = event_type,
                        match_id = %match_id,
                        attempt = attempt + 1,
                        error = ?e,
                        "Handler failed, will retry"
                    );

                    // Exponential backoff
                    let delay = Duration::from_millis(100 * 2_u64.pow(attempt));
                    tokio::time::sleep(delay).await;
                }
                Ok(Err(e)) => {
                    error!(
                        handler = handler_name,
                        event_type = event_type,
                        match_id = %match_id,
                        error = ?e,
                        "Handler failed with non-retryable error"
                    );
                    return Err(e);
                }
                Err(_) if attempt < max_retries => {
                    warn!(
                        handler = handler_name,
                        event_type = event_type,
                        match_id = %match_id,
                        attempt = attempt + 1,
                        "Handler timed out, will retry"
                    );
                }
                Err(_) => {
                    error!(
                        handler = handler_name,
                        event_type = event_type,
                        match_id = %match_id,
                        "Handler timed out permanently"
                    );
                    return Err(EventError::Timeout);
                }
            }
        }

        Err(EventError::Timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::models::MatchStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingHandler {
        calls: Arc<AtomicU32>,
        fail_first: bool,
    }

    #[async_trait]
    impl MatchEventHandler for CountingHandler {
        async fn handle(&self, _event: &MatchEvent) -> Result<(), EventError> {
            let previous = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && previous == 0 {
                return Err(EventError::retryable("transient"));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "CountingHandler"
        }
    }

    #[tokio::test]
    async fn dispatches_events_to_registered_handlers() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicU32::new(0));

        let mut dispatcher = EventDispatcher::new(bus.clone());
        dispatcher.add_handler(Arc::new(CountingHandler {
            calls: calls.clone(),
            fail_first: false,
        }));
        dispatcher.start_listening().await;

        bus.emit(MatchEvent::StatusChanged {
            match_id: "match-1".to_string(),
            status: MatchStatus::Ongoing,
        })
        .await;

        // Give the spawned handler tasks a moment to run.
        for _ in 0..50 {
            if calls.load(Ordering::SeqCst) > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_retryable_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let handler = Arc::new(CountingHandler {
            calls: calls.clone(),
            fail_first: true,
        });

        let event = MatchEvent::StatusChanged {
            match_id: "match-1".to_string(),
            status: MatchStatus::Completed,
        };

        EventDispatcher::handle_with_retry(handler, event, Duration::from_secs(1), 3)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
