//! UpdatePoller - pulls inbound events and hands them to the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::ports::UpdateSource;

use super::dispatcher::Dispatcher;

/// Configuration for the poll loop.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Pause after a failed poll before trying again.
    pub error_backoff: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            error_backoff: Duration::from_secs(5),
        }
    }
}

/// Long-running loop feeding inbound events to per-chat workers.
pub struct UpdatePoller {
    source: Arc<dyn UpdateSource>,
    dispatcher: Dispatcher,
    config: PollerConfig,
}

impl UpdatePoller {
    pub fn new(source: Arc<dyn UpdateSource>, dispatcher: Dispatcher) -> Self {
        Self::with_config(source, dispatcher, PollerConfig::default())
    }

    pub fn with_config(
        source: Arc<dyn UpdateSource>,
        dispatcher: Dispatcher,
        config: PollerConfig,
    ) -> Self {
        Self {
            source,
            dispatcher,
            config,
        }
    }

    /// Polls until `shutdown` flips to true, then drains in-flight work.
    ///
    /// A poll in progress when shutdown arrives is abandoned; the transport
    /// redelivers anything it had not yet confirmed.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!("Update poller started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }

                batch = self.source.next_batch() => match batch {
                    Ok(events) => {
                        if !events.is_empty() {
                            tracing::debug!(count = events.len(), "Received updates");
                        }
                        for event in events {
                            self.dispatcher.dispatch(event);
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            backoff_ms = self.config.error_backoff.as_millis() as u64,
                            "Polling for updates failed"
                        );
                        time::sleep(self.config.error_backoff).await;
                    }
                },
            }
        }

        tracing::info!("Update poller stopping");
        self.dispatcher.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{
        MockBarcodeDecoder, MockCalendar, MockMessaging, MockProductCatalog, MockTextRecognizer,
        MockUpdateSource,
    };
    use crate::application::engine::{ConversationEngine, EngineCollaborators, EngineSettings};
    use crate::application::{ProductResolver, ReminderScheduler};
    use crate::domain::conversation::{EventKind, InboundEvent};
    use crate::domain::foundation::{AccessList, ActorId, ChatId};
    use crate::ports::MessagingError;

    fn dispatcher(messaging: &MockMessaging) -> Dispatcher {
        let timeout = Duration::from_secs(1);
        let engine = ConversationEngine::new(
            EngineCollaborators {
                messaging: Arc::new(messaging.clone()),
                recognizer: Arc::new(MockTextRecognizer::new()),
                decoder: Arc::new(MockBarcodeDecoder::new()),
                products: ProductResolver::new(Arc::new(MockProductCatalog::new()), timeout),
                scheduler: ReminderScheduler::new(
                    Arc::new(MockCalendar::new()),
                    "primary",
                    chrono_tz::Europe::Madrid,
                    timeout,
                ),
            },
            AccessList::new([ActorId::new(1)]),
            EngineSettings::default(),
        );
        Dispatcher::new(Arc::new(engine), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn delivers_batches_and_survives_poll_errors() {
        let messaging = MockMessaging::new();
        let source = MockUpdateSource::new()
            .with_error(MessagingError::network("connection reset"))
            .with_batch(vec![InboundEvent::new(
                ChatId::new(5),
                ActorId::new(1),
                EventKind::Start,
            )]);
        let poller = UpdatePoller::with_config(
            Arc::new(source.clone()),
            dispatcher(&messaging),
            PollerConfig {
                error_backoff: Duration::from_millis(5),
            },
        );

        let (tx, rx) = watch::channel(false);
        let running = tokio::spawn(poller.run(rx));

        for _ in 0..100 {
            if !messaging.sent().is_empty() {
                break;
            }
            time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(true).unwrap();
        running.await.unwrap();

        assert_eq!(source.pending(), 0);
        assert_eq!(messaging.texts_for(ChatId::new(5)).len(), 1);
    }

    #[tokio::test]
    async fn stops_when_shutdown_already_requested() {
        let messaging = MockMessaging::new();
        let source = MockUpdateSource::new().with_batch(vec![InboundEvent::new(
            ChatId::new(5),
            ActorId::new(1),
            EventKind::Start,
        )]);
        let poller = UpdatePoller::new(Arc::new(source.clone()), dispatcher(&messaging));

        let (_tx, rx) = watch::channel(true);
        poller.run(rx).await;

        assert_eq!(source.pending(), 1);
        assert!(messaging.sent().is_empty());
    }
}
