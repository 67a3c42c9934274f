//! Dispatcher - one worker task per active chat.
//!
//! Events for a chat are queued to that chat's worker and handled in
//! arrival order; different chats run on different tasks. A worker that
//! sees no events for the idle period retires. A replacement worker for
//! the same chat waits for the retiring one to finish its queue first.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::conversation::InboundEvent;
use crate::domain::foundation::ChatId;

use super::engine::ConversationEngine;

struct Worker {
    tx: mpsc::UnboundedSender<InboundEvent>,
    handle: JoinHandle<()>,
}

/// Routes inbound events to per-chat workers.
pub struct Dispatcher {
    engine: Arc<ConversationEngine>,
    idle: Duration,
    workers: HashMap<ChatId, Worker>,
}

impl Dispatcher {
    pub fn new(engine: Arc<ConversationEngine>, idle: Duration) -> Self {
        Self {
            engine,
            idle,
            workers: HashMap::new(),
        }
    }

    /// Number of live workers.
    pub fn active_workers(&self) -> usize {
        self.workers
            .values()
            .filter(|w| !w.handle.is_finished())
            .count()
    }

    /// Queues `event` on its chat's worker, starting one if needed.
    pub fn dispatch(&mut self, event: InboundEvent) {
        self.workers.retain(|_, w| !w.handle.is_finished());

        let chat = event.chat;
        let event = match self.workers.get(&chat) {
            Some(worker) => match worker.tx.send(event) {
                Ok(()) => return,
                // Worker is retiring; its queue is closed.
                Err(mpsc::error::SendError(event)) => event,
            },
            None => event,
        };

        let previous = self.workers.remove(&chat).map(|w| w.handle);
        let worker = self.spawn_worker(chat, previous);
        if worker.tx.send(event).is_err() {
            tracing::error!(chat_id = chat.value(), "New chat worker rejected event");
        }
        self.workers.insert(chat, worker);
    }

    /// Stops accepting events and waits for every queued event to finish.
    pub async fn shutdown(mut self) {
        let handles: Vec<JoinHandle<()>> = self
            .workers
            .drain()
            .map(|(_, Worker { tx, handle })| {
                drop(tx);
                handle
            })
            .collect();
        tracing::info!(workers = handles.len(), "Draining chat workers");

        for result in join_all(handles).await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Chat worker panicked");
            }
        }
    }

    fn spawn_worker(&self, chat: ChatId, previous: Option<JoinHandle<()>>) -> Worker {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Arc::clone(&self.engine);
        let idle = self.idle;

        let handle = tokio::spawn(async move {
            if let Some(previous) = previous {
                if let Err(e) = previous.await {
                    tracing::error!(chat_id = chat.value(), error = %e, "Previous chat worker panicked");
                }
            }
            run_worker(engine, chat, rx, idle).await;
        });

        Worker { tx, handle }
    }
}

async fn run_worker(
    engine: Arc<ConversationEngine>,
    chat: ChatId,
    mut rx: mpsc::UnboundedReceiver<InboundEvent>,
    idle: Duration,
) {
    tracing::debug!(chat_id = chat.value(), "Chat worker started");
    loop {
        match tokio::time::timeout(idle, rx.recv()).await {
            Ok(Some(event)) => engine.handle(event).await,
            Ok(None) => break,
            Err(_) => {
                rx.close();
                while let Some(event) = rx.recv().await {
                    engine.handle(event).await;
                }
                break;
            }
        }
    }
    tracing::debug!(chat_id = chat.value(), "Chat worker retired");
}
