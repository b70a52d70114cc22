//! Per-channel message queues.
//!
//! Each Discord channel gets its own worker task so messages from one channel
//! are handled in arrival order, while a slow gear check in one channel does
//! not hold up alerts in another.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::bridge::platform::ChatPlatform;
use crate::bridge::Bridge;
use crate::common::IncomingMessage;

/// A message together with the platform handle to answer it on.
struct QueuedMessage {
    platform: Arc<dyn ChatPlatform>,
    message: IncomingMessage,
}

/// Dispatches messages to lazily spawned per-channel workers.
pub struct ChannelQueues {
    bridge: Arc<Bridge>,
    workers: HashMap<u64, mpsc::UnboundedSender<QueuedMessage>>,
}

impl ChannelQueues {
    pub fn new(bridge: Arc<Bridge>) -> Self {
        Self {
            bridge,
            workers: HashMap::new(),
        }
    }

    /// Queue `message` behind earlier messages from the same channel.
    pub fn dispatch(&mut self, platform: Arc<dyn ChatPlatform>, message: IncomingMessage) {
        let channel_id = message.channel_id;
        let mut queued = QueuedMessage { platform, message };

        if let Some(worker) = self.workers.get(&channel_id) {
            match worker.send(queued) {
                Ok(()) => return,
                Err(mpsc::error::SendError(returned)) => {
                    warn!("Worker for channel {} stopped, restarting it", channel_id);
                    queued = returned;
                }
            }
        }

        let worker = self.spawn_worker(channel_id);
        if worker.send(queued).is_err() {
            warn!("Dropping message for channel {}: worker unavailable", channel_id);
            return;
        }
        self.workers.insert(channel_id, worker);
    }

    /// Number of channels with a running worker.
    #[cfg(test)]
    pub fn active_channels(&self) -> usize {
        self.workers.len()
    }

    fn spawn_worker(&self, channel_id: u64) -> mpsc::UnboundedSender<QueuedMessage> {
        let (tx, mut rx) = mpsc::unbounded_channel::<QueuedMessage>();
        let bridge = Arc::clone(&self.bridge);
        debug!("Starting message worker for channel {}", channel_id);

        tokio::spawn(async move {
            while let Some(queued) = rx.recv().await {
                bridge
                    .handle_message(queued.platform.as_ref(), &queued.message)
                    .await;
            }
            debug!("Message worker for channel {} ended", channel_id);
        });

        tx
    }
}
