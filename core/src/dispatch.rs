/// Fire-and-forget message delivery
///
/// The widget pushes payloads onto an unbounded channel synchronously;
/// a drain task POSTs them one at a time. At-most-once: a failed send
/// is logged and dropped, never retried, and never blocks later sends.
use crate::api::ApiClient;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Fully-formed outbound payload handed over by the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub sender_id: String,
    pub recipient_id: String,
    pub body: String,
}

#[derive(Clone)]
pub struct DeliveryDispatcher {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl DeliveryDispatcher {
    /// Spawn the drain task that delivers via the given client
    pub fn spawn(client: ApiClient) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<OutboundMessage>();

        tokio::spawn(async move {
            while let Some(msg) = rx.recv().await {
                match client.send_message(&msg).await {
                    Ok(()) => debug!("Delivered message to {}", msg.recipient_id),
                    Err(e) => warn!("Failed to deliver message to {}: {}", msg.recipient_id, e),
                }
            }
        });

        Self { tx }
    }

    /// Dispatcher without a drain task; the caller owns the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Hand off a payload; never blocks, never reports back to the caller
    pub fn dispatch(&self, msg: OutboundMessage) {
        if self.tx.send(msg).is_err() {
            warn!("Delivery channel closed, dropping outbound message");
        }
    }
}
