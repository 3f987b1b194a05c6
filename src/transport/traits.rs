//! Transport trait abstraction for the TCP and UDP control links

use async_trait::async_trait;
use bytes::Bytes;
use pulse300_shared::Protocol;
use thiserror::Error;
use tokio::sync::mpsc;

/// Events a transport reports back to its owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Stream established (TCP only)
    Connected,
    /// Bytes arrived from the device
    Data(Bytes),
    /// Network error, the message is shown to the operator
    Error(String),
}

/// An event tagged with the generation of the transport that raised it
pub type TaggedEvent = (u64, TransportEvent);

/// Errors returned by [`Transport::send`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    #[error("Socket not connected")]
    NotConnected,

    #[error("Transport closed")]
    Closed,
}

/// Channel end a transport raises its events on
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl EventSink {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { generation, tx }
    }

    /// Raise an event; dropped silently once the owner is gone
    pub fn emit(&self, event: TransportEvent) {
        let _ = self.tx.send((self.generation, event));
    }
}

/// A live link to the device
#[async_trait]
pub trait Transport: Send {
    /// Which protocol this transport speaks
    fn protocol(&self) -> Protocol;

    /// Whether a send would reach the socket right now
    fn is_connected(&self) -> bool;

    /// Queue a payload for immediate transmission
    fn send(&self, payload: Bytes) -> Result<(), SendError>;

    /// Tear the transport down and release its socket
    async fn destroy(&mut self);
}

/// Factory for creating transports
pub trait TransportFactory: Send + Sync {
    /// Create a transport to `host:port`; connecting happens in the background
    fn create(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        events: EventSink,
    ) -> Box<dyn Transport>;
}
