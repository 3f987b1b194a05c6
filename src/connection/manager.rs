//! Connection manager owning the single active transport

use crate::config::ConnectionConfig;
use crate::transport::{
    EventSink, SendError, TaggedEvent, Transport, TransportEvent, TransportFactory,
};
use bytes::Bytes;
use pulse300_shared::{
    ConnectionStatus, Protocol, StatusEvent, StatusTracker, StatusUpdate, TransitionResult,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Receives status transitions as they happen
pub trait StatusReporter: Send + Sync {
    fn update_status(&self, status: ConnectionStatus, message: Option<&str>);
}

/// Reporter that writes transitions to the log
#[derive(Debug, Default)]
pub struct LogStatusReporter;

impl StatusReporter for LogStatusReporter {
    fn update_status(&self, status: ConnectionStatus, message: Option<&str>) {
        match message {
            Some(message) => info!("Status: {} ({})", status, message),
            None => info!("Status: {}", status),
        }
    }
}

/// What happened to a command handed to [`ConnectionManager::send_command`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Written (TCP) or handed to the socket (UDP)
    Sent,
    /// TCP socket not connected, command dropped
    NotConnected,
    /// No transport configured, command dropped
    NoTransport,
    /// Transport already shut down, command dropped
    Closed,
}

/// Owns at most one transport and tracks its status
pub struct ConnectionManager {
    config: ConnectionConfig,
    factory: Arc<dyn TransportFactory>,
    reporter: Arc<dyn StatusReporter>,
    transport: Option<Box<dyn Transport>>,
    /// Bumped on every teardown so late events from old transports are dropped
    generation: u64,
    tracker: StatusTracker,
    event_tx: mpsc::UnboundedSender<TaggedEvent>,
    event_rx: mpsc::UnboundedReceiver<TaggedEvent>,
}

impl ConnectionManager {
    /// Create a manager with no transport
    pub fn new(factory: Arc<dyn TransportFactory>, reporter: Arc<dyn StatusReporter>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            config: ConnectionConfig::default(),
            factory,
            reporter,
            transport: None,
            generation: 0,
            tracker: StatusTracker::new(),
            event_tx,
            event_rx,
        }
    }

    /// Current status, `None` before the first connect or after destroy
    pub fn status(&self) -> Option<ConnectionStatus> {
        self.tracker.status()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.tracker.message()
    }

    #[cfg(test)]
    pub fn has_transport(&self) -> bool {
        self.transport.is_some()
    }

    /// Destroy the current transport and build a new one for `config`
    pub async fn connect(&mut self, config: ConnectionConfig) {
        self.destroy().await;
        self.config = config;

        // Connecting is reported even when there is nothing to connect to
        self.transition(StatusEvent::TransportCreated);

        let Some(host) = self.config.host.clone() else {
            debug!("No target host configured, staying idle");
            return;
        };

        info!(
            "Opening {} transport to {}:{}",
            self.config.protocol, host, self.config.port
        );
        let events = EventSink::new(self.generation, self.event_tx.clone());
        let transport = self.factory.create(
            self.config.protocol,
            &host,
            self.config.port,
            events,
        );
        debug!("{} transport created", transport.protocol());
        self.transport = Some(transport);
    }

    /// Destroy the current transport, if any
    pub async fn destroy(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            transport.destroy().await;
        }
        self.generation += 1;
        self.tracker.reset();
    }

    /// Hand a command to the active transport without waiting for delivery
    pub fn send_command(&self, payload: Bytes) -> SendOutcome {
        let host = self.config.host.as_deref().unwrap_or_default();
        let text = String::from_utf8_lossy(&payload);

        match self.config.protocol {
            Protocol::Tcp => {
                debug!("Sending TCP: {} to {}", text, host);
                match &self.transport {
                    Some(transport) if transport.is_connected() => write(transport.as_ref(), payload),
                    _ => {
                        warn!("Socket not connected");
                        SendOutcome::NotConnected
                    }
                }
            }
            Protocol::Udp => match &self.transport {
                Some(transport) => {
                    debug!("Sending UDP: {} to {}", text, host);
                    write(transport.as_ref(), payload)
                }
                None => SendOutcome::NoTransport,
            },
        }
    }

    /// Wait for the next transport event and apply it
    ///
    /// Returns the status update it caused, if any. Cancel safe.
    pub async fn process_next_event(&mut self) -> Option<StatusUpdate> {
        let (generation, event) = self.event_rx.recv().await?;
        self.handle_event(generation, event)
    }

    /// Apply every event already queued
    #[cfg(test)]
    pub fn drain_events(&mut self) -> Vec<StatusUpdate> {
        let mut updates = Vec::new();
        while let Ok((generation, event)) = self.event_rx.try_recv() {
            if let Some(update) = self.handle_event(generation, event) {
                updates.push(update);
            }
        }
        updates
    }

    /// Apply one transport event
    pub fn handle_event(&mut self, generation: u64, event: TransportEvent) -> Option<StatusUpdate> {
        if generation != self.generation || self.transport.is_none() {
            debug!("Dropping event from destroyed transport: {:?}", event);
            return None;
        }

        let status_event = match event {
            TransportEvent::Connected => {
                info!("Connected");
                StatusEvent::Connected
            }
            TransportEvent::Data(data) => match self.config.protocol {
                Protocol::Udp => StatusEvent::DatagramReceived,
                Protocol::Tcp => {
                    debug!("Ignoring {} bytes from device", data.len());
                    return None;
                }
            },
            TransportEvent::Error(message) => {
                error!("Network error: {}", message);
                StatusEvent::Failed { message }
            }
        };

        self.transition(status_event)
    }

    fn transition(&mut self, event: StatusEvent) -> Option<StatusUpdate> {
        match self.tracker.process_event(event) {
            TransitionResult::Changed(update) => {
                self.reporter
                    .update_status(update.status, update.message.as_deref());
                Some(update)
            }
            TransitionResult::Unchanged => None,
            TransitionResult::Invalid { from, event } => {
                warn!("Ignoring {:?} while status is {:?}", event, from);
                None
            }
        }
    }
}

fn write(transport: &dyn Transport, payload: Bytes) -> SendOutcome {
    match transport.send(payload) {
        Ok(()) => SendOutcome::Sent,
        Err(SendError::NotConnected) => {
            warn!("Socket not connected");
            SendOutcome::NotConnected
        }
        Err(SendError::Closed) => {
            warn!("Transport closed, command dropped");
            SendOutcome::Closed
        }
    }
}
