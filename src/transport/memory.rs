//! In-memory transport for exercising the connection layer without sockets

use crate::transport::traits::{EventSink, SendError, Transport, TransportEvent, TransportFactory};
use async_trait::async_trait;
use bytes::Bytes;
use pulse300_shared::Protocol;
use std::sync::{Arc, Mutex};

/// What happened to the transports a [`MemoryFactory`] handed out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Created { protocol: Protocol, address: String },
    Destroyed { address: String },
}

#[derive(Debug, Default)]
struct Shared {
    lifecycle: Vec<Lifecycle>,
    alive: usize,
    max_alive: usize,
    written: Vec<Bytes>,
    connected: bool,
    sinks: Vec<EventSink>,
}

/// Factory recording every transport it creates
#[derive(Debug, Clone, Default)]
pub struct MemoryFactory {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark transports as connected (or not) for `is_connected`
    pub fn set_connected(&self, connected: bool) {
        self.shared.lock().unwrap().connected = connected;
    }

    /// Raise an event from the most recently created transport
    pub fn emit_latest(&self, event: TransportEvent) {
        let shared = self.shared.lock().unwrap();
        shared.sinks.last().expect("no transport created").emit(event);
    }

    /// Raise an event from the transport created `index`-th
    pub fn emit_from(&self, index: usize, event: TransportEvent) {
        self.shared.lock().unwrap().sinks[index].emit(event);
    }

    pub fn lifecycle(&self) -> Vec<Lifecycle> {
        self.shared.lock().unwrap().lifecycle.clone()
    }

    pub fn alive(&self) -> usize {
        self.shared.lock().unwrap().alive
    }

    /// Highest number of transports ever alive at once
    pub fn max_alive(&self) -> usize {
        self.shared.lock().unwrap().max_alive
    }

    /// Payloads written by any transport
    pub fn written(&self) -> Vec<Bytes> {
        self.shared.lock().unwrap().written.clone()
    }
}

impl TransportFactory for MemoryFactory {
    fn create(
        &self,
        protocol: Protocol,
        host: &str,
        port: u16,
        events: EventSink,
    ) -> Box<dyn Transport> {
        let address = format!("{}:{}", host, port);
        let mut shared = self.shared.lock().unwrap();
        shared.lifecycle.push(Lifecycle::Created {
            protocol,
            address: address.clone(),
        });
        shared.alive += 1;
        shared.max_alive = shared.max_alive.max(shared.alive);
        shared.sinks.push(events);

        Box::new(MemoryTransport {
            protocol,
            address,
            destroyed: false,
            shared: self.shared.clone(),
        })
    }
}

struct MemoryTransport {
    protocol: Protocol,
    address: String,
    destroyed: bool,
    shared: Arc<Mutex<Shared>>,
}

#[async_trait]
impl Transport for MemoryTransport {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn is_connected(&self) -> bool {
        !self.destroyed && self.shared.lock().unwrap().connected
    }

    fn send(&self, payload: Bytes) -> Result<(), SendError> {
        if self.destroyed {
            return Err(SendError::Closed);
        }
        if self.protocol == Protocol::Tcp && !self.is_connected() {
            return Err(SendError::NotConnected);
        }
        self.shared.lock().unwrap().written.push(payload);
        Ok(())
    }

    async fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        let mut shared = self.shared.lock().unwrap();
        shared.alive -= 1;
        shared.lifecycle.push(Lifecycle::Destroyed {
            address: self.address.clone(),
        });
    }
}
