//! Connection Status State Machine
//!
//! Tracks the status of the single active transport. A transport always starts
//! in `Connecting`; `Ok` and `ConnectionFailure` are only reachable after that.

use std::fmt;

/// Status reported to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Ok,
    ConnectionFailure,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connecting => write!(f, "Connecting"),
            ConnectionStatus::Ok => write!(f, "OK"),
            ConnectionStatus::ConnectionFailure => write!(f, "Connection failure"),
        }
    }
}

/// Events that can trigger status transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusEvent {
    /// A new transport was created
    TransportCreated,
    /// TCP stream established
    Connected,
    /// Any UDP datagram arrived from the device
    DatagramReceived,
    /// Network error on the active transport
    Failed { message: String },
}

/// A status change to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: ConnectionStatus,
    pub message: Option<String>,
}

/// Result of a status transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Status (or its message) changed and must be reported
    Changed(StatusUpdate),
    /// Event accepted but nothing observable changed
    Unchanged,
    /// Event not valid without a transport in `Connecting` first
    Invalid {
        from: Option<ConnectionStatus>,
        event: StatusEvent,
    },
}

/// Status of the active transport, `None` while no transport exists
#[derive(Debug, Default)]
pub struct StatusTracker {
    current: Option<ConnectionStatus>,
    message: Option<String>,
}

impl StatusTracker {
    /// Create a tracker with no transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Current status, if a transport exists
    pub fn status(&self) -> Option<ConnectionStatus> {
        self.current
    }

    /// Message attached to the current status
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Forget the transport (it was destroyed)
    pub fn reset(&mut self) {
        self.current = None;
        self.message = None;
    }

    /// Process an event and return the transition result
    pub fn process_event(&mut self, event: StatusEvent) -> TransitionResult {
        if self.current.is_none() && event != StatusEvent::TransportCreated {
            return TransitionResult::Invalid { from: None, event };
        }

        let (next, message) = match &event {
            StatusEvent::TransportCreated => (ConnectionStatus::Connecting, None),
            StatusEvent::Connected | StatusEvent::DatagramReceived => (ConnectionStatus::Ok, None),
            StatusEvent::Failed { message } => {
                (ConnectionStatus::ConnectionFailure, Some(message.clone()))
            }
        };

        let unchanged = self.current == Some(next) && self.message == message;
        // A new transport always re-announces Connecting
        if unchanged && event != StatusEvent::TransportCreated {
            return TransitionResult::Unchanged;
        }

        self.current = Some(next);
        self.message = message.clone();
        TransitionResult::Changed(StatusUpdate {
            status: next,
            message,
        })
    }
}
