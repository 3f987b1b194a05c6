//! Pulse 300 Shared Protocol Types
//!
//! This crate provides the choice tables, typed commands, wire encoder and
//! connection status state machine shared by the control client and the
//! device simulator.

pub mod choices;
pub mod codec;
pub mod command;
pub mod state_machine;

use std::fmt;
use std::str::FromStr;

pub use command::{ActionId, Command, OptionSpec, ProtocolError};
pub use state_machine::{ConnectionStatus, StatusEvent, StatusTracker, StatusUpdate, TransitionResult};

/// Port the Pulse 300 listens on for both TCP and UDP control
pub const DEVICE_PORT: u16 = 10500;

/// Network protocol used to reach the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl Protocol {
    /// Identifier used in configuration (`tcp` / `udp`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            other => Err(ProtocolError::InvalidProtocol(other.to_string())),
        }
    }
}
