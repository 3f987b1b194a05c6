//! Connection management for the switcher control link
//!
//! This module handles:
//! - Owning exactly one TCP or UDP transport at a time
//! - Tearing the transport down and rebuilding it on reconfiguration
//! - Tracking and reporting connection status

mod manager;

pub use manager::{ConnectionManager, LogStatusReporter, SendOutcome, StatusReporter};
