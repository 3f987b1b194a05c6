//! Module configuration: target address and transport choice

use once_cell::sync::Lazy;
use pulse300_shared::{Protocol, DEVICE_PORT};
use regex::Regex;
use thiserror::Error;

/// Dotted-quad IPv4 pattern offered to the host for the address field
pub const IP_PATTERN: &str = r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$";

static IP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(IP_PATTERN).expect("IP pattern is valid"));

/// Errors in operator supplied configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid target IP: {0}")]
    InvalidHost(String),

    #[error("Invalid protocol: {0}")]
    InvalidProtocol(String),

    #[error("Unknown config key: {0}")]
    UnknownKey(String),
}

/// Check an address against the IPv4 pattern
pub fn is_valid_host(host: &str) -> bool {
    IP_REGEX.is_match(host)
}

/// Operator facing configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Target IP, no transport is created while unset
    pub host: Option<String>,
    /// Transport used to reach the device
    pub protocol: Protocol,
}

impl ModuleConfig {
    pub fn new(host: Option<String>, protocol: Protocol) -> Self {
        Self { host, protocol }
    }

    /// Validate the address field
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.host.as_deref() {
            Some(host) if !is_valid_host(host) => Err(ConfigError::InvalidHost(host.to_string())),
            _ => Ok(()),
        }
    }

    /// Target host, treating an empty field as unset
    pub fn target_host(&self) -> Option<&str> {
        self.host.as_deref().filter(|host| !host.is_empty())
    }

    /// Apply `key=value` overrides (`host`, `prot`) and validate the result
    pub fn with_overrides<'a, I>(&self, pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut updated = self.clone();
        for (key, value) in pairs {
            match key {
                "host" => {
                    updated.host = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
                "prot" | "protocol" => {
                    updated.protocol = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidProtocol(value.to_string()))?;
                }
                other => return Err(ConfigError::UnknownKey(other.to_string())),
            }
        }
        updated.validate()?;
        Ok(updated)
    }

    /// Connection parameters derived from this configuration
    pub fn connection(&self) -> ConnectionConfig {
        ConnectionConfig {
            host: self.target_host().map(str::to_string),
            protocol: self.protocol,
            ..Default::default()
        }
    }
}

/// Parameters the connection manager builds a transport from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub protocol: Protocol,
    /// Device control port
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: None,
            protocol: Protocol::Tcp,
            port: DEVICE_PORT,
        }
    }
}
