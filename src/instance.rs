//! Module instance: lifecycle hooks and action entry point

use crate::command::{ActionOptions, CommandDispatcher};
use crate::config::ModuleConfig;
use crate::connection::{ConnectionManager, SendOutcome, StatusReporter};
use crate::transport::TransportFactory;
use pulse300_shared::{ConnectionStatus, StatusUpdate};
use std::sync::Arc;
use tracing::{error, info};

/// One controlled Pulse 300
pub struct Pulse300Instance {
    config: ModuleConfig,
    dispatcher: CommandDispatcher,
    connection: ConnectionManager,
}

impl Pulse300Instance {
    pub fn new(factory: Arc<dyn TransportFactory>, reporter: Arc<dyn StatusReporter>) -> Self {
        Self {
            config: ModuleConfig::default(),
            dispatcher: CommandDispatcher::new(),
            connection: ConnectionManager::new(factory, reporter),
        }
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    pub fn status(&self) -> Option<ConnectionStatus> {
        self.connection.status()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.connection.status_message()
    }

    pub fn is_frozen(&self) -> bool {
        self.dispatcher.is_frozen()
    }

    /// One-line summary for the operator console
    pub fn status_line(&self) -> String {
        let status = match (self.status(), self.status_message()) {
            (Some(status), Some(message)) => format!("{} ({})", status, message),
            (Some(status), None) => status.to_string(),
            (None, _) => "no transport".to_string(),
        };
        let inputs = if self.is_frozen() { "frozen" } else { "live" };
        format!("Status: {}, inputs {}", status, inputs)
    }

    /// Apply the initial configuration and open the connection
    pub async fn init(&mut self, config: ModuleConfig) {
        info!(
            "Initializing Pulse 300 control ({}, {})",
            config.target_host().unwrap_or("no host"),
            config.protocol
        );
        self.config = config;
        self.connection.connect(self.config.connection()).await;
    }

    /// Replace the configuration, rebuilding the transport
    pub async fn config_updated(&mut self, config: ModuleConfig) {
        info!(
            "Configuration updated ({}, {})",
            config.target_host().unwrap_or("no host"),
            config.protocol
        );
        self.config = config;
        self.connection.connect(self.config.connection()).await;
    }

    /// Release the transport
    pub async fn destroy(&mut self) {
        self.connection.destroy().await;
        info!("Pulse 300 control stopped");
    }

    /// Run an action by id; failures are logged, never raised
    pub fn run_action(&mut self, action_id: &str, options: &ActionOptions) -> Option<SendOutcome> {
        match self.dispatcher.dispatch(action_id, options) {
            Ok(payload) => Some(self.connection.send_command(payload)),
            Err(e) => {
                error!("Action '{}' failed: {}", action_id, e);
                None
            }
        }
    }

    /// Wait for the next transport event and apply it
    pub async fn process_next_event(&mut self) -> Option<StatusUpdate> {
        self.connection.process_next_event().await
    }
}
