mod command;
mod config;
mod connection;
mod console;
mod definitions;
mod instance;
mod transport;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::{ConfigError, ModuleConfig};
use connection::{LogStatusReporter, SendOutcome};
use console::ConsoleCommand;
use instance::Pulse300Instance;
use pulse300_shared::Protocol;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use transport::SocketTransportFactory;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "pulse300-control", version, about = "Drive an Analog Way Pulse 300 over TCP or UDP")]
struct Cli {
    /// Target IP of the switcher
    #[arg(long, value_parser = parse_host)]
    host: Option<String>,

    /// Transport used to reach the switcher
    #[arg(long = "protocol", short = 'p', default_value = "tcp")]
    protocol: Protocol,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Commands {
    /// Connect and read actions from stdin (default)
    Run,
    /// Print the action definitions as JSON
    Actions,
    /// Print the preset button definitions as JSON
    Presets,
    /// Print the configuration form as JSON
    ConfigFields,
}

fn parse_host(value: &str) -> Result<String, ConfigError> {
    if config::is_valid_host(value) {
        Ok(value.to_string())
    } else {
        Err(ConfigError::InvalidHost(value.to_string()))
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so JSON dumps stay clean on stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Actions => print_json(&definitions::action_definitions()),
        Commands::Presets => print_json(&definitions::preset_definitions()),
        Commands::ConfigFields => print_json(&definitions::config_fields()),
        Commands::Run => run(ModuleConfig::new(cli.host, cli.protocol)).await,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(config: ModuleConfig) -> Result<()> {
    let mut instance = Pulse300Instance::new(
        Arc::new(SocketTransportFactory),
        Arc::new(LogStatusReporter),
    );
    instance.init(config).await;
    info!("Type 'help' for the list of actions");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) => {
                        if !handle_line(&mut instance, &line).await {
                            break;
                        }
                    }
                    None => break,
                }
            }

            _ = instance.process_next_event() => {}

            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    instance.destroy().await;
    Ok(())
}

/// Handle one console line; returns false when the operator quits
async fn handle_line(instance: &mut Pulse300Instance, line: &str) -> bool {
    let command = match console::parse_line(line) {
        Ok(command) => command,
        Err(e) => {
            warn!("{}", e);
            return true;
        }
    };

    match command {
        ConsoleCommand::Action { id, options } => {
            if let Some(SendOutcome::NoTransport) = instance.run_action(&id, &options) {
                warn!("No target host configured, use 'config host=<ip>'");
            }
        }
        ConsoleCommand::Configure(pairs) => {
            let pairs = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
            match instance.config().with_overrides(pairs) {
                Ok(config) => instance.config_updated(config).await,
                Err(e) => error!("{}", e),
            }
        }
        ConsoleCommand::Status => info!("{}", instance.status_line()),
        ConsoleCommand::Help => println!("{}", console::HELP),
        ConsoleCommand::Quit => return false,
        ConsoleCommand::Empty => {}
    }

    true
}
