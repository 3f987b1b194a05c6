//! Line-oriented operator console standing in for the control surface

use crate::command::ActionOptions;
use anyhow::{anyhow, Result};

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Run an action: `in layer=2 input=5`
    Action { id: String, options: ActionOptions },
    /// Reconfigure: `config host=10.0.0.5 prot=udp`
    Configure(Vec<(String, String)>),
    /// Print the current status
    Status,
    /// Print the accepted syntax
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
actions:  take | freeze | in layer=<2|3> input=<id> | fr frame=<0-6> | ps preset=<3-6>
other:    config host=<ip> prot=<tcp|udp> | status | help | quit";

fn parse_pairs<'a>(words: impl Iterator<Item = &'a str>) -> Result<Vec<(String, String)>> {
    words
        .map(|word| {
            word.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| anyhow!("Expected key=value, got '{}'", word))
        })
        .collect()
}

/// Parse one line of operator input
pub fn parse_line(line: &str) -> Result<ConsoleCommand> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ConsoleCommand::Empty);
    };

    match head {
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        "status" => Ok(ConsoleCommand::Status),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "config" => Ok(ConsoleCommand::Configure(parse_pairs(words)?)),
        id => Ok(ConsoleCommand::Action {
            id: id.to_string(),
            options: parse_pairs(words)?.into_iter().collect(),
        }),
    }
}
