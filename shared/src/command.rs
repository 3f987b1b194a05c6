//! Device commands and the actions that produce them

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::choices::{self, Choice};

/// Errors raised while turning an action request into a command
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Unknown protocol: {0} (expected tcp or udp)")]
    InvalidProtocol(String),
}

/// Schema of one dropdown option of an action
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub default: u32,
    pub choices: &'static [Choice],
}

const LAYER: OptionSpec = OptionSpec {
    id: "layer",
    label: "Layer",
    default: 2,
    choices: choices::LAYERS,
};

const INPUT: OptionSpec = OptionSpec {
    id: "input",
    label: "Input",
    default: 0,
    choices: choices::INPUTS,
};

const FRAME: OptionSpec = OptionSpec {
    id: "frame",
    label: "Frame",
    default: 0,
    choices: choices::FRAMES,
};

const PRESET: OptionSpec = OptionSpec {
    id: "preset",
    label: "Preset",
    default: 3,
    choices: choices::PRESETS,
};

/// Actions an operator can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    Take,
    Freeze,
    Input,
    BackgroundFrame,
    UserPreset,
}

impl ActionId {
    pub const ALL: [ActionId; 5] = [
        ActionId::Take,
        ActionId::Freeze,
        ActionId::Input,
        ActionId::BackgroundFrame,
        ActionId::UserPreset,
    ];

    /// Identifier the host uses for this action
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Take => "take",
            ActionId::Freeze => "freeze",
            ActionId::Input => "in",
            ActionId::BackgroundFrame => "fr",
            ActionId::UserPreset => "ps",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            ActionId::Take => "Take",
            ActionId::Freeze => "Freeze (All Inputs)",
            ActionId::Input => "Input",
            ActionId::BackgroundFrame => "Background Frame",
            ActionId::UserPreset => "User Preset",
        }
    }

    /// Options in the order the host presents them
    pub fn options(&self) -> &'static [OptionSpec] {
        match self {
            ActionId::Take | ActionId::Freeze => &[],
            ActionId::Input => &[LAYER, INPUT],
            ActionId::BackgroundFrame => &[FRAME],
            ActionId::UserPreset => &[PRESET],
        }
    }

    /// Find an option schema by id
    pub fn option(&self, id: &str) -> Option<&'static OptionSpec> {
        self.options().iter().find(|spec| spec.id == id)
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownAction(s.to_string()))
    }
}

/// A fully parameterised switcher command
///
/// Option codes are carried as the text the host supplied; the host
/// dropdowns are the only range check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Transition preview to program
    Take,
    /// Freeze (`frozen = true`) or unfreeze every input
    Freeze { frozen: bool },
    /// Route an input to a layer
    Input { layer: String, input: String },
    /// Select the background frame
    BackgroundFrame { frame: String },
    /// Load a user preset and take it
    RecallPreset { preset: String },
}
