//! Preset buttons offered to the host

use pulse300_shared::choices::{self, Choice};
use pulse300_shared::ActionId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Pack an RGB triple the way the host expects colours
pub const fn combine_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

const WHITE: u32 = combine_rgb(255, 255, 255);
const BLACK: u32 = combine_rgb(0, 0, 0);
const GREEN: u32 = combine_rgb(0, 204, 0);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonStyle {
    pub text: String,
    pub size: String,
    pub color: u32,
    pub bgcolor: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStep {
    pub action_id: String,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonStep {
    pub down: Vec<ActionStep>,
    pub up: Vec<ActionStep>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PresetDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub name: String,
    pub style: ButtonStyle,
    pub steps: Vec<ButtonStep>,
    pub feedbacks: Vec<String>,
}

fn button(
    id: String,
    category: &str,
    name: &str,
    style: ButtonStyle,
    action: ActionId,
    options: &[(&str, String)],
) -> PresetDefinition {
    PresetDefinition {
        id,
        kind: "button".into(),
        category: category.into(),
        name: name.into(),
        style,
        steps: vec![ButtonStep {
            down: vec![ActionStep {
                action_id: action.as_str().into(),
                options: options
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            }],
            up: Vec::new(),
        }],
        feedbacks: Vec::new(),
    }
}

fn program_style(text: &str) -> ButtonStyle {
    ButtonStyle {
        text: text.into(),
        size: "18".into(),
        color: WHITE,
        bgcolor: GREEN,
    }
}

fn choice_style(choice: &Choice) -> ButtonStyle {
    ButtonStyle {
        text: choice.text.into(),
        size: "14".into(),
        color: WHITE,
        bgcolor: BLACK,
    }
}

/// All preset buttons in host order
pub fn preset_definitions() -> Vec<PresetDefinition> {
    let mut presets = Vec::new();

    for action in [ActionId::Take, ActionId::Freeze] {
        presets.push(button(
            action.as_str().into(),
            "Program",
            action.name(),
            program_style(action.name()),
            action,
            &[],
        ));
    }

    // Inputs always route to the background layer
    for input in choices::INPUTS {
        presets.push(button(
            format!("input_{}", input.id),
            "Inputs",
            input.label,
            choice_style(input),
            ActionId::Input,
            &[("layer", "2".into()), ("input", input.id.to_string())],
        ));
    }

    for frame in choices::FRAMES {
        presets.push(button(
            format!("frame_{}", frame.id),
            "Frames",
            frame.label,
            choice_style(frame),
            ActionId::BackgroundFrame,
            &[("frame", frame.id.to_string())],
        ));
    }

    for preset in choices::PRESETS {
        presets.push(button(
            format!("preset_{}", preset.id),
            "Presets",
            preset.label,
            choice_style(preset),
            ActionId::UserPreset,
            &[("preset", preset.id.to_string())],
        ));
    }

    presets
}
