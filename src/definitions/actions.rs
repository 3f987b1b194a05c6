//! Action definitions offered to the host

use pulse300_shared::choices::Choice;
use pulse300_shared::{ActionId, OptionSpec};
use serde::Serialize;

/// A dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceDefinition {
    pub id: String,
    pub label: String,
}

impl From<&Choice> for ChoiceDefinition {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id.to_string(),
            label: choice.label.to_string(),
        }
    }
}

/// An action option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OptionDefinition {
    Dropdown {
        label: String,
        id: String,
        default: String,
        choices: Vec<ChoiceDefinition>,
    },
}

impl From<&OptionSpec> for OptionDefinition {
    fn from(spec: &OptionSpec) -> Self {
        OptionDefinition::Dropdown {
            label: spec.label.to_string(),
            id: spec.id.to_string(),
            default: spec.default.to_string(),
            choices: spec.choices.iter().map(ChoiceDefinition::from).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    pub id: String,
    pub name: String,
    pub options: Vec<OptionDefinition>,
}

/// Every action in host order
pub fn action_definitions() -> Vec<ActionDefinition> {
    ActionId::ALL
        .iter()
        .map(|action| ActionDefinition {
            id: action.as_str().to_string(),
            name: action.name().to_string(),
            options: action.options().iter().map(OptionDefinition::from).collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_ids_and_names() {
        let actions = action_definitions();
        let ids: Vec<&str> = actions.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["take", "freeze", "in", "fr", "ps"]);
        assert_eq!(actions[1].name, "Freeze (All Inputs)");
        assert_eq!(actions[3].name, "Background Frame");
    }

    #[test]
    fn test_input_action_schema() {
        let actions = action_definitions();
        let input = &actions[2];
        assert_eq!(input.options.len(), 2);

        let OptionDefinition::Dropdown { id, default, choices, .. } = &input.options[1];
        assert_eq!(id, "input");
        assert_eq!(default, "0");
        assert_eq!(choices.len(), 11);
        assert_eq!(choices[7], ChoiceDefinition { id: "9".into(), label: "DVI 1".into() });
    }

    #[test]
    fn test_serializes_as_dropdown() {
        let actions = action_definitions();
        let json = serde_json::to_value(&actions[4]).unwrap();
        assert_eq!(json["id"], "ps");
        assert_eq!(json["options"][0]["type"], "dropdown");
        assert_eq!(json["options"][0]["default"], "3");
        assert_eq!(json["options"][0]["choices"][0]["label"], "Preset 1");
    }
}
