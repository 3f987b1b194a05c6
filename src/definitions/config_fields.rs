//! Configuration form offered to the host

use crate::config::IP_PATTERN;
use pulse300_shared::Protocol;
use serde::Serialize;

use super::actions::ChoiceDefinition;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConfigField {
    Textinput {
        id: String,
        label: String,
        width: u8,
        regex: String,
    },
    Dropdown {
        id: String,
        label: String,
        default: String,
        choices: Vec<ChoiceDefinition>,
    },
}

pub fn config_fields() -> Vec<ConfigField> {
    vec![
        ConfigField::Textinput {
            id: "host".into(),
            label: "Target IP".into(),
            width: 6,
            regex: format!("/{}/", IP_PATTERN),
        },
        ConfigField::Dropdown {
            id: "prot".into(),
            label: "Connect with TCP / UDP".into(),
            default: Protocol::default().as_str().into(),
            choices: [Protocol::Udp, Protocol::Tcp]
                .iter()
                .map(|p| ChoiceDefinition {
                    id: p.as_str().into(),
                    label: p.to_string(),
                })
                .collect(),
        },
    ]
}
