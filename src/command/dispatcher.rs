//! Command dispatcher - turns action requests into switcher commands

use bytes::Bytes;
use pulse300_shared::{codec, ActionId, Command, ProtocolError};
use std::collections::HashMap;
use tracing::debug;

/// Option values of an action request, keyed by option id
pub type ActionOptions = HashMap<String, String>;

/// Builds commands for actions; owns the freeze toggle
#[derive(Debug, Default)]
pub struct CommandDispatcher {
    frozen: bool,
}

impl CommandDispatcher {
    /// Create a dispatcher with all inputs unfrozen
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the last freeze action froze the inputs
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Build the command for `action`; toggles the freeze flag on `Freeze`
    pub fn build(&mut self, action: ActionId, options: &ActionOptions) -> Command {
        let command = match action {
            ActionId::Take => Command::Take,
            ActionId::Freeze => {
                self.frozen = !self.frozen;
                Command::Freeze {
                    frozen: self.frozen,
                }
            }
            ActionId::Input => Command::Input {
                layer: option_value(action, options, "layer"),
                input: option_value(action, options, "input"),
            },
            ActionId::BackgroundFrame => Command::BackgroundFrame {
                frame: option_value(action, options, "frame"),
            },
            ActionId::UserPreset => Command::RecallPreset {
                preset: option_value(action, options, "preset"),
            },
        };

        debug!("Action {} -> {:?}", action, command);
        command
    }

    /// Resolve an action id and options to the bytes to send
    pub fn dispatch(
        &mut self,
        action_id: &str,
        options: &ActionOptions,
    ) -> Result<Bytes, ProtocolError> {
        let action: ActionId = action_id.parse()?;
        let command = self.build(action, options);
        Ok(codec::encode(&command))
    }
}

/// Option code as given, or the schema default when absent
fn option_value(action: ActionId, options: &ActionOptions, id: &str) -> String {
    match options.get(id) {
        Some(raw) => raw.clone(),
        None => action
            .option(id)
            .map(|spec| spec.default.to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse300_shared::choices::{FRAMES, INPUTS, LAYERS, PRESETS};

    fn options(pairs: &[(&str, &str)]) -> ActionOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn dispatch_text(dispatcher: &mut CommandDispatcher, id: &str, pairs: &[(&str, &str)]) -> String {
        let bytes = dispatcher.dispatch(id, &options(pairs)).unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_input_example() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(
            dispatch_text(&mut dispatcher, "in", &[("layer", "2"), ("input", "5")]),
            "1,2,5IN\r\n1,2,5IN"
        );
    }

    #[test]
    fn test_preset_example() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(
            dispatch_text(&mut dispatcher, "ps", &[("preset", "4")]),
            "4Nf \r\n 1Nt1Nc\r\n4Nf \r\n 1Nt1Nc"
        );
    }

    #[test]
    fn test_take() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(dispatch_text(&mut dispatcher, "take", &[]), "1TK \r\n 1TK");
    }

    #[test]
    fn test_every_legal_combination() {
        let mut dispatcher = CommandDispatcher::new();

        for layer in LAYERS {
            for input in INPUTS {
                let (l, i) = (layer.id.to_string(), input.id.to_string());
                let single = format!("1,{},{}IN", l, i);
                assert_eq!(
                    dispatch_text(&mut dispatcher, "in", &[("layer", l.as_str()), ("input", i.as_str())]),
                    format!("{}\r\n{}", single, single)
                );
            }
        }

        for frame in FRAMES {
            let f = frame.id.to_string();
            let single = format!("1,0,{}IN", f);
            assert_eq!(
                dispatch_text(&mut dispatcher, "fr", &[("frame", f.as_str())]),
                format!("{}\r\n{}", single, single)
            );
        }

        for preset in PRESETS {
            let p = preset.id.to_string();
            let single = format!("{}Nf \r\n 1Nt1Nc", p);
            assert_eq!(
                dispatch_text(&mut dispatcher, "ps", &[("preset", p.as_str())]),
                format!("{}\r\n{}", single, single)
            );
        }
    }

    #[test]
    fn test_freeze_toggles_pairwise() {
        let mut dispatcher = CommandDispatcher::new();
        assert!(!dispatcher.is_frozen());

        let first = dispatch_text(&mut dispatcher, "freeze", &[]);
        assert!(dispatcher.is_frozen());
        assert!(first.starts_with("0,1Sf \r\n 0,1Sf \r\n"));

        let second = dispatch_text(&mut dispatcher, "freeze", &[]);
        assert!(!dispatcher.is_frozen());
        assert!(second.starts_with("0,0Sf \r\n 0,0Sf \r\n"));
        assert_eq!(second, codec::encode_to_string(&Command::Freeze { frozen: false }));
    }

    #[test]
    fn test_freeze_state_is_per_dispatcher() {
        let mut a = CommandDispatcher::new();
        let mut b = CommandDispatcher::new();

        a.build(ActionId::Freeze, &ActionOptions::new());
        assert!(a.is_frozen());
        assert!(!b.is_frozen());

        let cmd = b.build(ActionId::Freeze, &ActionOptions::new());
        assert_eq!(cmd, Command::Freeze { frozen: true });
    }

    #[test]
    fn test_missing_options_use_defaults() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(
            dispatcher.build(ActionId::Input, &ActionOptions::new()),
            Command::Input {
                layer: "2".into(),
                input: "0".into()
            }
        );
        assert_eq!(
            dispatcher.build(ActionId::UserPreset, &ActionOptions::new()),
            Command::RecallPreset { preset: "3".into() }
        );
        assert_eq!(
            dispatcher.build(ActionId::BackgroundFrame, &ActionOptions::new()),
            Command::BackgroundFrame { frame: "0".into() }
        );
    }

    #[test]
    fn test_out_of_range_is_not_checked() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(
            dispatch_text(&mut dispatcher, "fr", &[("frame", "9")]),
            "1,0,9IN\r\n1,0,9IN"
        );
    }

    #[test]
    fn test_option_text_is_sent_verbatim() {
        let mut dispatcher = CommandDispatcher::new();
        assert_eq!(
            dispatch_text(&mut dispatcher, "fr", &[("frame", "05")]),
            "1,0,05IN\r\n1,0,05IN"
        );
        assert_eq!(
            dispatch_text(&mut dispatcher, "fr", &[("frame", "-1")]),
            "1,0,-1IN\r\n1,0,-1IN"
        );
        assert_eq!(
            dispatch_text(&mut dispatcher, "in", &[("layer", "bg"), ("input", "1")]),
            "1,bg,1IN\r\n1,bg,1IN"
        );
    }

    #[test]
    fn test_unknown_action_rejected() {
        let mut dispatcher = CommandDispatcher::new();
        assert!(matches!(
            dispatcher.dispatch("cut", &ActionOptions::new()),
            Err(ProtocolError::UnknownAction(_))
        ));
        assert!(!dispatcher.is_frozen());
    }
}
