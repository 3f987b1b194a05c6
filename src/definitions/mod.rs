//! Static tables the host registers: actions, preset buttons, config form

mod actions;
mod config_fields;
mod presets;

pub use actions::action_definitions;
pub use config_fields::config_fields;
pub use presets::preset_definitions;
