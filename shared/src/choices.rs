//! Enumerated option values offered for each action
//!
//! Every option the switcher accepts is an integer code. The tables keep the
//! device order, which is also the order the freeze command walks the inputs.

/// One selectable value of an action option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    /// Integer code sent on the wire
    pub id: u32,
    /// Label shown in option dropdowns
    pub label: &'static str,
    /// Short text used on preset buttons (`\n` is a literal line-break marker)
    pub text: &'static str,
}

const fn choice(id: u32, label: &'static str, text: &'static str) -> Choice {
    Choice { id, label, text }
}

pub const INPUTS: &[Choice] = &[
    choice(0, "No Input", "Black\\nLOGO"),
    choice(1, "Input 1", "In 1"),
    choice(2, "Input 2", "In 2"),
    choice(3, "Input 3", "In 3"),
    choice(4, "Input 4", "In 4"),
    choice(5, "Input 5", "In 5"),
    choice(6, "Input 6", "In 6"),
    choice(9, "DVI 1", "DVI 1"),
    choice(10, "DVI 2", "DVI 2"),
    choice(11, "SDI 1", "SDI 1"),
    choice(12, "SDI 2", "SDI 2"),
];

pub const LAYERS: &[Choice] = &[
    choice(2, "BG Live", "Bkgnd Live"),
    choice(3, "PiP 1 (BG Live 2 in Matrix)", "PiP 1/BG Live 2"),
];

pub const FRAMES: &[Choice] = &[
    choice(0, "No Frame", "No\\nFrame"),
    choice(1, "Frame 1", "Fr 1"),
    choice(2, "Frame 2", "Fr 2"),
    choice(3, "Frame 3", "Fr 3"),
    choice(4, "Frame 4", "Fr 4"),
    choice(5, "Frame 5", "Fr 5"),
    choice(6, "Frame 6", "Fr 6"),
];

// User preset slots start at memory 3 on the device
pub const PRESETS: &[Choice] = &[
    choice(3, "Preset 1", "Preset\\n1"),
    choice(4, "Preset 2", "Preset\\n2"),
    choice(5, "Preset 3", "Preset\\n3"),
    choice(6, "Preset 4", "Preset\\n4"),
];

/// Input codes in device order
pub fn input_ids() -> impl Iterator<Item = u32> {
    INPUTS.iter().map(|c| c.id)
}
