//! ASCII command encoding
//!
//! The switcher takes plain-text commands separated by CR LF. Every command
//! this client emits is sent twice in the same write:
//!
//! ```text
//! 1,2,5IN\r\n1,2,5IN
//! ```
//!
//! Some commands separate the copies with a space-padded CR LF instead. The
//! exact separators are part of the wire contract and must not be normalised.

use bytes::Bytes;

use crate::choices;
use crate::command::Command;

/// Plain line separator
pub const CRLF: &str = "\r\n";

/// Line separator with a space on either side
pub const PADDED_CRLF: &str = " \r\n ";

/// Emit `template` twice, joined by `separator`
pub fn doubled(template: &str, separator: &str) -> String {
    let mut out = String::with_capacity(template.len() * 2 + separator.len());
    out.push_str(template);
    out.push_str(separator);
    out.push_str(template);
    out
}

/// Render a command as the exact text sent to the device
pub fn encode_to_string(command: &Command) -> String {
    match command {
        Command::Take => doubled("1TK", PADDED_CRLF),
        Command::Freeze { frozen } => {
            let state = u8::from(*frozen);
            let mut out = String::new();
            for id in choices::input_ids() {
                out.push_str(&doubled(&format!("{id},{state}Sf"), PADDED_CRLF));
                out.push_str(" \r\n");
            }
            out
        }
        Command::Input { layer, input } => doubled(&format!("1,{layer},{input}IN"), CRLF),
        Command::BackgroundFrame { frame } => doubled(&format!("1,0,{frame}IN"), CRLF),
        Command::RecallPreset { preset } => {
            doubled(&format!("{preset}Nf{PADDED_CRLF}1Nt1Nc"), CRLF)
        }
    }
}

/// Encode a command into the bytes written to the socket
pub fn encode(command: &Command) -> Bytes {
    Bytes::from(encode_to_string(command))
}

/// Split received text into individual commands
///
/// Separators and surrounding spaces are dropped, empty fragments skipped.
pub fn split_commands(text: &str) -> Vec<&str> {
    text.split(CRLF)
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .collect()
}
