use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::Command;

/// Key identity as reported by the keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Other,
}

/// One key press with its modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    fn is_char(&self, expected: char) -> bool {
        matches!(self.key, Key::Char(c) if c.eq_ignore_ascii_case(&expected))
    }
}

/// Maps a shortcut onto an engine command.
///
/// `Ctrl/Cmd+Z` undoes, `Ctrl/Cmd+Shift+Z` and `Ctrl/Cmd+Y` redo, and
/// `Backspace`/`Delete` remove the selected clip when there is one.
pub fn command_for_key(press: &KeyPress, has_selection: bool) -> Option<Command> {
    let command_modifier = press.ctrl || press.meta;

    if command_modifier && press.is_char('z') && !press.shift {
        return Some(Command::Undo);
    }
    if command_modifier && (press.is_char('y') || (press.is_char('z') && press.shift)) {
        return Some(Command::Redo);
    }
    if matches!(press.key, Key::Backspace | Key::Delete) && has_selection {
        return Some(Command::DeleteSelected);
    }
    None
}

/// Parses chords such as `ctrl+z`, `cmd+shift+z` or `delete`.
impl FromStr for KeyPress {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut press = KeyPress::new(Key::Other);
        let mut key = None;

        for part in value.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => press.ctrl = true,
                "cmd" | "meta" | "super" => press.meta = true,
                "shift" => press.shift = true,
                "backspace" => key = Some(Key::Backspace),
                "delete" | "del" => key = Some(Key::Delete),
                other => {
                    let mut chars = other.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => key = Some(Key::Char(c)),
                        _ => return Err(format!("unknown key: {part}")),
                    }
                }
            }
        }

        press.key = key.ok_or_else(|| format!("missing key in chord: {value}"))?;
        Ok(press)
    }
}
