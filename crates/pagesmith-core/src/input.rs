//! Keyboard input and the editor shortcuts it maps to.

use crate::tools::ToolKind;
use serde::{Deserialize, Serialize};

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Shift only.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Ctrl only.
    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(char),
}

impl Key {
    /// Parse a DOM-style key name (`"Delete"`, `"Escape"`, `"z"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Delete" => Some(Key::Delete),
            "Backspace" => Some(Key::Backspace),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Key::Character(c.to_ascii_lowercase())),
                    _ => None,
                }
            }
        }
    }
}

/// A key press with the modifiers held at the time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// The editor command this press triggers, if any.
    pub fn shortcut(&self) -> Option<Shortcut> {
        let command = self.modifiers.command();
        match self.key {
            Key::Delete | Key::Backspace => Some(Shortcut::DeleteSelection),
            Key::Escape => Some(Shortcut::ShowPanels),
            Key::Character('z') if command && self.modifiers.shift => Some(Shortcut::Redo),
            Key::Character('z') if command => Some(Shortcut::Undo),
            Key::Character('y') if self.modifiers.ctrl => Some(Shortcut::Redo),
            Key::Character('d') if command => Some(Shortcut::Duplicate),
            Key::Character('g') if command => Some(Shortcut::Group),
            Key::Character('a') if command => Some(Shortcut::SelectAll),
            Key::Character(c) if !command && !self.modifiers.alt => ToolKind::ALL
                .into_iter()
                .find(|tool| tool.shortcut() == c)
                .map(Shortcut::Tool),
            _ => None,
        }
    }
}

/// Editor commands reachable from the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shortcut {
    DeleteSelection,
    /// Restore hidden editing panels.
    ShowPanels,
    Undo,
    Redo,
    Duplicate,
    Group,
    SelectAll,
    Tool(ToolKind),
}
