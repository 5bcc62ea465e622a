//! Canvas tools.

use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Click, drag, resize and marquee-select elements.
    #[default]
    Select,
    /// Pan the viewport; pointer gestures leave elements alone.
    Hand,
}

impl ToolKind {
    pub const ALL: [ToolKind; 2] = [ToolKind::Select, ToolKind::Hand];

    /// Whether pointer gestures on the canvas edit elements.
    pub fn edits_elements(self) -> bool {
        self == ToolKind::Select
    }

    /// Single-key shortcut for the tool.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Select => 'v',
            ToolKind::Hand => 'h',
        }
    }
}
