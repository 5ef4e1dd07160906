//! The closed set of bindable palette actions.

use std::fmt;

use super::keys::{key_code, Modifiers};
use super::types::KeyboardShortcut;

/// Grouping used by the shortcut settings list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    /// Reachable while another app is focused
    Global,
    Navigation,
    Palette,
    QuickSlots,
}

/// Every action that can be bound to a shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShortcutAction {
    ShowPalette,
    NavigateUp,
    NavigateDown,
    ClosePalette,
    InsertPrompt,
    NewPrompt,
    QuickSlot1,
    QuickSlot2,
    QuickSlot3,
    QuickSlot4,
    QuickSlot5,
    QuickSlot6,
    QuickSlot7,
    QuickSlot8,
    QuickSlot9,
}

impl ShortcutAction {
    /// All actions in declaration order.
    pub const ALL: [ShortcutAction; 15] = [
        Self::ShowPalette,
        Self::NavigateUp,
        Self::NavigateDown,
        Self::ClosePalette,
        Self::InsertPrompt,
        Self::NewPrompt,
        Self::QuickSlot1,
        Self::QuickSlot2,
        Self::QuickSlot3,
        Self::QuickSlot4,
        Self::QuickSlot5,
        Self::QuickSlot6,
        Self::QuickSlot7,
        Self::QuickSlot8,
        Self::QuickSlot9,
    ];

    /// Stable identifier used as the persistence key.
    pub fn id(&self) -> &'static str {
        match self {
            Self::ShowPalette => "palette.show",
            Self::NavigateUp => "nav.up",
            Self::NavigateDown => "nav.down",
            Self::ClosePalette => "palette.close",
            Self::InsertPrompt => "palette.insert",
            Self::NewPrompt => "palette.new",
            Self::QuickSlot1 => "slot.1",
            Self::QuickSlot2 => "slot.2",
            Self::QuickSlot3 => "slot.3",
            Self::QuickSlot4 => "slot.4",
            Self::QuickSlot5 => "slot.5",
            Self::QuickSlot6 => "slot.6",
            Self::QuickSlot7 => "slot.7",
            Self::QuickSlot8 => "slot.8",
            Self::QuickSlot9 => "slot.9",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.id() == id)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ShowPalette => "Show Palette",
            Self::NavigateUp => "Move Selection Up",
            Self::NavigateDown => "Move Selection Down",
            Self::ClosePalette => "Close Palette",
            Self::InsertPrompt => "Insert Prompt",
            Self::NewPrompt => "New Prompt",
            Self::QuickSlot1 => "Quick Slot 1",
            Self::QuickSlot2 => "Quick Slot 2",
            Self::QuickSlot3 => "Quick Slot 3",
            Self::QuickSlot4 => "Quick Slot 4",
            Self::QuickSlot5 => "Quick Slot 5",
            Self::QuickSlot6 => "Quick Slot 6",
            Self::QuickSlot7 => "Quick Slot 7",
            Self::QuickSlot8 => "Quick Slot 8",
            Self::QuickSlot9 => "Quick Slot 9",
        }
    }

    pub fn category(&self) -> ShortcutCategory {
        match self {
            Self::ShowPalette => ShortcutCategory::Global,
            Self::NavigateUp | Self::NavigateDown | Self::ClosePalette => {
                ShortcutCategory::Navigation
            }
            Self::InsertPrompt | Self::NewPrompt => ShortcutCategory::Palette,
            Self::QuickSlot1
            | Self::QuickSlot2
            | Self::QuickSlot3
            | Self::QuickSlot4
            | Self::QuickSlot5
            | Self::QuickSlot6
            | Self::QuickSlot7
            | Self::QuickSlot8
            | Self::QuickSlot9 => ShortcutCategory::QuickSlots,
        }
    }

    /// Global actions fire while other apps are focused, so a bare key
    /// would swallow normal typing.
    pub fn requires_modifier(&self) -> bool {
        self.category() == ShortcutCategory::Global
    }

    /// Slot number for quick slot actions.
    pub fn quick_slot(&self) -> Option<u8> {
        match self {
            Self::QuickSlot1 => Some(1),
            Self::QuickSlot2 => Some(2),
            Self::QuickSlot3 => Some(3),
            Self::QuickSlot4 => Some(4),
            Self::QuickSlot5 => Some(5),
            Self::QuickSlot6 => Some(6),
            Self::QuickSlot7 => Some(7),
            Self::QuickSlot8 => Some(8),
            Self::QuickSlot9 => Some(9),
            _ => None,
        }
    }

    pub fn for_quick_slot(slot: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.quick_slot() == Some(slot))
    }

    pub fn default_shortcut(&self) -> KeyboardShortcut {
        match self {
            Self::ShowPalette => KeyboardShortcut::new(key_code::PERIOD, Modifiers::COMMAND),
            Self::NavigateUp => KeyboardShortcut::bare(key_code::UP_ARROW),
            Self::NavigateDown => KeyboardShortcut::bare(key_code::DOWN_ARROW),
            Self::ClosePalette => KeyboardShortcut::bare(key_code::ESCAPE),
            Self::InsertPrompt => KeyboardShortcut::bare(key_code::RETURN),
            Self::NewPrompt => KeyboardShortcut::new(key_code::N, Modifiers::COMMAND),
            Self::QuickSlot1 => KeyboardShortcut::bare(key_code::DIGIT_1),
            Self::QuickSlot2 => KeyboardShortcut::bare(key_code::DIGIT_2),
            Self::QuickSlot3 => KeyboardShortcut::bare(key_code::DIGIT_3),
            Self::QuickSlot4 => KeyboardShortcut::bare(key_code::DIGIT_4),
            Self::QuickSlot5 => KeyboardShortcut::bare(key_code::DIGIT_5),
            Self::QuickSlot6 => KeyboardShortcut::bare(key_code::DIGIT_6),
            Self::QuickSlot7 => KeyboardShortcut::bare(key_code::DIGIT_7),
            Self::QuickSlot8 => KeyboardShortcut::bare(key_code::DIGIT_8),
            Self::QuickSlot9 => KeyboardShortcut::bare(key_code::DIGIT_9),
        }
    }
}

impl fmt::Display for ShortcutAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
