//! Keyboard shortcut value type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::actions::ShortcutAction;
use super::keys::{key_name, KeyEvent, Modifiers};

/// A key code plus the modifiers that must be held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyboardShortcut {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

impl KeyboardShortcut {
    pub const fn new(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// A shortcut with no modifiers.
    pub const fn bare(key_code: u16) -> Self {
        Self::new(key_code, Modifiers::empty())
    }

    /// Whether `event` triggers this shortcut.
    ///
    /// Only control, option, shift and command are compared; caps lock,
    /// fn and keypad state are ignored on both sides.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.key_code == self.key_code && event.modifiers.relevant() == self.modifiers.relevant()
    }

    /// Capture a shortcut from a recorder key press.
    ///
    /// Returns `None` for presses without control, option, shift or command.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let modifiers = event.modifiers.relevant();
        if modifiers.is_empty() {
            return None;
        }
        Some(Self::new(event.key_code, modifiers))
    }

    /// Whether this shortcut satisfies `action`'s modifier policy.
    pub fn is_valid_for(&self, action: ShortcutAction) -> bool {
        !action.requires_modifier() || self.modifiers.has_relevant()
    }

    /// Menu-style rendering, e.g. `⌘.` or `⌃⇧K`.
    pub fn display_string(&self) -> String {
        let mut s = self.modifiers.relevant().glyphs();
        match key_name(self.key_code) {
            Some(name) => s.push_str(name),
            None => s.push_str(&format!("Key {}", self.key_code)),
        }
        s
    }
}

impl fmt::Display for KeyboardShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}
