//! Key codes, modifier masks and key events.
//!
//! Key codes are macOS virtual key codes (`kVK_*`). Modifier bits use the
//! device-independent positions of `NSEvent.ModifierFlags`, so raw event
//! flags can be wrapped without translation.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Modifier key flags as reported by the OS
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u64 {
        const CAPS_LOCK = 1 << 16;
        /// Shift key (⇧)
        const SHIFT = 1 << 17;
        /// Control key (⌃)
        const CONTROL = 1 << 18;
        /// Option key (Alt/⌥)
        const OPTION = 1 << 19;
        /// Command key (Cmd/⌘)
        const COMMAND = 1 << 20;
        const NUMERIC_PAD = 1 << 21;
        const HELP = 1 << 22;
        const FUNCTION = 1 << 23;
    }
}

impl Modifiers {
    /// The four modifiers that take part in shortcut matching.
    pub const RELEVANT: Modifiers = Modifiers::CONTROL
        .union(Modifiers::OPTION)
        .union(Modifiers::SHIFT)
        .union(Modifiers::COMMAND);

    /// Wrap raw event flags, keeping unknown bits out.
    pub fn from_event_flags(raw: u64) -> Self {
        Self::from_bits_truncate(raw)
    }

    /// Only control, option, shift and command.
    pub fn relevant(self) -> Self {
        self & Self::RELEVANT
    }

    pub fn has_relevant(self) -> bool {
        self.intersects(Self::RELEVANT)
    }

    /// Glyphs in macOS menu order: ⌃ ⌥ ⇧ ⌘.
    pub fn glyphs(self) -> String {
        let mut s = String::new();
        if self.contains(Self::CONTROL) {
            s.push('⌃');
        }
        if self.contains(Self::OPTION) {
            s.push('⌥');
        }
        if self.contains(Self::SHIFT) {
            s.push('⇧');
        }
        if self.contains(Self::COMMAND) {
            s.push('⌘');
        }
        s
    }
}

impl Serialize for Modifiers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for Modifiers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

/// A key press as delivered by the event monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub key_code: u16,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key_code: u16, modifiers: Modifiers) -> Self {
        Self {
            key_code,
            modifiers,
        }
    }

    /// Build from a raw key code and unfiltered modifier flags.
    pub fn from_raw(key_code: u16, modifier_flags: u64) -> Self {
        Self::new(key_code, Modifiers::from_event_flags(modifier_flags))
    }
}

/// Virtual key codes used by the default bindings.
pub mod key_code {
    pub const DIGIT_1: u16 = 18;
    pub const DIGIT_2: u16 = 19;
    pub const DIGIT_3: u16 = 20;
    pub const DIGIT_4: u16 = 21;
    pub const DIGIT_5: u16 = 23;
    pub const DIGIT_6: u16 = 22;
    pub const DIGIT_7: u16 = 26;
    pub const DIGIT_8: u16 = 28;
    pub const DIGIT_9: u16 = 25;
    pub const RETURN: u16 = 36;
    pub const N: u16 = 45;
    pub const PERIOD: u16 = 47;
    pub const ESCAPE: u16 = 53;
    pub const DOWN_ARROW: u16 = 125;
    pub const UP_ARROW: u16 = 126;

    /// Digit keys 1-9 in order.
    pub const DIGITS: [u16; 9] = [
        DIGIT_1, DIGIT_2, DIGIT_3, DIGIT_4, DIGIT_5, DIGIT_6, DIGIT_7, DIGIT_8, DIGIT_9,
    ];
}

/// Human-readable names for ANSI-layout virtual key codes.
const KEY_NAMES: &[(u16, &str)] = &[
    (0, "A"),
    (1, "S"),
    (2, "D"),
    (3, "F"),
    (4, "H"),
    (5, "G"),
    (6, "Z"),
    (7, "X"),
    (8, "C"),
    (9, "V"),
    (11, "B"),
    (12, "Q"),
    (13, "W"),
    (14, "E"),
    (15, "R"),
    (16, "Y"),
    (17, "T"),
    (18, "1"),
    (19, "2"),
    (20, "3"),
    (21, "4"),
    (22, "6"),
    (23, "5"),
    (24, "="),
    (25, "9"),
    (26, "7"),
    (27, "-"),
    (28, "8"),
    (29, "0"),
    (30, "]"),
    (31, "O"),
    (32, "U"),
    (33, "["),
    (34, "I"),
    (35, "P"),
    (36, "↩"),
    (37, "L"),
    (38, "J"),
    (39, "'"),
    (40, "K"),
    (41, ";"),
    (42, "\\"),
    (43, ","),
    (44, "/"),
    (45, "N"),
    (46, "M"),
    (47, "."),
    (48, "⇥"),
    (49, "Space"),
    (50, "`"),
    (51, "⌫"),
    (53, "⎋"),
    (96, "F5"),
    (97, "F6"),
    (98, "F7"),
    (99, "F3"),
    (100, "F8"),
    (101, "F9"),
    (103, "F11"),
    (109, "F10"),
    (111, "F12"),
    (115, "Home"),
    (116, "Page Up"),
    (117, "⌦"),
    (118, "F4"),
    (119, "End"),
    (120, "F2"),
    (121, "Page Down"),
    (122, "F1"),
    (123, "←"),
    (124, "→"),
    (125, "↓"),
    (126, "↑"),
];

/// Display name for a key code, if it is in the table.
pub fn key_name(code: u16) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
