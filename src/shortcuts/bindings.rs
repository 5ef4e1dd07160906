//! Effective shortcut table: defaults plus user overrides.
//!
//! Only overrides are persisted, as a JSON object of action id to shortcut
//! stored under [`BINDINGS_KEY`]:
//!
//! ```json
//! {"palette.show": {"keyCode": 49, "modifiers": 524288}}
//! ```

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::storage::PreferenceStore;

use super::actions::ShortcutAction;
use super::keys::KeyEvent;
use super::types::KeyboardShortcut;

pub const BINDINGS_KEY: &str = "shortcutBindings";

/// Reasons a shortcut cannot be bound.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortcutError {
    #[error("'{action}' needs at least one modifier key")]
    ModifierRequired { action: ShortcutAction },

    #[error("{shortcut} is already used by '{other}'")]
    Conflict {
        shortcut: KeyboardShortcut,
        other: ShortcutAction,
    },
}

/// Shortcuts currently in effect for every action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShortcutBindings {
    overrides: BTreeMap<ShortcutAction, KeyboardShortcut>,
}

impl ShortcutBindings {
    /// All defaults, no overrides.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, action: ShortcutAction) -> KeyboardShortcut {
        self.overrides
            .get(&action)
            .copied()
            .unwrap_or_else(|| action.default_shortcut())
    }

    pub fn is_customized(&self, action: ShortcutAction) -> bool {
        self.overrides.contains_key(&action)
    }

    /// Bind `shortcut` to `action`.
    ///
    /// Rejects shortcuts that break the action's modifier policy or that
    /// another action already uses. Binding the default clears the override.
    pub fn set(
        &mut self,
        action: ShortcutAction,
        shortcut: KeyboardShortcut,
    ) -> Result<(), ShortcutError> {
        let shortcut = KeyboardShortcut::new(shortcut.key_code, shortcut.modifiers.relevant());
        if !shortcut.is_valid_for(action) {
            return Err(ShortcutError::ModifierRequired { action });
        }
        if let Some(other) = self.conflicting_action(action, &shortcut) {
            return Err(ShortcutError::Conflict { shortcut, other });
        }

        if shortcut == action.default_shortcut() {
            self.overrides.remove(&action);
        } else {
            self.overrides.insert(action, shortcut);
        }
        debug!(action = action.id(), shortcut = %shortcut, "Shortcut bound");
        Ok(())
    }

    /// Another action whose effective shortcut equals `shortcut`.
    pub fn conflicting_action(
        &self,
        action: ShortcutAction,
        shortcut: &KeyboardShortcut,
    ) -> Option<ShortcutAction> {
        let event = KeyEvent::new(shortcut.key_code, shortcut.modifiers);
        ShortcutAction::ALL
            .into_iter()
            .filter(|other| *other != action)
            .find(|other| self.get(*other).matches(&event))
    }

    pub fn reset(&mut self, action: ShortcutAction) {
        self.overrides.remove(&action);
    }

    pub fn reset_all(&mut self) {
        self.overrides.clear();
    }

    /// First action, in declaration order, triggered by `event`.
    pub fn action_for(&self, event: &KeyEvent) -> Option<ShortcutAction> {
        ShortcutAction::ALL
            .into_iter()
            .find(|action| self.get(*action).matches(event))
    }

    /// `(action, shortcut)` for every action in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ShortcutAction, KeyboardShortcut)> + '_ {
        ShortcutAction::ALL
            .into_iter()
            .map(move |action| (action, self.get(action)))
    }

    /// Load overrides from `store`.
    ///
    /// Unknown action ids, undecodable shortcuts and shortcuts that break an
    /// action's modifier policy are skipped with a warning.
    pub fn load<S: PreferenceStore + ?Sized>(store: &S) -> Self {
        let mut bindings = Self::new();
        let Some(raw) = store.get(BINDINGS_KEY) else {
            return bindings;
        };

        let entries: BTreeMap<String, Value> = match serde_json::from_str(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Failed to decode shortcut overrides, using defaults");
                return bindings;
            }
        };

        for (id, value) in entries {
            let Some(action) = ShortcutAction::from_id(&id) else {
                warn!(binding_id = %id, "Ignoring override for unknown action");
                continue;
            };
            match serde_json::from_value::<KeyboardShortcut>(value) {
                Ok(shortcut) if shortcut.is_valid_for(action) => {
                    bindings.overrides.insert(action, shortcut);
                }
                Ok(shortcut) => {
                    warn!(binding_id = %id, shortcut = %shortcut, "Ignoring override without required modifier");
                }
                Err(e) => {
                    warn!(binding_id = %id, error = %e, "Ignoring undecodable override");
                }
            }
        }

        info!(overrides = bindings.overrides.len(), "Loaded shortcut overrides");
        bindings
    }

    /// Persist overrides to `store`.
    pub fn save<S: PreferenceStore + ?Sized>(&self, store: &S) -> Result<(), StoreError> {
        let entries: BTreeMap<&str, &KeyboardShortcut> = self
            .overrides
            .iter()
            .map(|(action, shortcut)| (action.id(), shortcut))
            .collect();
        let json = serde_json::to_string(&entries).map_err(|source| StoreError::Serialize {
            key: BINDINGS_KEY.to_string(),
            source,
        })?;
        store.set(BINDINGS_KEY, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shortcuts::keys::{key_code, Modifiers};
    use crate::storage::MemoryPreferences;

    const SPACE: u16 = 49;

    #[test]
    fn defaults_resolve_events() {
        let bindings = ShortcutBindings::new();
        let cmd_period = KeyEvent::new(key_code::PERIOD, Modifiers::COMMAND);
        assert_eq!(bindings.action_for(&cmd_period), Some(ShortcutAction::ShowPalette));

        let digit = KeyEvent::new(key_code::DIGIT_5, Modifiers::empty());
        assert_eq!(bindings.action_for(&digit), Some(ShortcutAction::QuickSlot5));

        let shifted_digit = KeyEvent::new(key_code::DIGIT_5, Modifiers::SHIFT);
        assert_eq!(bindings.action_for(&shifted_digit), None);
    }

    #[test]
    fn global_action_rejects_bare_key() {
        let mut bindings = ShortcutBindings::new();
        let err = bindings
            .set(ShortcutAction::ShowPalette, KeyboardShortcut::bare(SPACE))
            .unwrap_err();
        assert_eq!(
            err,
            ShortcutError::ModifierRequired {
                action: ShortcutAction::ShowPalette
            }
        );
        assert!(!bindings.is_customized(ShortcutAction::ShowPalette));
    }

    #[test]
    fn conflicting_binding_is_rejected() {
        let mut bindings = ShortcutBindings::new();
        let err = bindings
            .set(
                ShortcutAction::NewPrompt,
                KeyboardShortcut::new(key_code::PERIOD, Modifiers::COMMAND),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            ShortcutError::Conflict {
                other: ShortcutAction::ShowPalette,
                ..
            }
        ));
    }

    #[test]
    fn override_then_reset() {
        let mut bindings = ShortcutBindings::new();
        let opt_space = KeyboardShortcut::new(SPACE, Modifiers::OPTION | Modifiers::CAPS_LOCK);
        bindings.set(ShortcutAction::ShowPalette, opt_space).unwrap();

        let stored = bindings.get(ShortcutAction::ShowPalette);
        assert_eq!(stored.modifiers, Modifiers::OPTION);
        assert_eq!(
            bindings.action_for(&KeyEvent::new(SPACE, Modifiers::OPTION)),
            Some(ShortcutAction::ShowPalette)
        );
        assert_eq!(
            bindings.action_for(&KeyEvent::new(key_code::PERIOD, Modifiers::COMMAND)),
            None
        );

        bindings.reset(ShortcutAction::ShowPalette);
        assert_eq!(
            bindings.get(ShortcutAction::ShowPalette),
            ShortcutAction::ShowPalette.default_shortcut()
        );
    }

    #[test]
    fn binding_default_clears_override() {
        let mut bindings = ShortcutBindings::new();
        bindings
            .set(ShortcutAction::NewPrompt, KeyboardShortcut::new(SPACE, Modifiers::CONTROL))
            .unwrap();
        assert!(bindings.is_customized(ShortcutAction::NewPrompt));
        bindings
            .set(ShortcutAction::NewPrompt, ShortcutAction::NewPrompt.default_shortcut())
            .unwrap();
        assert!(!bindings.is_customized(ShortcutAction::NewPrompt));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let store = MemoryPreferences::new();
        let mut bindings = ShortcutBindings::new();
        bindings
            .set(ShortcutAction::ShowPalette, KeyboardShortcut::new(SPACE, Modifiers::OPTION))
            .unwrap();
        bindings
            .set(ShortcutAction::QuickSlot1, KeyboardShortcut::bare(0))
            .unwrap();
        bindings.save(&store).unwrap();

        assert_eq!(ShortcutBindings::load(&store), bindings);
    }

    #[test]
    fn load_skips_bad_entries() {
        let store = MemoryPreferences::new();
        store
            .set(
                BINDINGS_KEY,
                r#"{
                    "palette.show": {"keyCode": 49, "modifiers": 0},
                    "palette.new": {"keyCode": 1, "modifiers": 262144},
                    "no.such.action": {"keyCode": 2, "modifiers": 0},
                    "nav.up": "garbage"
                }"#
                .to_string(),
            )
            .unwrap();

        let bindings = ShortcutBindings::load(&store);
        assert!(!bindings.is_customized(ShortcutAction::ShowPalette));
        assert!(!bindings.is_customized(ShortcutAction::NavigateUp));
        assert_eq!(
            bindings.get(ShortcutAction::NewPrompt),
            KeyboardShortcut::new(1, Modifiers::CONTROL)
        );
    }

    #[test]
    fn corrupt_overrides_fall_back_to_defaults() {
        let store = MemoryPreferences::new();
        store.set(BINDINGS_KEY, "[".to_string()).unwrap();
        assert_eq!(ShortcutBindings::load(&store), ShortcutBindings::new());
    }
}
