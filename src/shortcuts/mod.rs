//! Keyboard shortcut model.
//!
//! This module provides:
//! - `KeyboardShortcut` - a key code plus modifier mask, with event matching
//! - `ShortcutAction` - the fixed set of bindable actions and their defaults
//! - `ShortcutBindings` - defaults merged with persisted user overrides
//!
//! # Example
//!
//! ```ignore
//! use promptbar::shortcuts::{KeyEvent, ShortcutBindings};
//!
//! let bindings = ShortcutBindings::load(store.as_ref());
//! let event = KeyEvent::from_raw(key_code, modifier_flags);
//! if let Some(action) = bindings.action_for(&event) {
//!     println!("{} ({})", action, bindings.get(action));
//! }
//! ```

mod actions;
mod bindings;
mod keys;
mod types;


pub use actions::{ShortcutAction, ShortcutCategory};
pub use bindings::{ShortcutBindings, ShortcutError, BINDINGS_KEY};
pub use keys::{key_code, key_name, KeyEvent, Modifiers};
pub use types::KeyboardShortcut;
