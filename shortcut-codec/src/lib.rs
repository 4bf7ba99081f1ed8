//! Shortcut Codec
//!
//! Turns raw key presses into canonical shortcut strings and normalizes
//! shortcuts typed by hand or read from disk.
//!
//! # Canonical form
//!
//! Held modifiers in the fixed order `Ctrl, Alt, Shift, Super`, followed by
//! the display name of exactly one non-modifier key, joined with `+`:
//!
//! ```text
//! Shift (held) + Ctrl (held) + KeyA  ──▶  "Ctrl+Shift+A"
//! Ctrl (held) + Shift (held) + KeyA  ──▶  "Ctrl+Shift+A"
//! ```
//!
//! The canonical string depends only on the modifier set and the key, never
//! on press order, so it can be compared for uniqueness and persisted.
//!
//! # Capturing
//!
//! ```rust
//! use shortcut_codec::{KeyDisposition, KeyEvent, Modifier, Modifiers, ShortcutRecorder};
//!
//! let mut recorder = ShortcutRecorder::default();
//! recorder.start();
//!
//! let held = Modifiers::from_slice(&[Modifier::Ctrl, Modifier::Alt]);
//! if let KeyDisposition::Captured(shortcut) = recorder.handle_key(&KeyEvent::new("KeyG", held)) {
//!     assert_eq!(shortcut.to_string(), "Ctrl+Alt+G");
//! }
//! ```

pub mod error;
pub mod key;
pub mod modifiers;
pub mod recorder;
pub mod shortcut;

pub use error::{RecorderError, Result, ShortcutError};
pub use key::{display_name, is_modifier_code};
pub use modifiers::{Modifier, Modifiers};
pub use recorder::{KeyDisposition, KeyEvent, RecorderState, ShortcutRecorder};
pub use shortcut::Shortcut;
