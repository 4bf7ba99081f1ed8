//! Shortcut capture state machine
//!
//! ```text
//!          start()                 non-modifier key
//!   Idle ───────────▶ Recording ───────────────────▶ Idle (value = captured)
//!    ▲                  │   ▲
//!    │ cancel() /       │   │ modifier-only key
//!    │ focus_lost()     │   └───────┘
//!    └──────────────────┘
//! ```
//!
//! While recording, every key event is consumed so nothing else in the
//! application reacts to the keys being captured.

use tracing::{debug, trace};

use crate::error::RecorderError;
use crate::key::is_modifier_code;
use crate::modifiers::Modifiers;
use crate::shortcut::Shortcut;

/// Recorder state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// A raw key-down event from the capture surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Physical key code (`KeyA`, `ControlLeft`, `F5`, ...)
    pub code: String,
    /// Modifiers held while the key went down
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            code: code.into(),
            modifiers,
        }
    }
}

/// What the recorder did with a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDisposition {
    /// Not recording; the event belongs to other handlers
    PassThrough,
    /// Swallowed without completing a capture
    Consumed,
    /// Swallowed and completed the capture
    Captured(Shortcut),
}

/// Records a single shortcut from key events
///
/// # Example
///
/// ```rust
/// use shortcut_codec::{KeyDisposition, KeyEvent, Modifier, Modifiers, ShortcutRecorder};
///
/// let mut recorder = ShortcutRecorder::new(None);
/// recorder.start();
///
/// let ctrl = Modifiers::NONE.with(Modifier::Ctrl);
/// assert_eq!(recorder.handle_key(&KeyEvent::new("ControlLeft", ctrl)), KeyDisposition::Consumed);
///
/// match recorder.handle_key(&KeyEvent::new("KeyM", ctrl)) {
///     KeyDisposition::Captured(s) => assert_eq!(s.as_str(), "Ctrl+M"),
///     other => panic!("unexpected {:?}", other),
/// }
/// assert!(!recorder.is_recording());
/// ```
#[derive(Debug, Clone)]
pub struct ShortcutRecorder {
    state: RecorderState,
    value: Option<Shortcut>,
}

impl ShortcutRecorder {
    /// Create an idle recorder holding the current shortcut, if any
    pub fn new(value: Option<Shortcut>) -> Self {
        Self {
            state: RecorderState::Idle,
            value,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Current shortcut value
    pub fn value(&self) -> Option<&Shortcut> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Shortcut> {
        self.value
    }

    /// Begin capturing. Has no effect while already recording.
    pub fn start(&mut self) {
        if self.state == RecorderState::Idle {
            debug!("Shortcut capture started");
            self.state = RecorderState::Recording;
        }
    }

    /// Abandon the capture, keeping the previous value
    pub fn cancel(&mut self) {
        if self.state == RecorderState::Recording {
            debug!("Shortcut capture cancelled");
            self.state = RecorderState::Idle;
        }
    }

    /// The capture surface lost focus; same effect as [`cancel`](Self::cancel)
    pub fn focus_lost(&mut self) {
        self.cancel();
    }

    /// Unset the shortcut. Only valid while idle.
    ///
    /// Returns the value that was cleared.
    pub fn clear(&mut self) -> Result<Option<Shortcut>, RecorderError> {
        if self.state == RecorderState::Recording {
            return Err(RecorderError::Recording);
        }
        Ok(self.value.take())
    }

    /// Feed a key-down event
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyDisposition {
        if self.state == RecorderState::Idle {
            return KeyDisposition::PassThrough;
        }

        if is_modifier_code(&event.code) {
            trace!("Ignoring modifier-only key {}", event.code);
            return KeyDisposition::Consumed;
        }

        match Shortcut::from_key_code(event.modifiers, &event.code) {
            Ok(shortcut) => {
                debug!("Captured shortcut {}", shortcut);
                self.value = Some(shortcut.clone());
                self.state = RecorderState::Idle;
                KeyDisposition::Captured(shortcut)
            }
            Err(e) => {
                trace!("Discarding key event: {}", e);
                KeyDisposition::Consumed
            }
        }
    }
}

impl Default for ShortcutRecorder {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifiers::Modifier;

    fn recording() -> ShortcutRecorder {
        let mut recorder = ShortcutRecorder::new(None);
        recorder.start();
        recorder
    }

    #[test]
    fn test_idle_passes_events_through() {
        let mut recorder = ShortcutRecorder::new(None);
        let event = KeyEvent::new("KeyA", Modifiers::NONE);
        assert_eq!(recorder.handle_key(&event), KeyDisposition::PassThrough);
        assert!(recorder.value().is_none());
    }

    #[test]
    fn test_modifier_only_stays_recording() {
        let mut recorder = recording();
        let ctrl = Modifiers::NONE.with(Modifier::Ctrl);

        assert_eq!(recorder.handle_key(&KeyEvent::new("ControlLeft", ctrl)), KeyDisposition::Consumed);
        assert_eq!(recorder.state(), RecorderState::Recording);
        assert!(recorder.value().is_none());
    }

    #[test]
    fn test_key_without_modifiers_is_captured() {
        let mut recorder = recording();
        let result = recorder.handle_key(&KeyEvent::new("F9", Modifiers::NONE));
        assert_eq!(result, KeyDisposition::Captured(Shortcut::parse("F9").unwrap()));
    }

    #[test]
    fn test_cancel_keeps_previous_value() {
        let previous = Shortcut::parse("Ctrl+Alt+G").unwrap();
        let mut recorder = ShortcutRecorder::new(Some(previous.clone()));
        recorder.start();
        recorder.cancel();

        assert_eq!(recorder.state(), RecorderState::Idle);
        assert_eq!(recorder.value(), Some(&previous));
    }

    #[test]
    fn test_focus_lost_cancels() {
        let mut recorder = recording();
        recorder.focus_lost();
        assert!(!recorder.is_recording());
        assert!(recorder.value().is_none());
    }

    #[test]
    fn test_clear_only_when_idle() {
        let mut recorder = ShortcutRecorder::new(Some(Shortcut::parse("Ctrl+K").unwrap()));
        recorder.start();
        assert_eq!(recorder.clear(), Err(RecorderError::Recording));
        assert!(recorder.value().is_some());

        recorder.cancel();
        assert!(recorder.clear().unwrap().is_some());
        assert!(recorder.value().is_none());
        assert_eq!(recorder.state(), RecorderState::Idle);
    }
}
