//! Key code classification and display names
//!
//! Key codes are physical key identifiers (`KeyA`, `Digit1`, `ArrowUp`, ...).
//! Every code maps to exactly one display name; codes missing from the
//! table keep their raw identifier.

/// Fixed lookup table: (key code, display name)
pub(crate) const KEY_NAMES: &[(&str, &str)] = &[
    // Letters
    ("KeyA", "A"), ("KeyB", "B"), ("KeyC", "C"), ("KeyD", "D"), ("KeyE", "E"),
    ("KeyF", "F"), ("KeyG", "G"), ("KeyH", "H"), ("KeyI", "I"), ("KeyJ", "J"),
    ("KeyK", "K"), ("KeyL", "L"), ("KeyM", "M"), ("KeyN", "N"), ("KeyO", "O"),
    ("KeyP", "P"), ("KeyQ", "Q"), ("KeyR", "R"), ("KeyS", "S"), ("KeyT", "T"),
    ("KeyU", "U"), ("KeyV", "V"), ("KeyW", "W"), ("KeyX", "X"), ("KeyY", "Y"),
    ("KeyZ", "Z"),
    // Digits
    ("Digit0", "0"), ("Digit1", "1"), ("Digit2", "2"), ("Digit3", "3"), ("Digit4", "4"),
    ("Digit5", "5"), ("Digit6", "6"), ("Digit7", "7"), ("Digit8", "8"), ("Digit9", "9"),
    // Function keys
    ("F1", "F1"), ("F2", "F2"), ("F3", "F3"), ("F4", "F4"), ("F5", "F5"), ("F6", "F6"),
    ("F7", "F7"), ("F8", "F8"), ("F9", "F9"), ("F10", "F10"), ("F11", "F11"), ("F12", "F12"),
    ("F13", "F13"), ("F14", "F14"), ("F15", "F15"), ("F16", "F16"), ("F17", "F17"),
    ("F18", "F18"), ("F19", "F19"), ("F20", "F20"), ("F21", "F21"), ("F22", "F22"),
    ("F23", "F23"), ("F24", "F24"),
    // Editing and navigation
    ("Escape", "Esc"), ("Tab", "Tab"), ("Space", "Space"), ("Enter", "Enter"),
    ("Backspace", "Backspace"), ("Delete", "Delete"), ("Insert", "Insert"),
    ("Home", "Home"), ("End", "End"), ("PageUp", "PageUp"), ("PageDown", "PageDown"),
    ("ArrowUp", "Up"), ("ArrowDown", "Down"), ("ArrowLeft", "Left"), ("ArrowRight", "Right"),
    // Numpad
    ("Numpad0", "Num0"), ("Numpad1", "Num1"), ("Numpad2", "Num2"), ("Numpad3", "Num3"),
    ("Numpad4", "Num4"), ("Numpad5", "Num5"), ("Numpad6", "Num6"), ("Numpad7", "Num7"),
    ("Numpad8", "Num8"), ("Numpad9", "Num9"),
    ("NumpadAdd", "Num+"), ("NumpadSubtract", "Num-"), ("NumpadMultiply", "Num*"),
    ("NumpadDivide", "Num/"), ("NumpadEnter", "NumEnter"), ("NumpadDecimal", "Num."),
    // Punctuation
    ("BracketLeft", "["), ("BracketRight", "]"), ("Backslash", "\\"), ("Semicolon", ";"),
    ("Quote", "'"), ("Comma", ","), ("Period", "."), ("Slash", "/"), ("Minus", "-"),
    ("Equal", "="), ("Backquote", "`"),
];

/// Key codes of the modifier keys themselves
const MODIFIER_CODES: &[&str] = &[
    "ControlLeft", "ControlRight", "Control",
    "AltLeft", "AltRight", "Alt", "AltGraph",
    "ShiftLeft", "ShiftRight", "Shift",
    "MetaLeft", "MetaRight", "Meta", "OSLeft", "OSRight", "Super",
];

/// Display name for a key code
///
/// Falls back to the raw code for keys missing from the table.
///
/// ```rust
/// use shortcut_codec::display_name;
///
/// assert_eq!(display_name("KeyA"), "A");
/// assert_eq!(display_name("ArrowLeft"), "Left");
/// assert_eq!(display_name("MediaPlayPause"), "MediaPlayPause");
/// ```
pub fn display_name(code: &str) -> &str {
    KEY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Whether the code belongs to a pure modifier key (Ctrl/Alt/Shift/Super)
pub fn is_modifier_code(code: &str) -> bool {
    MODIFIER_CODES.contains(&code)
}

/// Resolve a user-written key token to its display name
///
/// Accepts display names and key codes, both case-insensitively.
/// Returns `None` when the token is in neither column of the table.
pub(crate) fn lookup_key(token: &str) -> Option<&'static str> {
    KEY_NAMES
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(token))
        .or_else(|| KEY_NAMES.iter().find(|(code, _)| code.eq_ignore_ascii_case(token)))
        .map(|(_, name)| *name)
}
