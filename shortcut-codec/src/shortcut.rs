//! Canonical shortcut type
//!
//! A [`Shortcut`] is a modifier set plus exactly one non-modifier key. Its
//! string form lists the held modifiers in the fixed order
//! `Ctrl, Alt, Shift, Super`, then the key's display name, joined by `+`.
//! Two shortcuts are equal iff their canonical strings are equal ignoring
//! letter case. Table keys are always spelled one way, so case only matters
//! for raw key codes outside the table (`MediaPlayPause`).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShortcutError};
use crate::key::{display_name, is_modifier_code, lookup_key};
use crate::modifiers::{Modifier, Modifiers};

/// A canonical keyboard shortcut such as `Ctrl+Shift+A`
///
/// Serializes as its canonical string. Deserialization goes through
/// [`Shortcut::parse`], so anything read back from disk is canonical.
///
/// # Example
///
/// ```rust
/// use shortcut_codec::{Modifier, Modifiers, Shortcut};
///
/// let held = Modifiers::from_slice(&[Modifier::Shift, Modifier::Ctrl]);
/// let shortcut = Shortcut::from_key_code(held, "KeyA")?;
/// assert_eq!(shortcut.as_str(), "Ctrl+Shift+A");
///
/// let parsed: Shortcut = "shift+control+a".parse()?;
/// assert_eq!(parsed, shortcut);
/// # Ok::<(), shortcut_codec::ShortcutError>(())
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Shortcut {
    modifiers: Modifiers,
    key: String,
    canonical: String,
    /// `canonical` in lowercase, used for equality and hashing
    folded: String,
}

impl Shortcut {
    /// Build a shortcut from held modifiers and a physical key code
    ///
    /// The key code is translated through the display-name table.
    /// Fails if the code is empty or is itself a modifier key.
    pub fn from_key_code(modifiers: Modifiers, code: &str) -> Result<Self> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ShortcutError::Empty);
        }
        if is_modifier_code(code) {
            return Err(ShortcutError::MissingKey(code.to_string()));
        }
        Ok(Self::from_parts(modifiers, display_name(code)))
    }

    /// Parse and normalize a shortcut string
    ///
    /// Modifiers may appear in any order and under common aliases
    /// (`Control`, `Cmd`, `Meta`, `Win`, `Option`). The key may be a
    /// display name or a key code, in any letter case.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ShortcutError::Empty);
        }

        let mut modifiers = Modifiers::NONE;
        let mut rest = input;
        while let Some((head, tail)) = rest.split_once('+') {
            let head = head.trim();
            if head.is_empty() {
                break;
            }
            match Modifier::from_alias(head) {
                Some(modifier) => {
                    modifiers.insert(modifier);
                    rest = tail;
                }
                None => break,
            }
        }

        let key = rest.trim();
        if key.is_empty() || Modifier::from_alias(key).is_some() {
            return Err(ShortcutError::MissingKey(input.to_string()));
        }

        let key = resolve_key(key, input)?;
        Ok(Self::from_parts(modifiers, &key))
    }

    fn from_parts(modifiers: Modifiers, key: &str) -> Self {
        let mut canonical = String::new();
        for modifier in modifiers.iter() {
            canonical.push_str(modifier.name());
            canonical.push('+');
        }
        canonical.push_str(key);

        Self {
            modifiers,
            key: key.to_string(),
            folded: canonical.to_lowercase(),
            canonical,
        }
    }

    /// The canonical string form
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// The held modifier set
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Display name of the non-modifier key
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Map a key token to its display name, rejecting tokens with several keys
fn resolve_key(token: &str, input: &str) -> Result<String> {
    if let Some(name) = lookup_key(token) {
        return Ok(name.to_string());
    }

    if token != "+" && token.contains('+') {
        if token.split('+').any(|segment| segment.trim().is_empty()) {
            return Err(ShortcutError::EmptySegment(input.to_string()));
        }
        return Err(ShortcutError::MultipleKeys(input.to_string()));
    }

    Ok(token.to_string())
}

impl PartialEq for Shortcut {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for Shortcut {}

impl Hash for Shortcut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Shortcut {
    type Err = ShortcutError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Shortcut {
    type Error = ShortcutError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Shortcut {
    type Error = ShortcutError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Shortcut> for String {
    fn from(shortcut: Shortcut) -> Self {
        shortcut.canonical
    }
}
