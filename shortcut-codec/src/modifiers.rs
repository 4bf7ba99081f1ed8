//! Modifier keys and modifier sets

use std::fmt;

/// A single modifier key
///
/// Variants are declared in canonical order: `Ctrl, Alt, Shift, Super`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Ctrl,
    Alt,
    Shift,
    Super,
}

impl Modifier {
    /// All modifiers in canonical order
    pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Super];

    /// Canonical name used in shortcut strings
    pub fn name(self) -> &'static str {
        match self {
            Modifier::Ctrl => "Ctrl",
            Modifier::Alt => "Alt",
            Modifier::Shift => "Shift",
            Modifier::Super => "Super",
        }
    }

    /// Parse a modifier name, accepting common platform aliases
    ///
    /// Matching is case-insensitive.
    pub fn from_alias(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => Some(Modifier::Ctrl),
            "alt" | "option" => Some(Modifier::Alt),
            "shift" => Some(Modifier::Shift),
            "super" | "meta" | "cmd" | "command" | "win" => Some(Modifier::Super),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Modifier::Ctrl => 0b0001,
            Modifier::Alt => 0b0010,
            Modifier::Shift => 0b0100,
            Modifier::Super => 0b1000,
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of held modifier keys
///
/// A set, not a sequence: the order in which modifiers were pressed is not
/// recorded, which is what makes canonical shortcuts order-independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// No modifiers held
    pub const NONE: Modifiers = Modifiers(0);

    /// Build a set from any collection of modifiers
    pub fn from_slice(modifiers: &[Modifier]) -> Self {
        modifiers.iter().fold(Self::NONE, |set, m| set.with(*m))
    }

    /// Return a copy of this set with `modifier` added
    pub fn with(self, modifier: Modifier) -> Self {
        Modifiers(self.0 | modifier.bit())
    }

    /// Add a modifier in place
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Remove a modifier in place
    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Held modifiers in canonical order
    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, |set, m| set.with(m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_is_canonical_order() {
        let set = Modifiers::from_slice(&[Modifier::Super, Modifier::Shift, Modifier::Ctrl]);
        let names: Vec<_> = set.iter().map(Modifier::name).collect();
        assert_eq!(names, vec!["Ctrl", "Shift", "Super"]);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = Modifiers::NONE;
        set.insert(Modifier::Alt);
        set.insert(Modifier::Alt);
        assert_eq!(set.iter().count(), 1);

        set.remove(Modifier::Alt);
        assert!(set.is_empty());
    }

    #[test]
    fn test_aliases() {
        assert_eq!(Modifier::from_alias("Control"), Some(Modifier::Ctrl));
        assert_eq!(Modifier::from_alias("CMD"), Some(Modifier::Super));
        assert_eq!(Modifier::from_alias("option"), Some(Modifier::Alt));
        assert_eq!(Modifier::from_alias("A"), None);
    }
}
