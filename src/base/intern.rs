//! Identifier strings.
//!
//! `Name` wraps `SmolStr` so identifiers clone without allocating for the
//! short names that dominate real source. Names compare by value.

use smol_str::SmolStr;
use std::borrow::Borrow;
use std::fmt;

/// An identifier: a local name, a type name, or one segment of a
/// namespace-qualified name.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(text: &str) -> Self {
        Name(SmolStr::new(text))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `text` is lexically valid as an identifier (XID rules, with
    /// `_` allowed as a starter). Used to validate names supplied by
    /// external metadata providers, which bypass the lexer.
    pub fn is_valid_identifier(text: &str) -> bool {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        if !(first == '_' || unicode_ident::is_xid_start(first)) {
            return false;
        }
        chars.all(unicode_ident::is_xid_continue)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.as_str())
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl From<String> for Name {
    fn from(text: String) -> Self {
        Name(SmolStr::from(text))
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_validity() {
        assert!(Name::is_valid_identifier("x"));
        assert!(Name::is_valid_identifier("_private"));
        assert!(Name::is_valid_identifier("übergröße"));
        assert!(!Name::is_valid_identifier(""));
        assert!(!Name::is_valid_identifier("1abc"));
        assert!(!Name::is_valid_identifier("a.b"));
        assert!(!Name::is_valid_identifier("a b"));
    }

    #[test]
    fn name_compares_by_value() {
        assert_eq!(Name::new("Console"), Name::from("Console"));
        assert_eq!(Name::new("x"), *"x");
    }
}
