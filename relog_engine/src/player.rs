//! The operator-supplied player name that replaces second-person text.

use std::fmt;

use crate::error::RelogError;

/// A validated, capitalized player name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate and normalize a raw name: surrounding whitespace is trimmed,
    /// the first character is upper-cased and the rest lower-cased.
    ///
    /// # Errors
    /// Returns `InvalidPlayerName` for empty names or names with characters
    /// other than ASCII letters, spaces and apostrophes.
    pub fn parse(raw: &str) -> Result<Self, RelogError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '\'');
        if !valid {
            return Err(RelogError::InvalidPlayerName(raw.to_string()));
        }

        let mut chars = trimmed.chars();
        let mut name = String::with_capacity(trimmed.len());
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
        }
        name.extend(chars.map(|c| c.to_ascii_lowercase()));
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
