//! Local validation of player guesses.

use std::fmt;

use crate::error::ValidationError;

/// Number of digits in a code.
pub const CODE_LENGTH: usize = 4;

/// Smallest allowed digit.
pub const MIN_DIGIT: char = '1';

/// Largest allowed digit.
pub const MAX_DIGIT: char = '6';

/// A syntactically valid guess: exactly `CODE_LENGTH` digits from
/// `MIN_DIGIT..=MAX_DIGIT`. Repeated digits are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Guess(String);

impl Guess {
    /// Validate already-trimmed input.
    ///
    /// Length is checked before digit membership, so `"12a"` reports a
    /// length error rather than a digit error. Length counts Unicode scalar
    /// values, not bytes and not grapheme clusters: `"1\u{301}234"` (a
    /// combining accent after the `1`) is five characters long.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let len = input.chars().count();
        if len != CODE_LENGTH {
            return Err(ValidationError::WrongLength { len });
        }
        if let Some(found) = input.chars().find(|c| !(MIN_DIGIT..=MAX_DIGIT).contains(c)) {
            return Err(ValidationError::InvalidDigit { found });
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Guess {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
