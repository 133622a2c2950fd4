//! Brazilian postal code (CEP) type.
//!
//! CEPs are eight digits, conventionally written with a hyphen after the
//! fifth ("01310-100"). The type normalizes to the bare digits and keeps
//! the formatted rendering for display and for the lookup service path.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Cep`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum CepError {
    /// The input string is empty.
    #[error("CEP cannot be empty")]
    Empty,
    /// The input does not have exactly eight digits.
    #[error("CEP must have exactly 8 digits (got {got})")]
    WrongLength {
        /// Number of digits found.
        got: usize,
    },
    /// The input contains characters other than digits, hyphen, or spaces.
    #[error("CEP contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A Brazilian postal code, stored as eight bare digits.
///
/// ```
/// use dona_onca_core::Cep;
///
/// let cep = Cep::parse("01310-100").unwrap();
/// assert_eq!(cep.as_str(), "01310100");
/// assert_eq!(cep.formatted(), "01310-100");
/// assert_eq!(cep, Cep::parse("01310100").unwrap());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    /// Parse a `Cep` from a string, accepting the hyphenated form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other
    /// than digits/hyphen/space, or does not have exactly eight digits.
    pub fn parse(s: &str) -> Result<Self, CepError> {
        if s.trim().is_empty() {
            return Err(CepError::Empty);
        }

        let mut digits = String::with_capacity(8);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '-' | ' ' => {}
                other => return Err(CepError::InvalidCharacter(other)),
            }
        }

        if digits.len() != 8 {
            return Err(CepError::WrongLength { got: digits.len() });
        }

        Ok(Self(digits))
    }

    /// Get the bare eight digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render with the conventional hyphen ("01310-100").
    #[must_use]
    pub fn formatted(&self) -> String {
        let (prefix, suffix) = self.0.split_at(5);
        format!("{prefix}-{suffix}")
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_hyphenated_and_bare_forms() {
        assert_eq!(
            Cep::parse("04538-133").unwrap(),
            Cep::parse("04538133").unwrap()
        );
    }

    #[test]
    fn formats_with_hyphen() {
        assert_eq!(Cep::parse("04538133").unwrap().to_string(), "04538-133");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Cep::parse("1234"),
            Err(CepError::WrongLength { got: 4 })
        ));
    }

    #[test]
    fn rejects_letters() {
        assert!(matches!(
            Cep::parse("0131O100"),
            Err(CepError::InvalidCharacter('O'))
        ));
    }
}
