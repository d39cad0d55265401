//! Six-character field locators.
//!
//! A locator addresses a subfield space inside a record: three tag
//! characters, two indicators and one subfield code, e.g. `"100__a"`.
//!
//! - `_` stands for a blank indicator (stored as `' '` in [`Field`](crate::Field))
//! - `%` is a wildcard and may appear in any of the six positions
//!
//! # Examples
//!
//! ```
//! use inspire_marc::FieldLocator;
//!
//! let locator: FieldLocator = "65017a".parse().unwrap();
//! assert!(locator.matches_tag("650"));
//! assert!(locator.matches_indicators('1', '7'));
//!
//! let any_indicator = FieldLocator::parse("035%%a").unwrap();
//! assert!(any_indicator.matches_indicators(' ', '9'));
//! ```

use crate::error::{BibError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Wildcard character accepted in every locator position.
pub const WILDCARD: char = '%';

/// Placeholder for a blank indicator.
pub const BLANK: char = '_';

/// A validated 6-character field address (`TTTiic`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldLocator {
    tag: [char; 3],
    indicator1: char,
    indicator2: char,
    code: char,
}

impl FieldLocator {
    /// Parse a locator from its 6-character text form.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::InvalidLocator`] if `spec` is not exactly six characters.
    pub fn parse(spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        if chars.len() != 6 {
            return Err(BibError::InvalidLocator(format!(
                "'{spec}' has {} characters, expected 6",
                chars.len()
            )));
        }
        Ok(FieldLocator {
            tag: [chars[0], chars[1], chars[2]],
            indicator1: chars[3],
            indicator2: chars[4],
            code: chars[5],
        })
    }

    /// Build a locator from a literal that is known to be well formed.
    ///
    /// # Panics
    ///
    /// Panics if `spec` is not exactly six characters. Callers must never
    /// pass malformed locators; use [`FieldLocator::parse`] for untrusted input.
    #[must_use]
    pub fn new_unchecked(spec: &str) -> Self {
        match Self::parse(spec) {
            Ok(locator) => locator,
            Err(err) => panic!("{err}"),
        }
    }

    /// The three tag characters (may contain `%`).
    #[must_use]
    pub fn tag(&self) -> String {
        self.tag.iter().collect()
    }

    /// First indicator as written in the locator.
    #[must_use]
    pub fn indicator1(&self) -> char {
        self.indicator1
    }

    /// Second indicator as written in the locator.
    #[must_use]
    pub fn indicator2(&self) -> char {
        self.indicator2
    }

    /// Subfield code as written in the locator.
    #[must_use]
    pub fn code(&self) -> char {
        self.code
    }

    /// True when no position of the tag is a wildcard.
    #[must_use]
    pub fn has_concrete_tag(&self) -> bool {
        !self.tag.contains(&WILDCARD)
    }

    /// Check a concrete field tag against the locator tag.
    #[must_use]
    pub fn matches_tag(&self, tag: &str) -> bool {
        let mut chars = tag.chars();
        for expected in self.tag {
            match chars.next() {
                Some(c) if expected == WILDCARD || expected == c => {}
                _ => return false,
            }
        }
        chars.next().is_none()
    }

    /// Check a pair of field indicators against the locator.
    #[must_use]
    pub fn matches_indicators(&self, indicator1: char, indicator2: char) -> bool {
        indicator_matches(self.indicator1, indicator1) && indicator_matches(self.indicator2, indicator2)
    }

    /// Check a subfield code against the locator.
    #[must_use]
    pub fn matches_code(&self, code: char) -> bool {
        self.code == WILDCARD || self.code == code
    }

    /// Indicators to write when creating a field at this address.
    ///
    /// Blank and wildcard positions both produce `' '`.
    #[must_use]
    pub fn concrete_indicators(&self) -> (char, char) {
        (concrete(self.indicator1), concrete(self.indicator2))
    }
}

fn indicator_matches(pattern: char, actual: char) -> bool {
    match pattern {
        WILDCARD => true,
        BLANK => actual == ' ' || actual == BLANK,
        other => other == actual,
    }
}

fn concrete(indicator: char) -> char {
    if indicator == WILDCARD || indicator == BLANK {
        ' '
    } else {
        indicator
    }
}

impl fmt::Display for FieldLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.tag {
            write!(f, "{c}")?;
        }
        write!(f, "{}{}{}", self.indicator1, self.indicator2, self.code)
    }
}

impl FromStr for FieldLocator {
    type Err = BibError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for FieldLocator {
    type Error = BibError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<FieldLocator> for String {
    fn from(locator: FieldLocator) -> Self {
        locator.to_string()
    }
}
