//! Rule configuration.
//!
//! Rules are described in JSON and compiled into [`CheckPlugin`]s before a
//! batch is checked, so that malformed locators and patterns are reported
//! once, by rule name, instead of per record.
//!
//! ```json
//! {
//!   "rules": [
//!     {
//!       "name": "arxiv_035_to_037",
//!       "check": "move_pattern_to_field",
//!       "source_field": "035__a",
//!       "new_field": "037__a",
//!       "pattern": "oai:arXiv.org:(?P<value>.+)",
//!       "subfield_filter": ["9", "arXiv"],
//!       "allow_duplicates": false
//!     }
//!   ]
//! }
//! ```

use super::move_pattern::MovePatternToField;
use super::{CheckPlugin, SubfieldFilter};
use crate::error::{BibError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A list of configured rules, in application order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule entries
    #[serde(default)]
    pub rules: Vec<RuleConfig>,
}

/// One named rule entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Name used to attribute amendments and warnings
    pub name: String,
    /// Disabled rules are skipped at compile time
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Which check to run, with its parameters
    #[serde(flatten)]
    pub check: CheckConfig,
}

fn default_enabled() -> bool {
    true
}

/// Parameters of each available check, selected by the `check` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum CheckConfig {
    /// Relocate pattern-matched values to another field
    MovePatternToField {
        /// Six-character source locator
        source_field: String,
        /// Six-character target locator
        new_field: String,
        /// Regex with a `value` named group
        pattern: String,
        /// `[code, value]` pair restricting source fields
        #[serde(default)]
        subfield_filter: Option<SubfieldFilter>,
        /// Write values even if already present at the target
        #[serde(default)]
        allow_duplicates: bool,
    },
}

/// A compiled rule, ready to apply.
#[derive(Debug)]
pub struct Rule {
    /// Rule name
    pub name: String,
    /// The bound check
    pub plugin: Box<dyn CheckPlugin>,
}

impl RuleSet {
    /// Parse a rule set from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::Json`] if the text is not a valid rule set.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a rule set from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the file cannot be read, or a JSON error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Compile every enabled rule.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::InvalidRule`] naming the first rule whose
    /// locators or pattern are invalid.
    pub fn compile(&self) -> Result<Vec<Rule>> {
        self.rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(RuleConfig::compile)
            .collect()
    }
}

impl RuleConfig {
    /// Bind this rule's parameters into a check.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::InvalidRule`] if the parameters are invalid.
    pub fn compile(&self) -> Result<Rule> {
        let invalid = |err: BibError| BibError::InvalidRule {
            rule: self.name.clone(),
            reason: err.to_string(),
        };

        let plugin: Box<dyn CheckPlugin> = match &self.check {
            CheckConfig::MovePatternToField {
                source_field,
                new_field,
                pattern,
                subfield_filter,
                allow_duplicates,
            } => {
                let mut check = MovePatternToField::new(source_field, new_field, pattern)
                    .map_err(invalid)?
                    .allow_duplicates(*allow_duplicates);
                if let Some(filter) = subfield_filter {
                    check = check.with_subfield_filter(filter.clone());
                }
                Box::new(check)
            }
        };

        Ok(Rule {
            name: self.name.clone(),
            plugin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"{
        "rules": [
            {
                "name": "arxiv",
                "check": "move_pattern_to_field",
                "source_field": "035__a",
                "new_field": "037__a",
                "pattern": "oai:arXiv.org:(?P<value>.+)",
                "subfield_filter": ["9", "arXiv"]
            },
            {
                "name": "disabled",
                "enabled": false,
                "check": "move_pattern_to_field",
                "source_field": "bad",
                "new_field": "037__a",
                "pattern": "(?P<value>.*)"
            }
        ]
    }"#;

    #[test]
    fn test_parse_rule_set() {
        let set = RuleSet::from_json_str(RULES).unwrap();
        assert_eq!(set.rules.len(), 2);
        assert!(set.rules[0].enabled);
        let CheckConfig::MovePatternToField {
            subfield_filter,
            allow_duplicates,
            ..
        } = &set.rules[0].check;
        assert_eq!(subfield_filter, &Some(SubfieldFilter::new('9', "arXiv")));
        assert!(!allow_duplicates);
    }

    #[test]
    fn test_compile_skips_disabled_rules() {
        let rules = RuleSet::from_json_str(RULES).unwrap().compile().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "arxiv");
    }

    #[test]
    fn test_compile_reports_rule_name() {
        let set = RuleSet::from_json_str(
            r#"{"rules": [{"name": "broken", "check": "move_pattern_to_field",
                "source_field": "035__a", "new_field": "037__a", "pattern": "no group"}]}"#,
        )
        .unwrap();
        match set.compile() {
            Err(BibError::InvalidRule { rule, reason }) => {
                assert_eq!(rule, "broken");
                assert!(reason.contains("value"));
            }
            other => panic!("expected InvalidRule, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_check_is_rejected() {
        let result = RuleSet::from_json_str(
            r#"{"rules": [{"name": "x", "check": "enforce_isbn"}]}"#,
        );
        assert!(matches!(result, Err(BibError::Json(_))));
    }

    #[test]
    fn test_empty_rule_set() {
        let set = RuleSet::from_json_str("{}").unwrap();
        assert!(set.compile().unwrap().is_empty());
    }
}
