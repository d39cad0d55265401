//! Record checking: the record collaborator seen by checking rules.
//!
//! Checking rules never touch a [`Record`] directly. They work through the
//! [`CheckRecord`] trait, which exposes exactly the operations a rule needs:
//! locator-driven iteration, value lookup, field addition and positional
//! deletion, plus the amendment, warning and error sinks.
//!
//! [`AmendableRecord`] is the in-crate implementation. It owns a record and
//! collects the notes produced by each rule, tagged with the rule's name.
//!
//! # Examples
//!
//! ```
//! use inspire_marc::bibcheck::{AmendableRecord, CheckRecord};
//! use inspire_marc::{Field, FieldLocator, Record};
//!
//! let mut record = Record::new();
//! record.add_field(Field::builder("100", ' ', ' ').subfield_str('a', "Ellis, J.").build());
//!
//! let amendable = AmendableRecord::new(record);
//! let authors = FieldLocator::parse("100__a").unwrap();
//! let hits = amendable.iter_field(&authors, None);
//! assert_eq!(hits[0].value, "Ellis, J.");
//! assert_eq!(hits[0].position.field_name, "100__a");
//! ```

pub mod config;
pub mod move_pattern;
pub mod task;

use crate::locator::FieldLocator;
use crate::record::{Field, Record, Subfield};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use config::{CheckConfig, RuleConfig, RuleSet};
pub use move_pattern::{relocate, MovePatternToField, RelocationSummary, ValuePattern};
pub use task::{RecordReport, TaskReport};

/// Where a subfield occurrence lives inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPosition {
    /// Concrete field name `tag + ind1 + ind2 + code`, blanks written as `_`
    pub field_name: String,
    /// Tag of the field group
    pub tag: String,
    /// Position of the field inside its tag group
    pub field_index: usize,
    /// Position of the subfield inside the field
    pub subfield_index: usize,
}

/// One subfield value yielded by [`CheckRecord::iter_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOccurrence {
    /// Address of the value
    pub position: FieldPosition,
    /// The subfield value
    pub value: String,
}

/// Restricts iteration to fields holding a given `(code, value)` subfield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(char, String)", into = "(char, String)")]
pub struct SubfieldFilter {
    /// Subfield code that must be present
    pub code: char,
    /// Exact value that subfield must hold
    pub value: String,
}

impl SubfieldFilter {
    /// Create a filter for fields containing `$code value`.
    #[must_use]
    pub fn new(code: char, value: impl Into<String>) -> Self {
        SubfieldFilter {
            code,
            value: value.into(),
        }
    }

    /// Check a field against the filter.
    #[must_use]
    pub fn accepts(&self, field: &Field) -> bool {
        field.has_subfield_value(self.code, &self.value)
    }
}

impl From<(char, String)> for SubfieldFilter {
    fn from((code, value): (char, String)) -> Self {
        SubfieldFilter { code, value }
    }
}

impl From<SubfieldFilter> for (char, String) {
    fn from(filter: SubfieldFilter) -> Self {
        (filter.code, filter.value)
    }
}

/// The record operations available to checking rules.
pub trait CheckRecord {
    /// Every subfield value addressed by `locator`, in record order,
    /// restricted to fields accepted by `filter`.
    fn iter_field(
        &self,
        locator: &FieldLocator,
        filter: Option<&SubfieldFilter>,
    ) -> Vec<FieldOccurrence>;

    /// Every subfield value addressed by `locator`.
    fn field_values(&self, locator: &FieldLocator) -> Vec<String>;

    /// Append a field at the end of its tag group.
    fn add_field(&mut self, tag: &str, indicator1: char, indicator2: char, subfields: Vec<Subfield>);

    /// Delete the field at `position` within the `tag` group.
    ///
    /// Returns false when no such field exists.
    fn delete_field(&mut self, tag: &str, position: usize) -> bool;

    /// Record that the record was changed, with a note for reviewers.
    fn set_amended(&mut self, note: &str);

    /// Report a non-fatal problem.
    fn warn(&mut self, message: &str);

    /// Report that the record fails a check.
    fn set_invalid(&mut self, reason: &str);
}

/// Severity of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// The record was changed
    Amendment,
    /// Something looked wrong but processing continued
    Warning,
    /// The record is invalid
    Error,
}

/// A note left on a record by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Kind of note
    pub kind: IssueKind,
    /// Rule that produced it, if one was active
    pub rule: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rule {
            Some(rule) => write!(f, "Rule {rule}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A record under check, plus the notes rules have left on it.
#[derive(Debug, Clone)]
pub struct AmendableRecord {
    record: Record,
    rule: Option<String>,
    amended: bool,
    valid: bool,
    issues: Vec<Issue>,
}

impl AmendableRecord {
    /// Wrap a record for checking.
    #[must_use]
    pub fn new(record: Record) -> Self {
        AmendableRecord {
            record,
            rule: None,
            amended: false,
            valid: true,
            issues: Vec::new(),
        }
    }

    /// Name the rule whose notes follow.
    pub fn set_rule(&mut self, name: impl Into<String>) {
        self.rule = Some(name.into());
    }

    /// Stop attributing notes to a rule.
    pub fn clear_rule(&mut self) {
        self.rule = None;
    }

    /// The wrapped record.
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Unwrap the (possibly amended) record.
    #[must_use]
    pub fn into_record(self) -> Record {
        self.record
    }

    /// True once any rule has changed the record.
    #[must_use]
    pub fn is_amended(&self) -> bool {
        self.amended
    }

    /// False once any rule has reported the record invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// All notes, in the order they were made.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Notes of one kind.
    pub fn issues_of(&self, kind: IssueKind) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.kind == kind)
    }

    /// Amendment notes.
    #[must_use]
    pub fn amendments(&self) -> Vec<&str> {
        self.issues_of(IssueKind::Amendment)
            .map(|issue| issue.message.as_str())
            .collect()
    }

    /// Warning messages.
    #[must_use]
    pub fn warnings(&self) -> Vec<&str> {
        self.issues_of(IssueKind::Warning)
            .map(|issue| issue.message.as_str())
            .collect()
    }

    fn push_issue(&mut self, kind: IssueKind, message: &str) {
        self.issues.push(Issue {
            kind,
            rule: self.rule.clone(),
            message: message.to_string(),
        });
    }
}

impl CheckRecord for AmendableRecord {
    fn iter_field(
        &self,
        locator: &FieldLocator,
        filter: Option<&SubfieldFilter>,
    ) -> Vec<FieldOccurrence> {
        let mut occurrences = Vec::new();
        for (tag, fields) in &self.record.fields {
            if !locator.matches_tag(tag) {
                continue;
            }
            for (field_index, field) in fields.iter().enumerate() {
                if !locator.matches_indicators(field.indicator1, field.indicator2) {
                    continue;
                }
                if filter.is_some_and(|f| !f.accepts(field)) {
                    continue;
                }
                for (subfield_index, subfield) in field.subfields.iter().enumerate() {
                    if !locator.matches_code(subfield.code) {
                        continue;
                    }
                    let field_name = format!(
                        "{tag}{}{}{}",
                        field.indicator1, field.indicator2, subfield.code
                    )
                    .replace(' ', "_");
                    occurrences.push(FieldOccurrence {
                        position: FieldPosition {
                            field_name,
                            tag: tag.clone(),
                            field_index,
                            subfield_index,
                        },
                        value: subfield.value.clone(),
                    });
                }
            }
        }
        occurrences
    }

    fn field_values(&self, locator: &FieldLocator) -> Vec<String> {
        self.record
            .field_values(locator)
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    fn add_field(&mut self, tag: &str, indicator1: char, indicator2: char, subfields: Vec<Subfield>) {
        let mut field = Field::new(tag, indicator1, indicator2);
        field.subfields.extend(subfields);
        self.record.add_field(field);
    }

    fn delete_field(&mut self, tag: &str, position: usize) -> bool {
        self.record.delete_field(tag, position).is_some()
    }

    fn set_amended(&mut self, note: &str) {
        tracing::debug!(rule = self.rule.as_deref().unwrap_or("-"), "amended: {note}");
        self.amended = true;
        self.push_issue(IssueKind::Amendment, note);
    }

    fn warn(&mut self, message: &str) {
        tracing::warn!(rule = self.rule.as_deref().unwrap_or("-"), "{message}");
        self.push_issue(IssueKind::Warning, message);
    }

    fn set_invalid(&mut self, reason: &str) {
        tracing::debug!(rule = self.rule.as_deref().unwrap_or("-"), "invalid: {reason}");
        self.valid = false;
        self.push_issue(IssueKind::Error, reason);
    }
}

/// A configured check that can be applied to records.
pub trait CheckPlugin: fmt::Debug {
    /// Inspect and possibly amend one record.
    fn check_record(&self, record: &mut dyn CheckRecord);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator(spec: &str) -> FieldLocator {
        FieldLocator::parse(spec).unwrap()
    }

    fn sample() -> AmendableRecord {
        let mut record = Record::new();
        record.add_field(
            Field::builder("035", ' ', ' ')
                .subfield_str('9', "arXiv")
                .subfield_str('a', "oai:arXiv.org:1001.0001")
                .build(),
        );
        record.add_field(
            Field::builder("035", ' ', ' ')
                .subfield_str('9', "SPIRES")
                .subfield_str('a', "SPIRES-1")
                .subfield_str('a', "SPIRES-2")
                .build(),
        );
        AmendableRecord::new(record)
    }

    #[test]
    fn test_iter_field_positions() {
        let record = sample();
        let hits = record.iter_field(&locator("035__a"), None);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].position.field_index, 0);
        assert_eq!(hits[0].position.subfield_index, 1);
        assert_eq!(hits[2].position.field_index, 1);
        assert_eq!(hits[2].position.subfield_index, 2);
        assert_eq!(hits[2].value, "SPIRES-2");
    }

    #[test]
    fn test_iter_field_with_filter() {
        let record = sample();
        let filter = SubfieldFilter::new('9', "SPIRES");
        let hits = record.iter_field(&locator("035__a"), Some(&filter));
        let values: Vec<&str> = hits.iter().map(|h| h.value.as_str()).collect();
        assert_eq!(values, vec!["SPIRES-1", "SPIRES-2"]);
    }

    #[test]
    fn test_iter_field_wildcard_code_names_concrete_field() {
        let record = sample();
        let hits = record.iter_field(&locator("035__%"), None);
        assert_eq!(hits.len(), 5);
        assert_eq!(hits[0].position.field_name, "035__9");
    }

    #[test]
    fn test_sinks_attribute_rule() {
        let mut record = sample();
        assert!(!record.is_amended());
        record.set_rule("clean_035");
        record.set_amended("changed something");
        record.warn("odd value");
        record.clear_rule();
        record.set_invalid("broken");

        assert!(record.is_amended());
        assert!(!record.is_valid());
        assert_eq!(record.amendments(), vec!["changed something"]);
        assert_eq!(record.warnings(), vec!["odd value"]);
        assert_eq!(record.issues()[0].to_string(), "Rule clean_035: changed something");
        assert_eq!(record.issues()[2].to_string(), "broken");
    }

    #[test]
    fn test_add_and_delete_through_trait() {
        let mut record = sample();
        record.add_field(
            "773",
            ' ',
            ' ',
            vec![Subfield {
                code: 'p',
                value: "JHEP".to_string(),
            }],
        );
        assert!(record.delete_field("035", 0));
        assert!(!record.delete_field("035", 5));
        assert_eq!(record.field_values(&locator("773__p")), vec!["JHEP"]);
        assert_eq!(record.record().field_count(), 2);
    }

    #[test]
    fn test_subfield_filter_from_json_pair() {
        let filter: SubfieldFilter = serde_json::from_str(r#"["9", "SPIRES"]"#).unwrap();
        assert_eq!(filter, SubfieldFilter::new('9', "SPIRES"));
    }
}
