//! Move values matching a pattern from one field to another.
//!
//! The new value is taken from the `value` named group of the pattern
//! (`(?P<value>...)`), which must match at the start of a source value.
//! A subfield filter can further restrict the source fields.
//!
//! When a value matches, the whole source field is deleted. By default the
//! new field is only created when it does not duplicate a value already
//! present at the target; a duplicate is therefore dropped, not kept at the
//! source. `allow_duplicates` disables the duplicate check.
//!
//! # Examples
//!
//! ```
//! use inspire_marc::bibcheck::{relocate, AmendableRecord, ValuePattern};
//! use inspire_marc::{Field, FieldLocator, Record};
//!
//! let mut record = Record::new();
//! record.add_field(Field::builder("500", ' ', ' ').subfield_str('a', "Report: CERN-TH-2011-001").build());
//! let mut record = AmendableRecord::new(record);
//!
//! let summary = relocate(
//!     &mut record,
//!     &FieldLocator::parse("500__a").unwrap(),
//!     &FieldLocator::parse("037__a").unwrap(),
//!     &ValuePattern::new(r"Report: (?P<value>\S+)").unwrap(),
//!     None,
//!     false,
//! );
//!
//! assert_eq!(summary.added, 1);
//! assert!(record.record().get_fields("500").is_none());
//! assert_eq!(record.record().get_field("037").unwrap().get_subfield('a'), Some("CERN-TH-2011-001"));
//! ```

use super::{CheckPlugin, CheckRecord, FieldPosition, SubfieldFilter};
use crate::error::{BibError, Result};
use crate::locator::{FieldLocator, WILDCARD};
use crate::record::Subfield;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Name of the capture group holding the relocated value.
pub const VALUE_GROUP: &str = "value";

/// A compiled pattern anchored at the start of the value, with a `value` group.
#[derive(Debug, Clone)]
pub struct ValuePattern {
    source: String,
    regex: Regex,
}

impl ValuePattern {
    /// Compile `pattern` so that it only matches at the start of a value.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::InvalidPattern`] if the regex does not compile and
    /// [`BibError::MissingValueGroup`] if it has no `value` named group.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!(r"\A(?:{pattern})"))?;
        if !regex.capture_names().flatten().any(|name| name == VALUE_GROUP) {
            return Err(BibError::MissingValueGroup(pattern.to_string()));
        }
        Ok(ValuePattern {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written by the caller.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The `value` capture, if the pattern matches at the start of `haystack`.
    ///
    /// A `value` group that did not take part in the match yields `""`.
    #[must_use]
    pub fn extract<'h>(&self, haystack: &'h str) -> Option<&'h str> {
        self.regex
            .captures(haystack)
            .map(|caps| caps.name(VALUE_GROUP).map_or("", |m| m.as_str()))
    }
}

/// Counts describing one relocation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelocationSummary {
    /// Source values the pattern matched
    pub matched: usize,
    /// New fields written at the target
    pub added: usize,
    /// Source fields deleted
    pub removed: usize,
    /// Non-empty source values the pattern did not match
    pub unmatched: usize,
}

impl RelocationSummary {
    /// Matched values that were not written to the target.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.matched - self.added
    }
}

#[derive(Debug)]
enum Step {
    Move {
        position: FieldPosition,
        value: String,
        write: bool,
    },
    Unmatched {
        value: String,
    },
}

/// Move pattern-matched values from `source_field` to `new_field`.
///
/// Matching runs over a snapshot of the source occurrences first; the
/// resulting additions and deletions are applied afterwards, with each
/// deletion index shifted by the number of fields already removed from the
/// same tag group. A field matched through several subfields is deleted once.
///
/// # Panics
///
/// Panics if `new_field` has a wildcard in its tag or subfield code: a
/// field cannot be created at such an address.
pub fn relocate<R: CheckRecord + ?Sized>(
    record: &mut R,
    source_field: &FieldLocator,
    new_field: &FieldLocator,
    pattern: &ValuePattern,
    subfield_filter: Option<&SubfieldFilter>,
    allow_duplicates: bool,
) -> RelocationSummary {
    assert!(
        new_field.has_concrete_tag() && new_field.code() != WILDCARD,
        "target locator {new_field} must name a concrete tag and subfield code"
    );

    let mut existing: HashSet<String> = record.field_values(new_field).into_iter().collect();
    let occurrences = record.iter_field(source_field, subfield_filter);

    let mut plan = Vec::with_capacity(occurrences.len());
    for occurrence in occurrences {
        if occurrence.value.is_empty() {
            continue;
        }
        let captured = pattern.extract(&occurrence.value).map(str::to_string);
        match captured {
            Some(value) => {
                let write =
                    allow_duplicates || (!value.is_empty() && !existing.contains(&value));
                trace!(
                    field = %occurrence.position.field_name,
                    value = value.as_str(),
                    write,
                    "pattern matched"
                );
                if write {
                    existing.insert(value.clone());
                }
                plan.push(Step::Move {
                    position: occurrence.position,
                    value,
                    write,
                });
            }
            None => plan.push(Step::Unmatched {
                value: occurrence.value,
            }),
        }
    }

    apply(record, source_field, new_field, pattern, plan)
}

fn apply<R: CheckRecord + ?Sized>(
    record: &mut R,
    source_field: &FieldLocator,
    new_field: &FieldLocator,
    pattern: &ValuePattern,
    plan: Vec<Step>,
) -> RelocationSummary {
    let new_tag = new_field.tag();
    let (indicator1, indicator2) = new_field.concrete_indicators();
    let mut summary = RelocationSummary::default();
    let mut deleted_per_tag: HashMap<String, usize> = HashMap::new();
    let mut deleted_fields: HashSet<(String, usize)> = HashSet::new();

    for step in plan {
        match step {
            Step::Move {
                position,
                value,
                write,
            } => {
                summary.matched += 1;
                if write {
                    record.add_field(
                        &new_tag,
                        indicator1,
                        indicator2,
                        vec![Subfield {
                            code: new_field.code(),
                            value: value.clone(),
                        }],
                    );
                    summary.added += 1;
                }
                if deleted_fields.insert((position.tag.clone(), position.field_index)) {
                    let offset = deleted_per_tag.entry(position.tag.clone()).or_insert(0);
                    if record.delete_field(&position.tag, position.field_index - *offset) {
                        *offset += 1;
                        summary.removed += 1;
                    }
                }
                record.set_amended(&format!(
                    "(re)moved field '{source_field}' containing '{value}'"
                ));
            }
            Step::Unmatched { value } => {
                summary.unmatched += 1;
                record.warn(&format!(
                    "no match for [{}] against [{value}]",
                    pattern.as_str()
                ));
            }
        }
    }

    summary
}

/// The `move_pattern_to_field` check with its parameters bound.
#[derive(Debug, Clone)]
pub struct MovePatternToField {
    /// Where values are read from
    pub source_field: FieldLocator,
    /// Where captured values are written
    pub new_field: FieldLocator,
    /// Pattern with a `value` group
    pub pattern: ValuePattern,
    /// Optional restriction on source fields
    pub subfield_filter: Option<SubfieldFilter>,
    /// Write captured values even if already present at the target
    pub allow_duplicates: bool,
}

impl MovePatternToField {
    /// Bind the check to its locators and pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if a locator is malformed, if `new_field` contains a
    /// wildcard tag or code, or if the pattern is invalid or lacks a `value` group.
    pub fn new(source_field: &str, new_field: &str, pattern: &str) -> Result<Self> {
        let source_field = FieldLocator::parse(source_field)?;
        let new_field = FieldLocator::parse(new_field)?;
        if !new_field.has_concrete_tag() || new_field.code() == WILDCARD {
            return Err(BibError::InvalidLocator(format!(
                "'{new_field}' cannot be used as a target: wildcard tag or code"
            )));
        }
        Ok(MovePatternToField {
            source_field,
            new_field,
            pattern: ValuePattern::new(pattern)?,
            subfield_filter: None,
            allow_duplicates: false,
        })
    }

    /// Only consider source fields holding `$code value`.
    #[must_use]
    pub fn with_subfield_filter(mut self, filter: SubfieldFilter) -> Self {
        self.subfield_filter = Some(filter);
        self
    }

    /// Write captured values even when the target already holds them.
    #[must_use]
    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }

    /// Run the check against one record.
    pub fn apply<R: CheckRecord + ?Sized>(&self, record: &mut R) -> RelocationSummary {
        relocate(
            record,
            &self.source_field,
            &self.new_field,
            &self.pattern,
            self.subfield_filter.as_ref(),
            self.allow_duplicates,
        )
    }
}

impl CheckPlugin for MovePatternToField {
    fn check_record(&self, record: &mut dyn CheckRecord) {
        let summary = self.apply(record);
        trace!(?summary, source = %self.source_field, target = %self.new_field, "relocation done");
    }
}
