//! Bibliographic record structures and operations.
//!
//! This module provides the record types the checking rules and format
//! elements operate on:
//! - [`Record`] - Main bibliographic record structure
//! - [`Field`] - Variable data fields (010+)
//! - [`Subfield`] - Named data elements within fields
//!
//! # Examples
//!
//! Create a record with the builder API:
//!
//! ```
//! use inspire_marc::{Field, Record};
//!
//! let record = Record::builder()
//!     .control_field_str("001", "12345")
//!     .field(
//!         Field::builder("245", ' ', ' ')
//!             .subfield_str('a', "Title")
//!             .build(),
//!     )
//!     .build();
//!
//! assert_eq!(record.get_field("245").and_then(|f| f.get_subfield('a')), Some("Title"));
//! ```
//!
//! Look up values through a locator:
//!
//! ```
//! use inspire_marc::{Field, FieldLocator, Record};
//!
//! let mut record = Record::new();
//! record.add_field(Field::builder("300", ' ', ' ').subfield_str('a', "12").build());
//!
//! let pages = FieldLocator::parse("300__a").unwrap();
//! assert_eq!(record.field_values(&pages), vec!["12"]);
//! ```

use crate::locator::FieldLocator;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A bibliographic record
///
/// Fields are stored in insertion order using `IndexMap`, grouped by tag.
/// Positions handed out by the locator queries are local to a tag group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Control fields (000-009) - tag -> value, preserves insertion order
    #[serde(default)]
    pub control_fields: IndexMap<String, String>,
    /// Data fields (010+) - tag -> fields, preserves insertion order
    #[serde(default)]
    pub fields: IndexMap<String, Vec<Field>>,
}

/// A data field in a record (fields 010 and higher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 characters)
    pub tag: String,
    /// First indicator, `' '` when blank
    pub indicator1: char,
    /// Second indicator, `' '` when blank
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Record {
    /// Create an empty record
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for fluently constructing records
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// Add a control field (000-009)
    pub fn add_control_field(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        self.control_fields.insert(tag.into(), value.into());
    }

    /// Get a control field value
    #[must_use]
    pub fn get_control_field(&self, tag: &str) -> Option<&str> {
        self.control_fields.get(tag).map(String::as_str)
    }

    /// Add a data field at the end of its tag group
    pub fn add_field(&mut self, field: Field) {
        self.fields
            .entry(field.tag.clone())
            .or_default()
            .push(field);
    }

    /// Get all fields with a given tag
    #[must_use]
    pub fn get_fields(&self, tag: &str) -> Option<&[Field]> {
        self.fields.get(tag).map(Vec::as_slice)
    }

    /// Get first field with a given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.get(tag).and_then(|v| v.first())
    }

    /// Iterate over all fields in tag order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values().flat_map(|v| v.iter())
    }

    /// Iterate over fields matching a specific tag
    pub fn fields_by_tag(&self, tag: &str) -> impl Iterator<Item = &Field> {
        self.fields.get(tag).map(|v| v.iter()).into_iter().flatten()
    }

    /// Number of data fields in the record
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// Iterate over fields whose tag and indicators match a locator.
    ///
    /// Yields `(position_in_tag, field)` pairs in record order. The subfield
    /// code of the locator is not consulted here.
    pub fn fields_at<'a>(
        &'a self,
        locator: &'a FieldLocator,
    ) -> impl Iterator<Item = (usize, &'a Field)> + 'a {
        self.fields
            .iter()
            .filter(move |(tag, _)| locator.matches_tag(tag))
            .flat_map(|(_, fields)| fields.iter().enumerate())
            .filter(move |(_, field)| locator.matches_indicators(field.indicator1, field.indicator2))
    }

    /// Collect every subfield value addressed by a locator, in record order.
    #[must_use]
    pub fn field_values<'a>(&'a self, locator: &'a FieldLocator) -> Vec<&'a str> {
        self.fields_at(locator)
            .flat_map(|(_, field)| field.subfields.iter())
            .filter(|sf| locator.matches_code(sf.code))
            .map(|sf| sf.value.as_str())
            .collect()
    }

    /// Delete the field at `position` within the `tag` group.
    ///
    /// Later fields of the same tag shift down by one. An emptied tag group
    /// is dropped. Returns the removed field, or `None` if there is no
    /// field at that position.
    pub fn delete_field(&mut self, tag: &str, position: usize) -> Option<Field> {
        let group = self.fields.get_mut(tag)?;
        if position >= group.len() {
            return None;
        }
        let removed = group.remove(position);
        if group.is_empty() {
            self.fields.shift_remove(tag);
        }
        Some(removed)
    }
}

/// Builder for fluently constructing records
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Add a control field using string slices
    #[must_use]
    pub fn control_field_str(mut self, tag: &str, value: &str) -> Self {
        self.record.add_control_field(tag, value);
        self
    }

    /// Add a data field to the record being built
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}

impl Field {
    /// Create a new data field
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for constructing fields fluently
    ///
    /// # Examples
    ///
    /// ```
    /// use inspire_marc::Field;
    ///
    /// let field = Field::builder("773", ' ', ' ')
    ///     .subfield_str('p', "Phys.Rev.")
    ///     .subfield_str('v', "D66")
    ///     .build();
    /// assert_eq!(field.value(), "Phys.Rev. D66");
    /// ```
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Add a subfield
    pub fn add_subfield(&mut self, code: char, value: impl Into<String>) {
        self.subfields.push(Subfield {
            code,
            value: value.into(),
        });
    }

    /// Get first value for a subfield code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// Iterate over subfields with a specific code
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |sf| sf.code == code)
            .map(|sf| sf.value.as_str())
    }

    /// True if the field holds a subfield with exactly this code and value
    #[must_use]
    pub fn has_subfield_value(&self, code: char, value: &str) -> bool {
        self.subfields
            .iter()
            .any(|sf| sf.code == code && sf.value == value)
    }

    /// Concatenate all subfield values with spaces
    #[must_use]
    pub fn value(&self) -> String {
        self.subfields
            .iter()
            .map(|sf| sf.value.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Builder for fluently constructing fields
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield using a string slice
    #[must_use]
    pub fn subfield_str(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
