//! Citation format elements.
//!
//! A format element turns a record into a short piece of display text. The
//! element only sees the record through a [`FormatContext`], which provides
//! the two helpers elements are built from: a rendered publication date and a
//! generic tag/subfield value getter.
//!
//! Each element also tells the caller whether its output must be escaped
//! before being placed in a page ([`FormatElement::escape_values`]);
//! [`render_element`] applies that decision.
//!
//! # Examples
//!
//! ```
//! use inspire_marc::bibformat::{render_element, DatePage, RecordContext};
//! use inspire_marc::{Field, Record};
//!
//! let record = Record::builder()
//!     .field(Field::builder("269", ' ', ' ').subfield_str('c', "2011-03-15").build())
//!     .field(Field::builder("300", ' ', ' ').subfield_str('a', "24").build())
//!     .build();
//!
//! let ctx = RecordContext::new(&record);
//! assert_eq!(render_element(&DatePage::default(), &ctx), "Mar 15, 2011 - 24 pages");
//! ```

pub mod datepage;

use crate::locator::FieldLocator;
use crate::record::Record;
use chrono::NaiveDate;

pub use datepage::{format_date_page, DatePage};

/// Fields consulted for the publication date, in order of preference.
pub const DATE_SOURCES: [&str; 4] = ["269__c", "260__c", "502__d", "773__y"];

/// The record data available to format elements.
pub trait FormatContext {
    /// The record's display date, or `""` when it has none.
    fn date(&self) -> String;

    /// Values at `tag` (`TTT`, `TTTc` or `TTTiic`), first `limit` instances
    /// (`0` for all) joined by a space; `""` when absent.
    fn field_value(&self, tag: &str, limit: usize) -> String;
}

/// How a caller must treat an element's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeMode {
    /// Output is already safe; insert verbatim
    Raw,
    /// Escape HTML special characters
    Html,
}

impl EscapeMode {
    /// Numeric code used by format templates (`0` = no escaping).
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            EscapeMode::Raw => 0,
            EscapeMode::Html => 1,
        }
    }
}

/// A named piece of display logic.
pub trait FormatElement {
    /// Element name as referenced from format templates.
    fn name(&self) -> &'static str;

    /// Produce the element's text for one record.
    fn format(&self, ctx: &dyn FormatContext) -> String;

    /// Whether the output must be escaped by the caller.
    fn escape_values(&self) -> EscapeMode {
        EscapeMode::Html
    }
}

/// Format an element and apply its escape mode.
#[must_use]
pub fn render_element(element: &dyn FormatElement, ctx: &dyn FormatContext) -> String {
    let out = element.format(ctx);
    match element.escape_values() {
        EscapeMode::Raw => out,
        EscapeMode::Html => escape_html(&out),
    }
}

/// Escape HTML special characters
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A [`FormatContext`] reading straight from a [`Record`].
#[derive(Debug, Clone, Copy)]
pub struct RecordContext<'a> {
    record: &'a Record,
}

impl<'a> RecordContext<'a> {
    /// Wrap a record.
    #[must_use]
    pub fn new(record: &'a Record) -> Self {
        RecordContext { record }
    }
}

impl FormatContext for RecordContext<'_> {
    fn date(&self) -> String {
        DATE_SOURCES
            .iter()
            .map(|spec| FieldLocator::new_unchecked(spec))
            .find_map(|locator| {
                self.record
                    .field_values(&locator)
                    .into_iter()
                    .map(str::trim)
                    .find(|value| !value.is_empty())
                    .map(render_date)
            })
            .unwrap_or_default()
    }

    fn field_value(&self, tag: &str, limit: usize) -> String {
        let Some((locator, whole_field)) = locator_for(tag) else {
            return String::new();
        };
        let values: Vec<String> = if whole_field {
            self.record
                .fields_at(&locator)
                .map(|(_, field)| field.value())
                .collect()
        } else {
            self.record
                .field_values(&locator)
                .into_iter()
                .map(ToString::to_string)
                .collect()
        };
        let take = if limit == 0 { values.len() } else { limit };
        values.into_iter().take(take).collect::<Vec<_>>().join(" ")
    }
}

/// Turn a `TTT`, `TTTc` or `TTTiic` spec into a locator. The flag is true
/// when the spec names whole fields rather than subfields.
fn locator_for(tag: &str) -> Option<(FieldLocator, bool)> {
    let chars: Vec<char> = tag.chars().collect();
    let tag3: String = chars.iter().take(3).collect();
    match chars.len() {
        3 => FieldLocator::parse(&format!("{tag3}%%%")).ok().map(|l| (l, true)),
        4 => FieldLocator::parse(&format!("{tag3}%%{}", chars[3]))
            .ok()
            .map(|l| (l, false)),
        6 => FieldLocator::parse(tag).ok().map(|l| (l, false)),
        _ => None,
    }
}

/// Render `YYYY-MM-DD` as `Mar 15, 2011` and `YYYY-MM` as `Mar 2011`.
/// Anything else is returned unchanged.
fn render_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %-d, %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    raw.to_string()
}
