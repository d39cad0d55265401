#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # inspire-marc
//!
//! Small bibliographic utilities over MARC-style records: a record-checking
//! rule that relocates pattern-matched values between fields, a citation
//! format element for dates and page counts, and an HTML snippet for the
//! jobs landing page.
//!
//! ## Quick Start
//!
//! ### Relocating values with a checking rule
//!
//! ```
//! use inspire_marc::bibcheck::{AmendableRecord, MovePatternToField};
//! use inspire_marc::{Field, Record};
//!
//! # fn main() -> inspire_marc::Result<()> {
//! let record = Record::builder()
//!     .field(Field::builder("035", ' ', ' ').subfield_str('a', "oai:arXiv.org:1207.7214").build())
//!     .build();
//!
//! let rule = MovePatternToField::new("035__a", "037__a", r"oai:arXiv.org:(?P<value>.+)")?;
//! let mut record = AmendableRecord::new(record);
//! rule.apply(&mut record);
//!
//! assert!(record.is_amended());
//! assert_eq!(record.record().get_field("037").unwrap().get_subfield('a'), Some("1207.7214"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Formatting a citation line
//!
//! ```
//! use inspire_marc::bibformat::{format_date_page, RecordContext};
//! use inspire_marc::{Field, Record};
//!
//! let record = Record::builder()
//!     .field(Field::builder("300", ' ', ' ').subfield_str('a', "12").build())
//!     .build();
//!
//! assert_eq!(format_date_page(&RecordContext::new(&record), " - ", " pages"), "12 pages");
//! ```
//!
//! ## Modules
//!
//! - [`record`] - Record structures (`Record`, `Field`, `Subfield`)
//! - [`locator`] - Six-character field locators with wildcards
//! - [`bibcheck`] - Record checking rules, rule configuration and batch runs
//! - [`bibformat`] - Citation format elements
//! - [`webstyle`] - HTML snippets for the web interface
//! - [`error`] - Error types and result type

pub mod bibcheck;
pub mod bibformat;
pub mod error;
pub mod locator;
/// Record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod webstyle;

pub use bibcheck::{AmendableRecord, CheckRecord, MovePatternToField, RuleSet, SubfieldFilter};
pub use bibformat::{DatePage, FormatContext, FormatElement, RecordContext};
pub use error::{BibError, Result};
pub use locator::FieldLocator;
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use webstyle::{render_jobs_matrix, JobCounts, JobsMatrix};
