//! Common test helpers and utilities shared across test suite.

use inspire_marc::{AmendableRecord, Field, Record};

#[allow(dead_code)]
/// Builds a single-subfield field with blank indicators.
pub fn simple_field(tag: &str, code: char, value: &str) -> Field {
    Field::builder(tag, ' ', ' ').subfield_str(code, value).build()
}

#[allow(dead_code)]
/// Creates a realistic preprint record for relocation tests.
///
/// Includes 035 identifiers from several sources, an existing 037 report
/// number, and notes in 500.
pub fn create_preprint_record() -> Record {
    Record::builder()
        .control_field_str("001", "1120537")
        .field(
            Field::builder("035", ' ', ' ')
                .subfield_str('9', "arXiv")
                .subfield_str('a', "oai:arXiv.org:1207.7214")
                .build(),
        )
        .field(
            Field::builder("035", ' ', ' ')
                .subfield_str('9', "SPIRES")
                .subfield_str('a', "9039217")
                .build(),
        )
        .field(
            Field::builder("035", ' ', ' ')
                .subfield_str('9', "arXiv")
                .subfield_str('a', "oai:arXiv.org:1207.7235")
                .build(),
        )
        .field(simple_field("037", 'a', "1207.7235"))
        .field(simple_field("100", 'a', "Aad, Georges"))
        .field(simple_field("500", 'a', "Report number: CERN-PH-EP-2012-218"))
        .field(simple_field("500", 'a', "24 pages plus author list"))
        .build()
}

/// Wraps the preprint record for checking.
#[allow(dead_code)]
pub fn amendable_preprint() -> AmendableRecord {
    AmendableRecord::new(create_preprint_record())
}
