//! Apply compiled rules to a batch of records.

use super::config::Rule;
use super::{AmendableRecord, Issue, IssueKind};
use crate::record::Record;
use serde::Serialize;
use tracing::{debug, info};

/// What the rules did to one record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordReport {
    /// Position of the record in the batch
    pub index: usize,
    /// Control number (001), when present
    pub record_id: Option<String>,
    /// Whether any rule changed the record
    pub amended: bool,
    /// Whether every rule accepted the record
    pub valid: bool,
    /// Notes left by the rules
    pub issues: Vec<Issue>,
}

/// Outcome of checking a batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskReport {
    /// One entry per record, in batch order
    pub records: Vec<RecordReport>,
}

impl TaskReport {
    /// Number of records changed by at least one rule.
    #[must_use]
    pub fn amended_count(&self) -> usize {
        self.records.iter().filter(|r| r.amended).count()
    }

    /// Number of records some rule reported invalid.
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.records.iter().filter(|r| !r.valid).count()
    }

    /// Total notes of one kind across the batch.
    #[must_use]
    pub fn count(&self, kind: IssueKind) -> usize {
        self.records
            .iter()
            .flat_map(|r| r.issues.iter())
            .filter(|issue| issue.kind == kind)
            .count()
    }
}

/// Run every rule, in order, over one record.
pub fn check_record(record: &mut AmendableRecord, rules: &[Rule]) {
    for rule in rules {
        record.set_rule(rule.name.as_str());
        rule.plugin.check_record(record);
    }
    record.clear_rule();
}

/// Run the rules over a batch, returning the amended records and a report.
#[must_use]
pub fn check_records(records: Vec<Record>, rules: &[Rule]) -> (Vec<Record>, TaskReport) {
    let mut report = TaskReport::default();
    let mut checked = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let mut amendable = AmendableRecord::new(record);
        check_record(&mut amendable, rules);

        let record_id = amendable
            .record()
            .get_control_field("001")
            .map(ToString::to_string);
        debug!(
            index,
            record_id = record_id.as_deref().unwrap_or("-"),
            amended = amendable.is_amended(),
            "record checked"
        );

        report.records.push(RecordReport {
            index,
            record_id,
            amended: amendable.is_amended(),
            valid: amendable.is_valid(),
            issues: amendable.issues().to_vec(),
        });
        checked.push(amendable.into_record());
    }

    info!(
        records = report.records.len(),
        amended = report.amended_count(),
        warnings = report.count(IssueKind::Warning),
        "bibcheck finished"
    );
    (checked, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bibcheck::RuleSet;
    use crate::record::Field;

    fn rules() -> Vec<Rule> {
        RuleSet::from_json_str(
            r#"{"rules": [{"name": "reports", "check": "move_pattern_to_field",
                "source_field": "500__a", "new_field": "037__a",
                "pattern": "Report number: (?P<value>\\S+)"}]}"#,
        )
        .unwrap()
        .compile()
        .unwrap()
    }

    fn note(id: &str, text: &str) -> Record {
        Record::builder()
            .control_field_str("001", id)
            .field(Field::builder("500", ' ', ' ').subfield_str('a', text).build())
            .build()
    }

    #[test]
    fn test_check_records_reports_per_record() {
        let batch = vec![
            note("1", "Report number: CERN-PH-TH-2012-001"),
            note("2", "Talk given at a conference"),
        ];

        let (records, report) = check_records(batch, &rules());

        assert_eq!(records.len(), 2);
        assert!(records[0].get_fields("500").is_none());
        assert_eq!(
            records[0].get_field("037").unwrap().get_subfield('a'),
            Some("CERN-PH-TH-2012-001")
        );
        assert_eq!(report.amended_count(), 1);
        assert_eq!(report.invalid_count(), 0);
        assert_eq!(report.count(IssueKind::Warning), 1);
        assert_eq!(report.records[1].record_id.as_deref(), Some("2"));
        assert_eq!(report.records[0].issues[0].rule.as_deref(), Some("reports"));
    }

    #[test]
    fn test_no_rules_leaves_records_untouched() {
        let batch = vec![note("1", "Report number: X")];
        let (records, report) = check_records(batch.clone(), &[]);
        assert_eq!(records, batch);
        assert_eq!(report.amended_count(), 0);
    }
}
