//! Import summary and reporting

use super::index_map::EntityKind;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Created and skipped counts for one document section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub created: usize,
    pub skipped: usize,
}

/// A record the importer skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub kind: EntityKind,
    /// Position of the record in its section
    pub index: usize,
    pub message: String,
}

/// Summary of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    sections: BTreeMap<EntityKind, SectionCounts>,

    /// Sections left alone because no creator was registered for them
    pub not_imported: Vec<EntityKind>,

    /// Every skipped record, in processing order
    pub failures: Vec<ImportFailure>,

    pub duration: Duration,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn record_created(&mut self, kind: EntityKind) {
        self.sections.entry(kind).or_default().created += 1;
    }

    pub fn record_skipped(&mut self, kind: EntityKind, index: usize, message: impl Into<String>) {
        self.sections.entry(kind).or_default().skipped += 1;
        self.failures.push(ImportFailure {
            kind,
            index,
            message: message.into(),
        });
    }

    pub fn mark_not_imported(&mut self, kind: EntityKind) {
        self.not_imported.push(kind);
    }

    pub fn counts(&self, kind: EntityKind) -> SectionCounts {
        self.sections.get(&kind).copied().unwrap_or_default()
    }

    pub fn created(&self, kind: EntityKind) -> usize {
        self.counts(kind).created
    }

    pub fn skipped(&self, kind: EntityKind) -> usize {
        self.counts(kind).skipped
    }

    pub fn total_created(&self) -> usize {
        self.sections.values().map(|c| c.created).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.sections.values().map(|c| c.skipped).sum()
    }

    /// Whether every attempted record was created
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            created = self.total_created(),
            skipped = self.total_skipped(),
            duration_ms = self.duration.as_millis() as u64,
            "Import completed"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                skipped = self.failures.len(),
                "Import completed with skipped records"
            );
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for kind in EntityKind::IMPORT_ORDER {
            if self.not_imported.contains(&kind) {
                writeln!(f, "  {:<14} not imported", kind.key())?;
                continue;
            }
            let counts = self.counts(kind);
            writeln!(
                f,
                "  {:<14} {} created, {} skipped",
                kind.key(),
                counts.created,
                counts.skipped
            )?;
        }
        for failure in &self.failures {
            writeln!(
                f,
                "  skipped {}[{}]: {}",
                failure.kind, failure.index, failure.message
            )?;
        }
        write!(
            f,
            "  Total: {} created, {} skipped",
            self.total_created(),
            self.total_skipped()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_per_section() {
        let mut summary = ImportSummary::new();
        summary.record_created(EntityKind::Patients);
        summary.record_created(EntityKind::Patients);
        summary.record_skipped(EntityKind::Patients, 1, "Invalid date 'soon'");
        summary.record_created(EntityKind::Hospitals);

        assert_eq!(summary.created(EntityKind::Patients), 2);
        assert_eq!(summary.skipped(EntityKind::Patients), 1);
        assert_eq!(summary.created(EntityKind::Doctors), 0);
        assert_eq!(summary.total_created(), 3);
        assert_eq!(summary.total_skipped(), 1);
        assert!(!summary.is_complete());
        assert_eq!(summary.failures[0].index, 1);
    }

    #[test]
    fn test_display_lists_sections_and_failures() {
        let mut summary = ImportSummary::new().with_duration(Duration::from_millis(5));
        summary.mark_not_imported(EntityKind::LogEntries);
        summary.record_skipped(EntityKind::Tests, 0, "missing field `date`");

        let text = summary.to_string();
        assert!(text.contains("log_entries    not imported"));
        assert!(text.contains("tests          0 created, 1 skipped"));
        assert!(text.contains("skipped tests[0]: missing field `date`"));
        assert!(text.ends_with("Total: 0 created, 1 skipped"));
    }

    #[test]
    fn test_empty_summary_is_complete() {
        let summary = ImportSummary::new();
        assert!(summary.is_complete());
        assert_eq!(summary.total_created(), 0);
        summary.log_summary();
    }
}
