// Per-dashboard classification and run summary
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    Identical,
    Changed,
    Missing,
}

impl SyncStatus {
    /// True when the local file does not match the remote document.
    pub fn needs_write(self) -> bool {
        !matches!(self, SyncStatus::Identical)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStatus::Identical => "identical",
            SyncStatus::Changed => "changed",
            SyncStatus::Missing => "missing",
        };
        f.write_str(label)
    }
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total: usize,
    pub identical: usize,
    pub changed: usize,
    pub missing: usize,
    pub renamed: usize,
    pub written: usize,
    pub failed: usize,
}

impl SyncReport {
    pub fn record(&mut self, status: SyncStatus) {
        match status {
            SyncStatus::Identical => self.identical += 1,
            SyncStatus::Changed => self.changed += 1,
            SyncStatus::Missing => self.missing += 1,
        }
    }

    pub fn has_changes(&self) -> bool {
        self.changed + self.missing + self.renamed > 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut report = SyncReport::default();
        report.record(SyncStatus::Identical);
        report.record(SyncStatus::Missing);
        report.record(SyncStatus::Changed);
        report.record(SyncStatus::Changed);

        assert_eq!(report.identical, 1);
        assert_eq!(report.missing, 1);
        assert_eq!(report.changed, 2);
        assert!(report.has_changes());
        assert!(!report.has_failures());
    }

    #[test]
    fn test_needs_write() {
        assert!(!SyncStatus::Identical.needs_write());
        assert!(SyncStatus::Changed.needs_write());
        assert!(SyncStatus::Missing.needs_write());
    }
}
