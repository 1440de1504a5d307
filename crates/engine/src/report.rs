//! Accumulating, categorized purge report.
//!
//! Four append-only buckets collect one line per finding across the whole
//! session; the tombstone phase contributes a bare count. Everything is
//! written to the daily log in one final flush — empty buckets still get an
//! explicit "none found." line so the log documents absences too.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use sweep_core::SweepError;

/// Report category. `Protected` also carries the protected-second cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// Privileged accounts idle over the advisory threshold.
    PrivilegedIdle,
    /// Accounts exempted by activity or second-account rules.
    Protected,
    /// Accounts actually removed (including ghosts).
    Purged,
    /// Records needing manual review.
    Anomalous,
}

const BUCKETS: [(Bucket, &str); 4] = [
    (Bucket::PrivilegedIdle, "Privileged accounts idle over a year"),
    (Bucket::Protected, "Protected idle accounts"),
    (Bucket::Purged, "Purged accounts"),
    (Bucket::Anomalous, "Anomalous records (manual review)"),
];

/// Accumulates categorized findings until the single final flush.
#[derive(Default)]
pub struct ReportAccumulator {
    privileged: Vec<String>,
    protected: Vec<String>,
    purged: Vec<String>,
    anomalous: Vec<String>,
    reaped: usize,
    flushed: bool,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one finding line to a bucket. Buckets are append-only until
    /// flush.
    pub fn append(&mut self, bucket: Bucket, line: String) {
        debug_assert!(!self.flushed, "report appended after flush");
        self.bucket_mut(bucket).push(line);
    }

    /// Add to the reaped-tombstone count.
    pub fn add_reaped(&mut self, count: usize) {
        self.reaped += count;
    }

    pub fn count(&self, bucket: Bucket) -> usize {
        self.bucket_ref(bucket).len()
    }

    pub fn reaped(&self) -> usize {
        self.reaped
    }

    pub fn lines(&self, bucket: Bucket) -> &[String] {
        self.bucket_ref(bucket)
    }

    /// One-line totals for progress and final summaries.
    pub fn totals_line(&self) -> String {
        format!(
            "{} purged, {} flagged, {} protected, {} anomalous",
            self.count(Bucket::Purged),
            self.count(Bucket::PrivilegedIdle),
            self.count(Bucket::Protected),
            self.count(Bucket::Anomalous),
        )
    }

    /// Write the whole report to the daily log. Called exactly once, when
    /// the session finishes.
    pub fn flush(&mut self, log_path: &Path) -> Result<(), SweepError> {
        debug_assert!(!self.flushed, "report flushed twice");

        let mut file = OpenOptions::new().create(true).append(true).open(log_path)?;

        for (bucket, title) in BUCKETS {
            writeln!(file, "-- {} --", title)?;
            let lines = self.bucket_ref(bucket);
            if lines.is_empty() {
                writeln!(file, "none found.")?;
            } else {
                for line in lines {
                    writeln!(file, "{}", line)?;
                }
            }
            writeln!(file)?;
        }

        writeln!(file, "tombstones reaped: {}", self.reaped)?;
        self.flushed = true;
        Ok(())
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<String> {
        match bucket {
            Bucket::PrivilegedIdle => &mut self.privileged,
            Bucket::Protected => &mut self.protected,
            Bucket::Purged => &mut self.purged,
            Bucket::Anomalous => &mut self.anomalous,
        }
    }

    fn bucket_ref(&self, bucket: Bucket) -> &Vec<String> {
        match bucket {
            Bucket::PrivilegedIdle => &self.privileged,
            Bucket::Protected => &self.protected,
            Bucket::Purged => &self.purged,
            Bucket::Anomalous => &self.anomalous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn appends_accumulate_per_bucket() {
        let mut report = ReportAccumulator::new();
        report.append(Bucket::Purged, "bob: idle 400 days".to_string());
        report.append(Bucket::Purged, "eve: idle 500 days".to_string());
        report.append(Bucket::Anomalous, "junk: invalid record".to_string());

        assert_eq!(report.count(Bucket::Purged), 2);
        assert_eq!(report.count(Bucket::Anomalous), 1);
        assert_eq!(report.count(Bucket::Protected), 0);
    }

    #[test]
    fn flush_writes_sections_and_none_found_lines() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("purge.log");

        let mut report = ReportAccumulator::new();
        report.append(Bucket::Purged, "bob: idle 400 days".to_string());
        report.add_reaped(3);
        report.flush(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("-- Purged accounts --\nbob: idle 400 days"));
        // Every empty bucket is documented as such.
        assert!(written.contains("-- Privileged accounts idle over a year --\nnone found."));
        assert!(written.contains("-- Protected idle accounts --\nnone found."));
        assert!(written.contains("-- Anomalous records (manual review) --\nnone found."));
        assert!(written.contains("tombstones reaped: 3"));
    }

    #[test]
    fn flush_appends_to_an_existing_log() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("purge.log");
        std::fs::write(&path, "header line\n").unwrap();

        let mut report = ReportAccumulator::new();
        report.flush(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("header line\n"));
        assert!(written.contains("tombstones reaped: 0"));
    }

    #[test]
    fn totals_line_reflects_counts() {
        let mut report = ReportAccumulator::new();
        report.append(Bucket::Purged, "a".to_string());
        report.append(Bucket::Protected, "b".to_string());
        report.append(Bucket::Protected, "c".to_string());

        assert_eq!(report.totals_line(), "1 purged, 0 flagged, 2 protected, 0 anomalous");
    }
}
