use anyhow::{bail, Result};
use colored::Colorize;
use std::fmt;

pub struct Summary {
    title: &'static str,
    subject: &'static str,
    processed_entries: usize,
    created_snapshots: Option<usize>,
    restored_disks: Option<usize>,
    deleted_snapshots: Option<usize>,
    skipped_entries: usize,
    warnings: usize,
    errors: usize,
}

impl Summary {
    /// Creates an empty summary; `subject` names what the command iterates
    /// over (e.g. `snapshots`) and is used when there's nothing to process.
    pub fn new(subject: &'static str) -> Self {
        Self {
            title: "Summary",
            subject,
            processed_entries: Default::default(),
            created_snapshots: Default::default(),
            restored_disks: Default::default(),
            deleted_snapshots: Default::default(),
            skipped_entries: Default::default(),
            warnings: Default::default(),
            errors: Default::default(),
        }
    }

    pub fn with_created_snapshots(mut self) -> Self {
        self.created_snapshots = Some(0);
        self
    }

    pub fn with_restored_disks(mut self) -> Self {
        self.restored_disks = Some(0);
        self
    }

    pub fn with_deleted_snapshots(mut self) -> Self {
        self.deleted_snapshots = Some(0);
        self
    }

    pub fn add_processed_entry(&mut self) {
        self.processed_entries += 1;
    }

    pub fn add_created_snapshot(&mut self) {
        Self::bump(&mut self.created_snapshots);
    }

    pub fn add_restored_disk(&mut self) {
        Self::bump(&mut self.restored_disks);
    }

    pub fn add_deleted_snapshot(&mut self) {
        Self::bump(&mut self.deleted_snapshots);
    }

    pub fn add_skipped_entry(&mut self) {
        self.skipped_entries += 1;
    }

    pub fn add_warnings(&mut self, n: usize) {
        self.warnings += n;
    }

    pub fn add_error(&mut self) {
        self.errors += 1;
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn as_result(&self) -> Result<()> {
        if self.processed_entries == 0 {
            bail!(
                "Found no {} in the configuration - nothing to do",
                self.subject
            );
        }

        Ok(())
    }

    fn bump(counter: &mut Option<usize>) {
        *counter.get_or_insert(0) += 1;
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.bold())?;
        writeln!(f, "{}", "-".repeat(self.title.chars().count()))?;
        writeln!(f, "  processed entries: {}", self.processed_entries)?;

        if let Some(n) = self.created_snapshots {
            writeln!(f, "  created snapshots: {}", n)?;
        }

        if let Some(n) = self.restored_disks {
            writeln!(f, "  restored disks: {}", n)?;
        }

        if let Some(n) = self.deleted_snapshots {
            writeln!(f, "  deleted snapshots: {}", n)?;
        }

        if self.skipped_entries > 0 {
            writeln!(f, "  skipped (dry run): {}", self.skipped_entries)?;
        }

        if self.warnings > 0 {
            writeln!(f, "  warnings: {}", self.warnings)?;
        }

        if self.errors > 0 {
            writeln!(f, "  errors: {}", self.errors)?;
        }

        Ok(())
    }
}
