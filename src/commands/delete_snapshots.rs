use super::{report_entry, EntryOutcome};
use crate::prelude::*;

pub struct DeleteSnapshots<'a, 'b> {
    env: &'a mut Environment<'b>,
    summary: Summary,
}

impl<'a, 'b> DeleteSnapshots<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>) -> Self {
        Self {
            env,
            summary: Summary::new("snapshots").with_deleted_snapshots(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        let config = self.env.config;

        for entry in config.snapshots() {
            if self.env.cancellation.is_cancelled() {
                break;
            }

            self.process_entry(entry)?;
        }

        write!(self.env.stdout, "{}", self.summary)?;

        self.env.ensure_not_cancelled()?;

        if self.summary.has_errors() {
            bail!("Failed to delete some of the snapshots");
        }

        self.summary.as_result()
    }

    fn process_entry(&mut self, entry: &SnapshotEntry) -> Result<()> {
        writeln!(self.env.stdout, "{}", entry.name.as_str().bold())?;

        let result = self.try_process_entry(entry);

        report_entry(
            self.env.stdout,
            &mut self.summary,
            result,
            Summary::add_deleted_snapshot,
        )
    }

    fn try_process_entry(&mut self, entry: &SnapshotEntry) -> Result<EntryOutcome> {
        self.summary.add_processed_entry();

        let project = self.env.project.clone();

        write!(
            self.env.stdout,
            "  - deleting snapshot: {}",
            entry.name.as_str().italic()
        )?;

        self.env
            .gce
            .get_snapshot(&project, &entry.name)
            .context("Couldn't find snapshot")?;

        if self.env.dry_run {
            return Ok(EntryOutcome::DryRun);
        }

        let operation = self
            .env
            .gce
            .delete_snapshot(&project, &entry.name)
            .context("Couldn't delete snapshot")?;

        let completed = self
            .env
            .operation_waiter()
            .wait(&project, &operation, "snapshot deletion")
            .context("Couldn't delete snapshot")?;

        Ok(EntryOutcome::Done {
            details: Default::default(),
            warnings: completed.warnings,
        })
    }
}
