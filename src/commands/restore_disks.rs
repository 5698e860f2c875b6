use super::{report_entry, EntryOutcome};
use crate::prelude::*;

pub struct RestoreDisks<'a, 'b> {
    env: &'a mut Environment<'b>,
    summary: Summary,
}

impl<'a, 'b> RestoreDisks<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>) -> Self {
        Self {
            env,
            summary: Summary::new("disks").with_restored_disks(),
        }
    }

    pub fn run(mut self) -> Result<()> {
        let config = self.env.config;

        for entry in config.disks() {
            if self.env.cancellation.is_cancelled() {
                break;
            }

            self.process_entry(entry)?;
        }

        write!(self.env.stdout, "{}", self.summary)?;

        self.env.ensure_not_cancelled()?;

        if self.summary.has_errors() {
            bail!("Failed to restore some of the disks");
        }

        self.summary.as_result()
    }

    fn process_entry(&mut self, entry: &DiskEntry) -> Result<()> {
        writeln!(self.env.stdout, "{}", entry.name.as_str().bold())?;

        let result = self.try_process_entry(entry);

        report_entry(
            self.env.stdout,
            &mut self.summary,
            result,
            Summary::add_restored_disk,
        )
    }

    fn try_process_entry(&mut self, entry: &DiskEntry) -> Result<EntryOutcome> {
        self.summary.add_processed_entry();

        let project = self.env.project.clone();
        let spec = entry.spec(&project);

        spec.validate()?;

        write!(
            self.env.stdout,
            "  - source snapshot: {}",
            spec.source_snapshot_link().as_str().italic()
        )?;

        self.env
            .gce
            .get_snapshot(&spec.source_project, &spec.source_snapshot)
            .context("Couldn't find source snapshot")?;

        writeln!(self.env.stdout)?;

        write!(
            self.env.stdout,
            "  - creating disk: {}",
            spec.scope
                .disk_path(&project, &spec.name)
                .as_str()
                .italic()
        )?;

        if self.env.dry_run {
            return Ok(EntryOutcome::DryRun);
        }

        let operation = self
            .env
            .gce
            .insert_disk(&project, &spec)
            .context("Couldn't create disk")?;

        let completed = self
            .env
            .operation_waiter()
            .wait(&project, &operation, "disk creation")
            .context("Couldn't create disk")?;

        self.env
            .disk_readiness_waiter()
            .wait(&project, &spec.scope, &spec.name)
            .context("Disk didn't become ready")?;

        let disk = self
            .env
            .locator()
            .resolve(&project, &spec.scope, &spec.name)
            .context("Couldn't resolve restored disk")?;

        Ok(EntryOutcome::Done {
            details: vec![format!("self-link: {}", disk.self_link)],
            warnings: completed.warnings,
        })
    }
}
