use super::{report_entry, EntryOutcome};
use crate::prelude::*;

pub struct CreateSnapshots<'a, 'b> {
    env: &'a mut Environment<'b>,
    summary: Summary,
}

impl<'a, 'b> CreateSnapshots<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>) -> Self {
        Self {
            env,
            summary: Summary::new("snapshots").with_created_snapshots(),
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
            bail!("Failed to create some of the snapshots");
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
            Summary::add_created_snapshot,
        )
    }

    fn try_process_entry(&mut self, entry: &SnapshotEntry) -> Result<EntryOutcome> {
        self.summary.add_processed_entry();

        let project = self.env.project.clone();
        let disk_project = entry.disk_project(&project).to_owned();

        write!(
            self.env.stdout,
            "  - source disk: {}",
            entry
                .scope
                .disk_path(&disk_project, &entry.disk)
                .as_str()
                .italic()
        )?;

        let disk = self
            .env
            .locator()
            .resolve(&disk_project, &entry.scope, &entry.disk)
            .context("Couldn't resolve source disk")?;

        writeln!(self.env.stdout)?;

        let spec = SnapshotSpec::new(entry.name.clone(), &disk)
            .with_storage_location(entry.storage_location.clone());

        spec.validate()?;

        write!(
            self.env.stdout,
            "  - creating snapshot: {}",
            entry.name.as_str().italic()
        )?;

        if self.env.dry_run {
            return Ok(EntryOutcome::DryRun);
        }

        let operation = self
            .env
            .gce
            .insert_snapshot(&project, &spec)
            .context("Couldn't create snapshot")?;

        let completed = self
            .env
            .operation_waiter()
            .wait(&project, &operation, "snapshot creation")
            .context("Couldn't create snapshot")?;

        let snapshot = self
            .env
            .gce
            .get_snapshot(&project, &entry.name)
            .context("Couldn't fetch the created snapshot")?;

        Ok(EntryOutcome::Done {
            details: vec![format!(
                "status: {}",
                format!("{:?}", snapshot.status).to_uppercase()
            )],
            warnings: completed.warnings,
        })
    }
}
