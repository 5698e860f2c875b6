use crate::prelude::*;
use prettytable::{row, Table};

pub struct ListSnapshots<'a, 'b> {
    env: &'a mut Environment<'b>,
    filter: Option<String>,
}

impl<'a, 'b> ListSnapshots<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>, filter: Option<String>) -> Self {
        Self { env, filter }
    }

    pub fn run(self) -> Result<()> {
        let snapshots = self
            .env
            .gce
            .list_snapshots(&self.env.project, self.filter.as_deref())
            .context("Couldn't list snapshots")?;

        if snapshots.is_empty() {
            writeln!(self.env.stdout, "{}", "No snapshots found".yellow())?;
            return Ok(());
        }

        let mut table = Table::new();

        table.set_titles(row![
            "Name",
            "Disk size (GB)",
            "Created",
            "Source disk",
            "Status"
        ]);

        for snapshot in snapshots {
            table.add_row(row![
                snapshot.name,
                snapshot.disk_size_gb,
                snapshot.creation_timestamp.format("%Y-%m-%d %H:%M:%S"),
                snapshot.source_disk_name().unwrap_or("-"),
                format!("{:?}", snapshot.status).to_uppercase()
            ]);
        }

        write!(self.env.stdout, "{}", table)?;

        Ok(())
    }
}
