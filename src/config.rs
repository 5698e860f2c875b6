mod disk_entry;
mod snapshot_entry;

pub use self::{disk_entry::*, snapshot_entry::*};

use crate::prelude::*;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    project_id: Option<ProjectId>,

    #[serde(default = "WaitPolicy::operation")]
    wait: WaitPolicy,

    #[serde(default = "WaitPolicy::disk_readiness")]
    disk_readiness: WaitPolicy,

    #[serde(default)]
    snapshots: Vec<SnapshotEntry>,

    #[serde(default)]
    disks: Vec<DiskEntry>,
}

impl Config {
    pub fn load(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();

        let result: Result<_> = (|| {
            let code = fs::read_to_string(file).context("Couldn't read file")?;
            Self::parse(&code)
        })();

        result.with_context(|| format!("Couldn't load configuration from: {}", file.display()))
    }

    pub fn parse(code: &str) -> Result<Self> {
        let this: Self = serde_yaml::from_str(code).context("Couldn't parse file")?;

        this.validate().context("Invalid configuration")?;

        Ok(this)
    }

    fn validate(&self) -> Result<()> {
        for (name, policy) in [("wait", &self.wait), ("disk-readiness", &self.disk_readiness)] {
            if policy.interval().is_zero() {
                bail!("`{}.interval` must be greater than zero", name);
            }
        }

        if let Some(project) = &self.project_id {
            if project.is_blank() {
                bail!("`project-id` must not be empty");
            }
        }

        Ok(())
    }

    /// Project to work on; the one given on the command line wins over the
    /// configured one.
    pub fn project(&self, overridden: Option<&ProjectId>) -> Result<ProjectId> {
        let project = overridden
            .or(self.project_id.as_ref())
            .cloned()
            .ok_or_else(|| {
                anyhow!("No project given - please specify `project-id` in the configuration file or pass `--project-id`")
            })?;

        if project.is_blank() {
            bail!("Project id must not be empty");
        }

        Ok(project)
    }

    pub fn wait(&self) -> WaitPolicy {
        self.wait
    }

    pub fn disk_readiness(&self) -> WaitPolicy {
        self.disk_readiness
    }

    pub fn snapshots(&self) -> &[SnapshotEntry] {
        &self.snapshots
    }

    pub fn disks(&self) -> &[DiskEntry] {
        &self.disks
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: None,
            wait: WaitPolicy::operation(),
            disk_readiness: WaitPolicy::disk_readiness(),
            snapshots: Default::default(),
            disks: Default::default(),
        }
    }
}
