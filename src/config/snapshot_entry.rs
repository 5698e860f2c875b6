use crate::gce::*;
use serde::Deserialize;
use std::convert::TryFrom;

/// A snapshot to create (or delete).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawSnapshotEntry")]
pub struct SnapshotEntry {
    pub name: SnapshotName,
    pub disk: DiskName,
    pub scope: DiskScope,

    /// Project hosting the disk, if different from the one storing the
    /// snapshot
    pub disk_project: Option<ProjectId>,

    pub storage_location: Option<String>,
}

impl SnapshotEntry {
    pub fn disk_project<'a>(&'a self, project: &'a ProjectId) -> &'a ProjectId {
        self.disk_project.as_ref().unwrap_or(project)
    }

    pub fn validate(&self) -> GceResult<()> {
        if self.name.is_blank() {
            return Err(GceError::validation("snapshot name must not be empty"));
        }

        if self.disk.is_blank() {
            return Err(GceError::validation("disk name must not be empty"));
        }

        if self.disk_project.as_ref().map_or(false, ProjectId::is_blank) {
            return Err(GceError::validation("`disk-project` must not be empty"));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
struct RawSnapshotEntry {
    name: SnapshotName,
    disk: DiskName,
    zone: Option<Zone>,
    region: Option<Region>,
    disk_project: Option<ProjectId>,
    storage_location: Option<String>,
}

impl TryFrom<RawSnapshotEntry> for SnapshotEntry {
    type Error = GceError;

    fn try_from(raw: RawSnapshotEntry) -> GceResult<Self> {
        let this = Self {
            scope: DiskScope::new(raw.zone, raw.region)?,
            name: raw.name,
            disk: raw.disk,
            disk_project: raw.disk_project,
            storage_location: raw.storage_location,
        };

        this.validate()?;

        Ok(this)
    }
}
