use crate::gce::*;
use serde::Deserialize;
use std::convert::TryFrom;

/// A disk to restore from a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawDiskEntry")]
pub struct DiskEntry {
    pub name: DiskName,
    pub scope: DiskScope,
    pub replica_zones: Vec<Zone>,
    pub source_snapshot: SnapshotName,

    /// Project storing the snapshot, if different from the one the disk is
    /// created in
    pub source_project: Option<ProjectId>,

    pub disk_type: Option<String>,
    pub size_gb: Option<u64>,
}

impl DiskEntry {
    pub fn spec(&self, project: &ProjectId) -> DiskSpec {
        DiskSpec {
            name: self.name.clone(),
            scope: self.scope.clone(),
            source_project: self
                .source_project
                .clone()
                .unwrap_or_else(|| project.to_owned()),
            source_snapshot: self.source_snapshot.clone(),
            disk_type: self.disk_type.clone(),
            size_gb: self.size_gb,
            replica_zones: self.replica_zones.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
struct RawDiskEntry {
    name: DiskName,
    zone: Option<Zone>,
    region: Option<Region>,

    #[serde(default)]
    replica_zones: Vec<Zone>,

    source_snapshot: SnapshotName,
    source_project: Option<ProjectId>,

    #[serde(rename = "type")]
    disk_type: Option<String>,

    size_gb: Option<u64>,
}

impl TryFrom<RawDiskEntry> for DiskEntry {
    type Error = GceError;

    fn try_from(raw: RawDiskEntry) -> GceResult<Self> {
        let this = Self {
            scope: DiskScope::new(raw.zone, raw.region)?,
            name: raw.name,
            replica_zones: raw.replica_zones,
            source_snapshot: raw.source_snapshot,
            source_project: raw.source_project,
            disk_type: raw.disk_type,
            size_gb: raw.size_gb,
        };

        // The project is only known at runtime, so validate with a
        // placeholder; only emptiness and shape matter here
        this.spec(&ProjectId::new("-")).validate()?;

        Ok(this)
    }
}
