use crate::gce::{DiskName, DiskScope, GceError, GceResult, ProjectId, SnapshotName, Zone};

/// Body of a disk-insert request that restores a disk from a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskSpec {
    pub name: DiskName,
    pub scope: DiskScope,
    pub source_project: ProjectId,
    pub source_snapshot: SnapshotName,
    pub disk_type: Option<String>,
    pub size_gb: Option<u64>,
    pub replica_zones: Vec<Zone>,
}

impl DiskSpec {
    pub fn source_snapshot_link(&self) -> String {
        format!(
            "projects/{}/global/snapshots/{}",
            self.source_project, self.source_snapshot
        )
    }

    /// Expands a short disk type (`pd-ssd`) into its resource path; types
    /// that already are paths are passed through.
    pub fn disk_type_link(&self, project: &ProjectId) -> Option<String> {
        let disk_type = self.disk_type.as_deref()?;

        if disk_type.contains('/') {
            return Some(disk_type.into());
        }

        Some(format!(
            "projects/{}/{}/diskTypes/{}",
            project,
            self.scope.path(),
            disk_type
        ))
    }

    pub fn validate(&self) -> GceResult<()> {
        if self.name.is_blank() {
            return Err(GceError::validation("disk name must not be empty"));
        }

        if self.source_project.is_blank() {
            return Err(GceError::validation("source project must not be empty"));
        }

        if self.source_snapshot.is_blank() {
            return Err(GceError::validation("source snapshot must not be empty"));
        }

        if self.size_gb == Some(0) {
            return Err(GceError::validation("disk size must be positive"));
        }

        match &self.scope {
            DiskScope::Zonal(_) if !self.replica_zones.is_empty() => Err(GceError::validation(
                "`replica-zones` can only be set for regional disks",
            )),

            DiskScope::Regional(_) if self.replica_zones.len() != 2 => Err(GceError::validation(
                "regional disks need exactly two `replica-zones`",
            )),

            _ => Ok(()),
        }
    }
}
