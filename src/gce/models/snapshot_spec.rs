use crate::gce::{DiskRef, GceError, GceResult, SnapshotName};

/// Body of a snapshot-insert request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotSpec {
    pub name: SnapshotName,
    pub source_disk: String,

    /// Cloud Storage multi-region or region where the snapshot is stored;
    /// when missing, the provider picks the one closest to the source disk.
    pub storage_location: Option<String>,
}

impl SnapshotSpec {
    pub fn new(name: SnapshotName, disk: &DiskRef) -> Self {
        Self {
            name,
            source_disk: disk.self_link.clone(),
            storage_location: None,
        }
    }

    pub fn with_storage_location(mut self, location: Option<String>) -> Self {
        self.storage_location = location;
        self
    }

    pub fn validate(&self) -> GceResult<()> {
        if self.name.is_blank() {
            return Err(GceError::validation("snapshot name must not be empty"));
        }

        if self.source_disk.trim().is_empty() {
            return Err(GceError::validation("source disk must not be empty"));
        }

        Ok(())
    }
}
