use super::serde::null_to_default;
use crate::gce::{last_segment, SnapshotName};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub name: SnapshotName,
    pub self_link: String,

    #[serde_as(as = "DisplayFromStr")]
    pub disk_size_gb: u64,

    pub creation_timestamp: DateTime<FixedOffset>,
    pub source_disk: Option<String>,
    pub status: SnapshotStatus,

    #[serde(default, deserialize_with = "null_to_default")]
    pub storage_locations: Vec<String>,
}

impl Snapshot {
    /// Name of the disk this snapshot was taken from, if the provider still
    /// knows it.
    pub fn source_disk_name(&self) -> Option<&str> {
        self.source_disk.as_deref().map(last_segment)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotStatus {
    Creating,
    Deleting,
    Failed,
    Ready,
    Uploading,
}
