use crate::gce::DiskName;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};

#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disk {
    pub name: DiskName,
    pub self_link: String,

    // The API encodes int64 fields as strings
    #[serde_as(as = "DisplayFromStr")]
    pub size_gb: u64,

    pub status: DiskStatus,
    pub source_snapshot: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiskStatus {
    Creating,
    Restoring,
    Failed,
    Ready,
    Deleting,
    Unavailable,
}
