use crate::gce::{DiskName, DiskScope, ProjectId};
use std::fmt;

/// A disk whose existence has been confirmed by the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskRef {
    pub project: ProjectId,
    pub scope: DiskScope,
    pub name: DiskName,

    /// Canonical link returned by the provider; this is what a snapshot's
    /// source pointer refers to.
    pub self_link: String,
}

impl DiskRef {
    pub fn path(&self) -> String {
        self.scope.disk_path(&self.project, &self.name)
    }
}

impl fmt::Display for DiskRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
