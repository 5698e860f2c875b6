mod clients;
mod error;
mod models;

pub use self::{clients::*, error::*, models::*};

/// Synchronous view of the compute API; one method per remote call.
///
/// Lookups fail with [`GceError::NotFound`] when the resource is absent (or
/// not visible to the caller) and with [`GceError::Transient`] when the call
/// itself didn't go through. Mutating calls return the provider-side
/// [`Operation`] without waiting for it.
pub trait GceClient {
    fn get_zonal_disk(&mut self, project: &ProjectId, zone: &Zone, disk: &DiskName)
        -> GceResult<Disk>;

    fn get_regional_disk(
        &mut self,
        project: &ProjectId,
        region: &Region,
        disk: &DiskName,
    ) -> GceResult<Disk>;

    fn insert_snapshot(&mut self, project: &ProjectId, spec: &SnapshotSpec)
        -> GceResult<Operation>;

    fn insert_disk(&mut self, project: &ProjectId, spec: &DiskSpec) -> GceResult<Operation>;

    fn delete_snapshot(
        &mut self,
        project: &ProjectId,
        snapshot: &SnapshotName,
    ) -> GceResult<Operation>;

    fn get_operation(
        &mut self,
        project: &ProjectId,
        scope: &OperationScope,
        operation: &OperationName,
    ) -> GceResult<Operation>;

    fn get_snapshot(&mut self, project: &ProjectId, snapshot: &SnapshotName)
        -> GceResult<Snapshot>;

    fn list_snapshots(
        &mut self,
        project: &ProjectId,
        filter: Option<&str>,
    ) -> GceResult<Vec<Snapshot>>;
}
