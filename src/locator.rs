use crate::gce::*;
use log::debug;

/// Finds disks, dispatching to the zonal or regional lookup depending on the
/// disk's scope.
pub struct ResourceLocator<'a> {
    gce: &'a mut dyn GceClient,
}

impl<'a> ResourceLocator<'a> {
    pub fn new(gce: &'a mut dyn GceClient) -> Self {
        Self { gce }
    }

    /// Resolves a disk into a [`DiskRef`] carrying the provider's
    /// self-link.
    ///
    /// Issues exactly one lookup; failures are returned as they are, without
    /// retrying.
    pub fn resolve(
        &mut self,
        project: &ProjectId,
        scope: &DiskScope,
        disk: &DiskName,
    ) -> GceResult<DiskRef> {
        if project.is_blank() {
            return Err(GceError::validation("project id must not be empty"));
        }

        if disk.is_blank() {
            return Err(GceError::validation("disk name must not be empty"));
        }

        let found = self.disk(project, scope, disk)?;

        let disk = DiskRef {
            project: project.to_owned(),
            scope: scope.to_owned(),
            name: found.name,
            self_link: found.self_link,
        };

        debug!("Resolved {} to: {}", disk, disk.self_link);

        Ok(disk)
    }

    /// Fetches the disk as-is, without validating identifiers first.
    pub fn disk(
        &mut self,
        project: &ProjectId,
        scope: &DiskScope,
        disk: &DiskName,
    ) -> GceResult<Disk> {
        match scope {
            DiskScope::Zonal(zone) => self.gce.get_zonal_disk(project, zone, disk),
            DiskScope::Regional(region) => self.gce.get_regional_disk(project, region, disk),
        }
    }
}
