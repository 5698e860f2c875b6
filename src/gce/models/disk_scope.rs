use crate::gce::{DiskName, GceError, GceResult, ProjectId, Region, Zone};
use std::fmt;

/// Locality of a disk: zonal disks live in a single zone, regional disks are
/// replicated across zones of a region.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiskScope {
    Zonal(Zone),
    Regional(Region),
}

impl DiskScope {
    /// Builds a scope out of two optional localities, exactly one of which
    /// must be present.
    pub fn new(zone: Option<Zone>, region: Option<Region>) -> GceResult<Self> {
        match (zone, region) {
            (Some(zone), None) => {
                if zone.is_blank() {
                    return Err(GceError::validation("`zone` must not be empty"));
                }

                Ok(Self::Zonal(zone))
            }

            (None, Some(region)) => {
                if region.is_blank() {
                    return Err(GceError::validation("`region` must not be empty"));
                }

                Ok(Self::Regional(region))
            }

            (None, None) => Err(GceError::validation(
                "You need to specify `zone` or `region`",
            )),

            (Some(_), Some(_)) => Err(GceError::validation(
                "You can't set both `zone` and `region`",
            )),
        }
    }

    /// Path segment used in resource paths, e.g. `zones/us-central1-a`.
    pub fn path(&self) -> String {
        match self {
            Self::Zonal(zone) => format!("zones/{}", zone),
            Self::Regional(region) => format!("regions/{}", region),
        }
    }

    /// Resource path of a disk living in this scope, e.g.
    /// `projects/p/zones/us-central1-a/disks/d`.
    pub fn disk_path(&self, project: &ProjectId, disk: &DiskName) -> String {
        format!("projects/{}/{}/disks/{}", project, self.path(), disk)
    }
}

impl fmt::Display for DiskScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Zonal(zone) => write!(f, "zone `{}`", zone),
            Self::Regional(region) => write!(f, "region `{}`", region),
        }
    }
}
