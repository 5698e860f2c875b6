mod disk;
mod disk_ref;
mod disk_scope;
mod disk_spec;
mod names;
mod operation;
mod serde;
mod snapshot;
mod snapshot_spec;

pub use self::{
    disk::*, disk_ref::*, disk_scope::*, disk_spec::*, names::*, operation::*, snapshot::*,
    snapshot_spec::*,
};

/// Returns the last segment of a resource link, e.g. `disk-1` for
/// `https://.../zones/us-central1-a/disks/disk-1`.
pub fn last_segment(link: &str) -> &str {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(link)
}
