use crate::gce::*;
use anyhow::{anyhow, Context};
use itertools::Itertools;
use log::debug;
use pathsearch::find_executable_in_path;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Talks to the compute API through the `gcloud` executable, which also takes
/// care of authentication.
pub struct GceProcessClient {
    gcloud: PathBuf,
}

impl GceProcessClient {
    pub fn new(gcloud: impl AsRef<Path>) -> GceResult<Self> {
        let gcloud = gcloud.as_ref();

        if !gcloud.exists() {
            return Err(GceError::Transient(anyhow!(
                "Couldn't find the `gcloud` executable: {}",
                gcloud.display()
            )));
        }

        Ok(Self {
            gcloud: gcloud.into(),
        })
    }

    pub fn find() -> GceResult<Self> {
        let gcloud = find_executable_in_path("gcloud")
            .ok_or_else(|| anyhow!("Couldn't find the `gcloud` executable in your `PATH` - please try specifying exact location with `--gcloud-path`"))?;

        Self::new(gcloud)
    }

    fn execute(&mut self, resource: &str, callback: impl FnOnce(&mut Command)) -> GceResult<String> {
        let mut command = Command::new(&self.gcloud);

        command.arg("compute");
        callback(&mut command);
        command.arg("--format=json");

        debug!(
            "Running: gcloud {}",
            command
                .get_args()
                .map(|arg| arg.to_string_lossy())
                .join(" ")
        );

        let output = command
            .output()
            .context("Couldn't launch the `gcloud` executable")?;

        if output.status.success() {
            let stdout =
                String::from_utf8(output.stdout).context("Couldn't read gcloud's stdout")?;

            Ok(stdout)
        } else {
            let stderr = String::from_utf8(output.stderr)
                .context("Couldn't read gcloud's stderr")?
                .trim()
                .to_string();

            Err(Self::classify(resource, stderr))
        }
    }

    /// Tells missing (or invisible) resources apart from everything else;
    /// only gcloud's own phrasing counts, since stderr echoes resource names
    /// that may contain anything (e.g. `backup-20250403`).
    fn classify(resource: &str, stderr: String) -> GceError {
        const NOT_FOUND: &[&str] = &[
            "was not found",
            "httperror 404",
            "httperror 403",
            "reason: notfound",
            "reason: forbidden",
        ];

        let lowercased = stderr.to_lowercase();
        let cause = anyhow!("gcloud returned a non-zero status code and said: {}", stderr);

        let is_missing_permission = lowercased
            .lines()
            .any(|line| line.contains("required '") && line.contains("' permission"));

        if is_missing_permission || NOT_FOUND.iter().any(|marker| lowercased.contains(marker)) {
            GceError::NotFound {
                resource: resource.into(),
                cause,
            }
        } else {
            GceError::Transient(cause)
        }
    }

    fn parse<T>(out: String) -> GceResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_str(&out)
            .context("Couldn't parse gcloud's stdout")
            .map_err(GceError::Transient)
    }

    /// `--async` requests print either a single operation or a list of them,
    /// depending on the command.
    fn parse_operation(out: String) -> GceResult<Operation> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Operation),
            Many(Vec<Operation>),
        }

        match Self::parse(out)? {
            OneOrMany::One(operation) => Ok(operation),

            OneOrMany::Many(operations) => operations
                .into_iter()
                .next()
                .ok_or_else(|| GceError::Transient(anyhow!("gcloud returned no operation"))),
        }
    }
}

impl GceClient for GceProcessClient {
    fn get_zonal_disk(
        &mut self,
        project: &ProjectId,
        zone: &Zone,
        disk: &DiskName,
    ) -> GceResult<Disk> {
        let resource = format!("disk: projects/{}/zones/{}/disks/{}", project, zone, disk);

        let out = self.execute(&resource, |command| {
            command
                .arg("disks")
                .arg("describe")
                .arg(disk.as_str())
                .arg(format!("--project={}", project))
                .arg(format!("--zone={}", zone));
        })?;

        Self::parse(out)
    }

    fn get_regional_disk(
        &mut self,
        project: &ProjectId,
        region: &Region,
        disk: &DiskName,
    ) -> GceResult<Disk> {
        let resource = format!(
            "disk: projects/{}/regions/{}/disks/{}",
            project, region, disk
        );

        let out = self.execute(&resource, |command| {
            command
                .arg("disks")
                .arg("describe")
                .arg(disk.as_str())
                .arg(format!("--project={}", project))
                .arg(format!("--region={}", region));
        })?;

        Self::parse(out)
    }

    fn insert_snapshot(
        &mut self,
        project: &ProjectId,
        spec: &SnapshotSpec,
    ) -> GceResult<Operation> {
        let resource = format!("source disk: {}", spec.source_disk);

        let out = self.execute(&resource, |command| {
            command
                .arg("snapshots")
                .arg("create")
                .arg(spec.name.as_str())
                .arg(format!("--project={}", project))
                .arg(format!("--source-disk={}", spec.source_disk))
                .arg("--async");

            if let Some(location) = &spec.storage_location {
                command.arg(format!("--storage-location={}", location));
            }
        })?;

        Self::parse_operation(out)
    }

    fn insert_disk(&mut self, project: &ProjectId, spec: &DiskSpec) -> GceResult<Operation> {
        let resource = format!("source snapshot: {}", spec.source_snapshot_link());

        let out = self.execute(&resource, |command| {
            command
                .arg("disks")
                .arg("create")
                .arg(spec.name.as_str())
                .arg(format!("--project={}", project))
                .arg(format!("--source-snapshot={}", spec.source_snapshot_link()))
                .arg("--async");

            match &spec.scope {
                DiskScope::Zonal(zone) => {
                    command.arg(format!("--zone={}", zone));
                }

                DiskScope::Regional(region) => {
                    command
                        .arg(format!("--region={}", region))
                        .arg(format!("--replica-zones={}", spec.replica_zones.iter().join(",")));
                }
            }

            if let Some(disk_type) = spec.disk_type_link(project) {
                command.arg(format!("--type={}", disk_type));
            }

            if let Some(size_gb) = spec.size_gb {
                command.arg(format!("--size={}GB", size_gb));
            }
        })?;

        Self::parse_operation(out)
    }

    fn delete_snapshot(
        &mut self,
        project: &ProjectId,
        snapshot: &SnapshotName,
    ) -> GceResult<Operation> {
        let resource = format!("snapshot: projects/{}/global/snapshots/{}", project, snapshot);

        let out = self.execute(&resource, |command| {
            command
                .arg("snapshots")
                .arg("delete")
                .arg(snapshot.as_str())
                .arg(format!("--project={}", project))
                .arg("--quiet")
                .arg("--async");
        })?;

        Self::parse_operation(out)
    }

    fn get_operation(
        &mut self,
        project: &ProjectId,
        scope: &OperationScope,
        operation: &OperationName,
    ) -> GceResult<Operation> {
        let resource = format!("operation: projects/{}/{}/operations/{}", project, scope, operation);

        let out = self.execute(&resource, |command| {
            command
                .arg("operations")
                .arg("describe")
                .arg(operation.as_str())
                .arg(format!("--project={}", project));

            match scope {
                OperationScope::Zonal(zone) => command.arg(format!("--zone={}", zone)),
                OperationScope::Regional(region) => command.arg(format!("--region={}", region)),
                OperationScope::Global => command.arg("--global"),
            };
        })?;

        Self::parse(out)
    }

    fn get_snapshot(
        &mut self,
        project: &ProjectId,
        snapshot: &SnapshotName,
    ) -> GceResult<Snapshot> {
        let resource = format!("snapshot: projects/{}/global/snapshots/{}", project, snapshot);

        let out = self.execute(&resource, |command| {
            command
                .arg("snapshots")
                .arg("describe")
                .arg(snapshot.as_str())
                .arg(format!("--project={}", project));
        })?;

        Self::parse(out)
    }

    fn list_snapshots(
        &mut self,
        project: &ProjectId,
        filter: Option<&str>,
    ) -> GceResult<Vec<Snapshot>> {
        let resource = format!("project: {}", project);

        let out = self.execute(&resource, |command| {
            command
                .arg("snapshots")
                .arg("list")
                .arg(format!("--project={}", project));

            if let Some(filter) = filter {
                command.arg(format!("--filter={}", filter));
            }
        })?;

        Self::parse(out)
    }
}
