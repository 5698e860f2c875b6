use crate::gce::*;
use anyhow::anyhow;
use chrono::DateTime;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt;

/// In-memory compute API, with scripted operations.
///
/// Every mutating call starts an operation that reports `PENDING`, then
/// `RUNNING` for [`FakeOperationPlan::running_polls`] polls and finally
/// `DONE`. Resources are created (or deleted) right away, unless the plan
/// says the operation fails.
#[derive(Debug, Default)]
pub struct GceFakeClient {
    disks: BTreeMap<FakeDiskId, FakeDisk>,
    snapshots: BTreeMap<(ProjectId, SnapshotName), Snapshot>,
    operations: HashMap<OperationName, VecDeque<Operation>>,
    plans: VecDeque<FakeOperationPlan>,
    calls: Vec<String>,
    next_operation: usize,
    errors: HashSet<GceFakeError<'static>>,
}

impl GceFakeClient {
    pub fn add_disk(&mut self, project: &str, scope: DiskScope, name: &str) {
        let id = FakeDiskId {
            project: ProjectId::new(project),
            scope,
            name: DiskName::new(name),
        };

        let disk = Disk {
            name: id.name.clone(),
            self_link: id.self_link(),
            size_gb: 10,
            status: DiskStatus::Ready,
            source_snapshot: None,
        };

        self.disks.insert(
            id,
            FakeDisk {
                disk,
                polls_until_ready: 0,
            },
        );
    }

    pub fn add_snapshot(&mut self, project: &str, name: &str, created_at: &str) {
        let snapshot = Snapshot {
            name: SnapshotName::new(name),
            self_link: format!("{}/projects/{}/global/snapshots/{}", API, project, name),
            disk_size_gb: 10,
            creation_timestamp: DateTime::parse_from_rfc3339(created_at).unwrap(),
            source_disk: Some(format!(
                "{}/projects/{}/zones/us-central1-a/disks/source-of-{}",
                API, project, name
            )),
            status: SnapshotStatus::Ready,
            storage_locations: vec!["us".into()],
        };

        self.snapshots
            .insert((ProjectId::new(project), SnapshotName::new(name)), snapshot);
    }

    /// Registers an operation whose polls return `steps` one after another;
    /// the last step is repeated forever.
    pub fn add_operation(&mut self, steps: Vec<Operation>) {
        let name = steps.first().expect("no steps").name.clone();

        self.operations.insert(name, steps.into());
    }

    /// Plans the outcome of the next mutating call.
    pub fn plan(&mut self, plan: FakeOperationPlan) {
        self.plans.push_back(plan);
    }

    pub fn inject_error(&mut self, error: GceFakeError<'static>) {
        self.errors.insert(error);
    }

    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&mut self, call: String) {
        self.calls.push(call);
    }

    fn get_disk(&mut self, project: &ProjectId, scope: DiskScope, name: &DiskName) -> GceResult<Disk> {
        if self.errors.contains(&GceFakeError::OnGetDisk {
            disk: name.as_str(),
        }) {
            return Err(GceError::Transient(anyhow!("InjectedError")));
        }

        let id = FakeDiskId {
            project: project.to_owned(),
            scope,
            name: name.to_owned(),
        };

        let resource = format!("disk: {}", id);

        let disk = self.disks.get_mut(&id).ok_or_else(|| GceError::NotFound {
            resource,
            cause: anyhow!("The resource was not found"),
        })?;

        if disk.polls_until_ready > 0 {
            disk.polls_until_ready -= 1;

            return Ok(Disk {
                status: DiskStatus::Creating,
                ..disk.disk.clone()
            });
        }

        Ok(disk.disk.clone())
    }

    fn start_operation(
        &mut self,
        operation_type: &str,
        scope: OperationScope,
        target_link: String,
        plan: &FakeOperationPlan,
    ) -> Operation {
        self.next_operation += 1;

        let (zone, region) = match &scope {
            OperationScope::Zonal(zone) => (Some(format!("{}/zones/{}", API, zone)), None),
            OperationScope::Regional(region) => (None, Some(format!("{}/regions/{}", API, region))),
            OperationScope::Global => (None, None),
        };

        let pending = Operation {
            name: OperationName::new(format!("operation-{}", self.next_operation)),
            status: OperationStatus::Pending,
            operation_type: Some(operation_type.into()),
            zone,
            region,
            target_link: Some(target_link),
            error: None,
            warnings: Default::default(),
        };

        let mut steps: VecDeque<_> = (0..plan.running_polls)
            .map(|_| Operation {
                status: OperationStatus::Running,
                ..pending.clone()
            })
            .collect();

        steps.push_back(Operation {
            status: OperationStatus::Done,
            error: plan.error.map(|(code, message)| OperationErrors {
                errors: vec![OperationError {
                    code: code.into(),
                    message: message.into(),
                }],
            }),
            warnings: plan.warnings.clone(),
            ..pending.clone()
        });

        self.operations.insert(pending.name.clone(), steps);

        pending
    }
}

impl GceClient for GceFakeClient {
    fn get_zonal_disk(
        &mut self,
        project: &ProjectId,
        zone: &Zone,
        disk: &DiskName,
    ) -> GceResult<Disk> {
        self.record(format!("get_zonal_disk {} {} {}", project, zone, disk));
        self.get_disk(project, DiskScope::Zonal(zone.to_owned()), disk)
    }

    fn get_regional_disk(
        &mut self,
        project: &ProjectId,
        region: &Region,
        disk: &DiskName,
    ) -> GceResult<Disk> {
        self.record(format!("get_regional_disk {} {} {}", project, region, disk));
        self.get_disk(project, DiskScope::Regional(region.to_owned()), disk)
    }

    fn insert_snapshot(
        &mut self,
        project: &ProjectId,
        spec: &SnapshotSpec,
    ) -> GceResult<Operation> {
        self.record(format!("insert_snapshot {} {}", project, spec.name));

        if self.errors.contains(&GceFakeError::OnInsertSnapshot {
            snapshot: spec.name.as_str(),
        }) {
            return Err(GceError::Transient(anyhow!("InjectedError")));
        }

        let source = self
            .disks
            .values()
            .find(|disk| disk.disk.self_link == spec.source_disk)
            .map(|disk| disk.disk.clone())
            .ok_or_else(|| GceError::NotFound {
                resource: format!("source disk: {}", spec.source_disk),
                cause: anyhow!("The resource was not found"),
            })?;

        let key = (project.to_owned(), spec.name.to_owned());
        let target_link = format!("{}/projects/{}/global/snapshots/{}", API, project, spec.name);
        let mut plan = self.plans.pop_front().unwrap_or_default();

        if self.snapshots.contains_key(&key) {
            plan.error = Some((
                "RESOURCE_ALREADY_EXISTS",
                "The resource already exists",
            ));
        }

        if plan.error.is_none() {
            self.snapshots.insert(
                key,
                Snapshot {
                    name: spec.name.to_owned(),
                    self_link: target_link.clone(),
                    disk_size_gb: source.size_gb,
                    creation_timestamp: DateTime::parse_from_rfc3339("1970-01-01T00:00:00+00:00")
                        .unwrap(),
                    source_disk: Some(source.self_link),
                    status: SnapshotStatus::Ready,
                    storage_locations: spec.storage_location.iter().cloned().collect(),
                },
            );
        }

        Ok(self.start_operation("insert", OperationScope::Global, target_link, &plan))
    }

    fn insert_disk(&mut self, project: &ProjectId, spec: &DiskSpec) -> GceResult<Operation> {
        self.record(format!("insert_disk {} {} {}", project, spec.scope.path(), spec.name));

        if self.errors.contains(&GceFakeError::OnInsertDisk {
            disk: spec.name.as_str(),
        }) {
            return Err(GceError::Transient(anyhow!("InjectedError")));
        }

        let snapshot = self
            .snapshots
            .get(&(spec.source_project.to_owned(), spec.source_snapshot.to_owned()))
            .cloned()
            .ok_or_else(|| GceError::NotFound {
                resource: format!("source snapshot: {}", spec.source_snapshot_link()),
                cause: anyhow!("The resource was not found"),
            })?;

        let id = FakeDiskId {
            project: project.to_owned(),
            scope: spec.scope.clone(),
            name: spec.name.to_owned(),
        };

        let target_link = id.self_link();
        let mut plan = self.plans.pop_front().unwrap_or_default();

        if self.disks.contains_key(&id) {
            plan.error = Some((
                "RESOURCE_ALREADY_EXISTS",
                "The resource already exists",
            ));
        }

        let scope = match &spec.scope {
            DiskScope::Zonal(zone) => OperationScope::Zonal(zone.to_owned()),
            DiskScope::Regional(region) => OperationScope::Regional(region.to_owned()),
        };

        if plan.error.is_none() {
            let disk = Disk {
                name: spec.name.to_owned(),
                self_link: target_link.clone(),
                size_gb: spec.size_gb.unwrap_or(snapshot.disk_size_gb),
                status: DiskStatus::Ready,
                source_snapshot: Some(snapshot.self_link),
            };

            self.disks.insert(
                id,
                FakeDisk {
                    disk,
                    polls_until_ready: plan.disk_ready_after,
                },
            );
        }

        Ok(self.start_operation("insert", scope, target_link, &plan))
    }

    fn delete_snapshot(
        &mut self,
        project: &ProjectId,
        snapshot: &SnapshotName,
    ) -> GceResult<Operation> {
        self.record(format!("delete_snapshot {} {}", project, snapshot));

        if self.errors.contains(&GceFakeError::OnDeleteSnapshot {
            snapshot: snapshot.as_str(),
        }) {
            return Err(GceError::Transient(anyhow!("InjectedError")));
        }

        let key = (project.to_owned(), snapshot.to_owned());

        let target_link = self
            .snapshots
            .get(&key)
            .map(|snapshot| snapshot.self_link.clone())
            .ok_or_else(|| GceError::NotFound {
                resource: format!("snapshot: projects/{}/global/snapshots/{}", project, snapshot),
                cause: anyhow!("The resource was not found"),
            })?;

        let plan = self.plans.pop_front().unwrap_or_default();

        if plan.error.is_none() {
            self.snapshots.remove(&key);
        }

        Ok(self.start_operation("delete", OperationScope::Global, target_link, &plan))
    }

    fn get_operation(
        &mut self,
        project: &ProjectId,
        scope: &OperationScope,
        operation: &OperationName,
    ) -> GceResult<Operation> {
        self.record(format!("get_operation {} {} {}", project, scope, operation));

        if self.errors.contains(&GceFakeError::OnGetOperation {
            operation: operation.as_str(),
        }) {
            return Err(GceError::Transient(anyhow!("InjectedError")));
        }

        let steps = self
            .operations
            .get_mut(operation)
            .ok_or_else(|| GceError::NotFound {
                resource: format!("operation: {}", operation),
                cause: anyhow!("The resource was not found"),
            })?;

        if steps.len() > 1 {
            Ok(steps.pop_front().unwrap())
        } else {
            Ok(steps.front().unwrap().clone())
        }
    }

    fn get_snapshot(
        &mut self,
        project: &ProjectId,
        snapshot: &SnapshotName,
    ) -> GceResult<Snapshot> {
        self.record(format!("get_snapshot {} {}", project, snapshot));

        self.snapshots
            .get(&(project.to_owned(), snapshot.to_owned()))
            .cloned()
            .ok_or_else(|| GceError::NotFound {
                resource: format!("snapshot: projects/{}/global/snapshots/{}", project, snapshot),
                cause: anyhow!("The resource was not found"),
            })
    }

    fn list_snapshots(
        &mut self,
        project: &ProjectId,
        filter: Option<&str>,
    ) -> GceResult<Vec<Snapshot>> {
        self.record(format!("list_snapshots {}", project));

        // Only `name=...` filters are understood
        let name = filter.and_then(|filter| filter.strip_prefix("name="));

        let snapshots = self
            .snapshots
            .iter()
            .filter(|((snapshot_project, _), _)| snapshot_project == project)
            .filter(|(_, snapshot)| name.map_or(true, |name| snapshot.name.as_str() == name))
            .map(|(_, snapshot)| snapshot.clone())
            .collect();

        Ok(snapshots)
    }
}

impl fmt::Display for GceFakeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, disk) in &self.disks {
            writeln!(f, "disk {} ({:?})", id, disk.disk.status)?;
        }

        for ((project, name), snapshot) in &self.snapshots {
            write!(f, "snapshot {}/{}", project, name)?;

            if let Some(source) = snapshot.source_disk_name() {
                write!(f, " <- {}", source)?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

const API: &str = "https://www.googleapis.com/compute/v1";

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FakeDiskId {
    project: ProjectId,
    scope: DiskScope,
    name: DiskName,
}

impl FakeDiskId {
    fn self_link(&self) -> String {
        format!("{}/{}", API, self)
    }
}

impl fmt::Display for FakeDiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "projects/{}/{}/disks/{}",
            self.project,
            self.scope.path(),
            self.name
        )
    }
}

#[derive(Clone, Debug)]
struct FakeDisk {
    disk: Disk,
    polls_until_ready: usize,
}

#[derive(Clone, Debug)]
pub struct FakeOperationPlan {
    pub running_polls: usize,
    pub error: Option<(&'static str, &'static str)>,
    pub warnings: Vec<OperationWarning>,
    pub disk_ready_after: usize,
}

impl Default for FakeOperationPlan {
    fn default() -> Self {
        Self {
            running_polls: 1,
            error: None,
            warnings: Default::default(),
            disk_ready_after: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GceFakeError<'a> {
    OnGetDisk { disk: &'a str },
    OnInsertSnapshot { snapshot: &'a str },
    OnInsertDisk { disk: &'a str },
    OnDeleteSnapshot { snapshot: &'a str },
    OnGetOperation { operation: &'a str },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gce::utils::*;
    use indoc::indoc;
    use pretty_assertions as pa;

    fn client() -> GceFakeClient {
        let mut client = GceFakeClient::default();

        client.add_disk("proj-a", zonal("us-central1-a"), "disk-1");
        client.add_disk("proj-a", regional("us-central1"), "disk-2");
        client
    }

    #[test]
    fn get_disk() {
        let mut client = client();

        let disk = client
            .get_zonal_disk(&project("proj-a"), &Zone::new("us-central1-a"), &disk_name("disk-1"))
            .unwrap();

        pa::assert_eq!(
            "https://www.googleapis.com/compute/v1/projects/proj-a/zones/us-central1-a/disks/disk-1",
            disk.self_link
        );

        let err = client
            .get_zonal_disk(&project("proj-a"), &Zone::new("us-central1-a"), &disk_name("disk-2"))
            .unwrap_err();

        pa::assert_eq!(
            "No such disk: projects/proj-a/zones/us-central1-a/disks/disk-2",
            err.to_string()
        );
    }

    #[test]
    fn scripted_operation() {
        let mut client = client();

        client.plan(FakeOperationPlan {
            running_polls: 2,
            ..Default::default()
        });

        let disk = client
            .get_regional_disk(&project("proj-a"), &Region::new("us-central1"), &disk_name("disk-2"))
            .unwrap();

        let op = client
            .insert_snapshot(
                &project("proj-b"),
                &SnapshotSpec {
                    name: snapshot_name("snapshot-1"),
                    source_disk: disk.self_link,
                    storage_location: None,
                },
            )
            .unwrap();

        pa::assert_eq!(OperationStatus::Pending, op.status);
        pa::assert_eq!(OperationScope::Global, op.scope());

        let statuses: Vec<_> = (0..4)
            .map(|_| {
                client
                    .get_operation(&project("proj-b"), &op.scope(), &op.name)
                    .unwrap()
                    .status
            })
            .collect();

        pa::assert_eq!(
            vec![
                OperationStatus::Running,
                OperationStatus::Running,
                OperationStatus::Done,
                OperationStatus::Done,
            ],
            statuses
        );

        pa::assert_eq!(
            indoc!(
                "
                disk projects/proj-a/zones/us-central1-a/disks/disk-1 (Ready)
                disk projects/proj-a/regions/us-central1/disks/disk-2 (Ready)
                snapshot proj-b/snapshot-1 <- disk-2
                "
            ),
            client.to_string()
        );
    }

    #[test]
    fn list_snapshots() {
        let mut client = GceFakeClient::default();

        client.add_snapshot("proj-a", "snapshot-1", "2000-01-01T12:00:00+00:00");
        client.add_snapshot("proj-a", "snapshot-2", "2000-01-02T12:00:00+00:00");
        client.add_snapshot("proj-b", "snapshot-3", "2000-01-03T12:00:00+00:00");

        let names = |snapshots: Vec<Snapshot>| -> Vec<String> {
            snapshots
                .into_iter()
                .map(|snapshot| snapshot.name.to_string())
                .collect()
        };

        pa::assert_eq!(
            vec!["snapshot-1", "snapshot-2"],
            names(client.list_snapshots(&project("proj-a"), None).unwrap())
        );

        pa::assert_eq!(
            vec!["snapshot-2"],
            names(
                client
                    .list_snapshots(&project("proj-a"), Some("name=snapshot-2"))
                    .unwrap()
            )
        );
    }
}
