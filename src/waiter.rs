mod cancellation;
mod clock;
mod policy;

pub use self::{cancellation::*, clock::*, policy::*};

use crate::gce::*;
use crate::locator::ResourceLocator;
use log::{debug, error, info, warn};
use std::ops::ControlFlow;

/// Successfully finished operation, along with the warnings it reported (in
/// the order the provider reported them).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completed {
    pub operation: Operation,
    pub warnings: Vec<OperationWarning>,
}

/// Blocks until a provider operation reaches a terminal state.
pub struct OperationWaiter<'a> {
    gce: &'a mut dyn GceClient,
    clock: &'a dyn Clock,
    cancellation: &'a Cancellation,
    policy: WaitPolicy,
}

impl<'a> OperationWaiter<'a> {
    pub fn new(
        gce: &'a mut dyn GceClient,
        clock: &'a dyn Clock,
        cancellation: &'a Cancellation,
        policy: WaitPolicy,
    ) -> Self {
        Self {
            gce,
            clock,
            cancellation,
            policy,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<std::time::Duration>) -> Self {
        self.policy = self.policy.with_timeout(timeout);
        self
    }

    /// Waits for given operation to finish.
    ///
    /// An operation that's already `DONE` is evaluated right away, without
    /// polling the provider; `operation` itself is never modified, so waiting
    /// on it again yields the same outcome.
    ///
    /// # Errors
    ///
    /// - [`GceError::Provider`] when the operation finishes with an error.
    /// - [`GceError::Timeout`] when the policy's deadline or attempt ceiling
    ///   is reached first.
    /// - [`GceError::Cancelled`] when the wait gets cancelled.
    /// - Whatever polling the operation fails with.
    pub fn wait(
        &mut self,
        project: &ProjectId,
        operation: &Operation,
        label: &str,
    ) -> GceResult<Completed> {
        if let ControlFlow::Break(result) = Self::evaluate(operation, label) {
            return result;
        }

        let scope = operation.scope();
        let gce = &mut *self.gce;

        let poller = Poller {
            clock: self.clock,
            cancellation: self.cancellation,
            policy: self.policy,
        };

        poller.run(label, operation.name.as_str(), |attempt| {
            let polled = gce.get_operation(project, &scope, &operation.name)?;

            debug!(
                "{}: operation `{}` is {:?} (attempt {})",
                label, polled.name, polled.status, attempt
            );

            match Self::evaluate(&polled, label) {
                ControlFlow::Break(Ok(completed)) => Ok(ControlFlow::Break(completed)),
                ControlFlow::Break(Err(err)) => Err(err),
                ControlFlow::Continue(()) => Ok(ControlFlow::Continue(())),
            }
        })
    }

    fn evaluate(operation: &Operation, label: &str) -> ControlFlow<GceResult<Completed>> {
        if !operation.is_done() {
            return ControlFlow::Continue(());
        }

        if let Some((code, message)) = operation.failure() {
            error!("Error during {}: [Code: {}]: {}", label, code, message);
            error!("Operation ID: {}", operation.name);

            return ControlFlow::Break(Err(GceError::provider(
                label,
                &operation.name,
                code,
                message,
            )));
        }

        for warning in &operation.warnings {
            warn!("Warning during {}: {}", label, warning);
        }

        ControlFlow::Break(Ok(Completed {
            operation: operation.clone(),
            warnings: operation.warnings.clone(),
        }))
    }
}

/// Blocks until a disk reports `READY`.
pub struct DiskReadinessWaiter<'a> {
    gce: &'a mut dyn GceClient,
    clock: &'a dyn Clock,
    cancellation: &'a Cancellation,
    policy: WaitPolicy,
}

impl<'a> DiskReadinessWaiter<'a> {
    pub fn new(
        gce: &'a mut dyn GceClient,
        clock: &'a dyn Clock,
        cancellation: &'a Cancellation,
        policy: WaitPolicy,
    ) -> Self {
        Self {
            gce,
            clock,
            cancellation,
            policy,
        }
    }

    /// Checks the disk once and then keeps polling it; the initial check
    /// doesn't count towards the policy's attempts.
    pub fn wait(&mut self, project: &ProjectId, scope: &DiskScope, disk: &DiskName) -> GceResult<Disk> {
        const LABEL: &str = "disk readiness";

        let check = |gce: &mut dyn GceClient, attempt: u32| -> GceResult<ControlFlow<Disk>> {
            let found = ResourceLocator::new(gce).disk(project, scope, disk)?;

            debug!("{}: disk `{}` is {:?} (attempt {})", LABEL, disk, found.status, attempt);

            match found.status {
                DiskStatus::Ready => {
                    info!("Disk `{}` is ready", disk);
                    Ok(ControlFlow::Break(found))
                }

                DiskStatus::Failed => Err(GceError::Provider {
                    label: LABEL.into(),
                    operation: disk.to_string(),
                    code: "DISK_FAILED".into(),
                    message: format!("Disk `{}` ended up in the FAILED state", disk),
                }),

                _ => Ok(ControlFlow::Continue(())),
            }
        };

        if let ControlFlow::Break(found) = check(&mut *self.gce, 0)? {
            return Ok(found);
        }

        let gce = &mut *self.gce;

        let poller = Poller {
            clock: self.clock,
            cancellation: self.cancellation,
            policy: self.policy,
        };

        poller
            .run(LABEL, disk.as_str(), |attempt| check(&mut *gce, attempt))
            .map_err(|err| {
                if let GceError::Timeout { .. } = &err {
                    error!("Disk `{}` did not become ready within the timeout period", disk);
                }

                err
            })
    }
}

struct Poller<'a> {
    clock: &'a dyn Clock,
    cancellation: &'a Cancellation,
    policy: WaitPolicy,
}

impl Poller<'_> {
    /// Sleeps and polls until `poll` breaks, the policy runs out or the wait
    /// gets cancelled; the last poll happens exactly at the deadline.
    fn run<T>(
        &self,
        label: &str,
        target: &str,
        mut poll: impl FnMut(u32) -> GceResult<ControlFlow<T>>,
    ) -> GceResult<T> {
        let started = self.clock.now();
        let mut attempts = 0;

        loop {
            let cancelled = || GceError::Cancelled {
                label: label.into(),
                target: target.into(),
            };

            if self.cancellation.is_cancelled() {
                return Err(cancelled());
            }

            let elapsed = self.clock.now() - started;

            let timed_out = || GceError::Timeout {
                label: label.into(),
                target: target.into(),
                elapsed,
            };

            let mut nap = self.policy.interval();

            if let Some(timeout) = self.policy.timeout() {
                if elapsed >= timeout {
                    return Err(timed_out());
                }

                nap = nap.min(timeout - elapsed);
            }

            if let Some(max_attempts) = self.policy.max_attempts {
                if attempts >= max_attempts {
                    return Err(timed_out());
                }
            }

            if !self.clock.sleep(nap, self.cancellation) {
                return Err(cancelled());
            }

            attempts += 1;

            if let ControlFlow::Break(value) = poll(attempts)? {
                return Ok(value);
            }
        }
    }
}
