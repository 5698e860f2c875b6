use crate::prelude::*;
use std::time::Duration;

pub struct Environment<'a> {
    pub stdout: &'a mut dyn Write,
    pub config: &'a Config,
    pub gce: &'a mut dyn GceClient,
    pub clock: Box<dyn Clock>,
    pub cancellation: Cancellation,
    pub project: ProjectId,
    pub dry_run: bool,

    /// Overrides the configured deadline of operation waits
    pub operation_timeout: Option<Duration>,
}

impl<'a> Environment<'a> {
    #[cfg(test)]
    pub fn test(stdout: &'a mut dyn Write, config: &'a Config, gce: &'a mut dyn GceClient) -> Self {
        colored::control::set_override(true);

        Self {
            stdout,
            config,
            gce,
            clock: Box::new(FakeClock::default()),
            cancellation: Cancellation::new(),
            project: ProjectId::new("proj-a"),
            dry_run: false,
            operation_timeout: None,
        }
    }

    pub fn locator(&mut self) -> ResourceLocator<'_> {
        ResourceLocator::new(&mut *self.gce)
    }

    pub fn operation_waiter(&mut self) -> OperationWaiter<'_> {
        let waiter = OperationWaiter::new(
            &mut *self.gce,
            &*self.clock,
            &self.cancellation,
            self.config.wait(),
        );

        match self.operation_timeout {
            Some(timeout) => waiter.with_timeout(Some(timeout)),
            None => waiter,
        }
    }

    pub fn disk_readiness_waiter(&mut self) -> DiskReadinessWaiter<'_> {
        DiskReadinessWaiter::new(
            &mut *self.gce,
            &*self.clock,
            &self.cancellation,
            self.config.disk_readiness(),
        )
    }

    /// Fails once the user asked us to stop (e.g. with Ctrl+C).
    pub fn ensure_not_cancelled(&self) -> Result<()> {
        if self.cancellation.is_cancelled() {
            bail!("Interrupted - remaining entries have been skipped");
        }

        Ok(())
    }
}
