use crate::prelude::*;
use crate::Args;
use std::collections::HashSet;
use std::ops::DerefMut;

pub fn validate(stdout: &mut dyn Write, args: Args) -> Result<()> {
    let config = load_config(stdout, &args)?;

    writeln!(stdout)?;
    let mut gce = init_gce(stdout, &args)?;

    writeln!(stdout)?;

    let mut env = Environment {
        stdout: &mut *stdout,
        config: &config,
        gce: gce.deref_mut(),
        clock: Box::new(SystemClock),
        cancellation: Cancellation::new(),
        project: config.project(args.project_id().as_ref())?,
        dry_run: true,
        operation_timeout: args.timeout,
    };

    Validate::new(&mut env).run()?;

    writeln!(stdout)?;
    writeln!(stdout, "✓ Everything seems to be fine")?;

    Ok(())
}

fn load_config(stdout: &mut dyn Write, args: &Args) -> Result<Config> {
    writeln!(
        stdout,
        "Loading configuration file: {}",
        args.config.display()
    )?;

    let config = Config::load(&args.config)?;

    writeln!(stdout, ".. [ OK ]")?;

    Ok(config)
}

fn init_gce(stdout: &mut dyn Write, args: &Args) -> Result<Box<dyn GceClient>> {
    writeln!(stdout, "Connecting to gcloud")?;

    let gce = crate::init_gce(args)?;

    writeln!(stdout, ".. [ OK ]")?;

    Ok(gce)
}

/// Checks the configuration against itself and against the provider, without
/// changing anything.
pub struct Validate<'a, 'b> {
    env: &'a mut Environment<'b>,
}

impl<'a, 'b> Validate<'a, 'b> {
    pub fn new(env: &'a mut Environment<'b>) -> Self {
        Self { env }
    }

    pub fn run(mut self) -> Result<()> {
        self.validate_config()?;

        writeln!(self.env.stdout)?;

        self.validate_source_disks()
    }

    fn validate_config(&mut self) -> Result<()> {
        let config = self.env.config;

        writeln!(self.env.stdout, "Validating configuration file")?;
        writeln!(self.env.stdout, "  project: {}", self.env.project)?;

        for (name, policy) in [
            ("operations", config.wait()),
            ("disk readiness", config.disk_readiness()),
        ] {
            writeln!(self.env.stdout, "  {}: {}", name, describe(policy))?;
        }

        let mut snapshots = HashSet::new();

        for entry in config.snapshots() {
            if !snapshots.insert(&entry.name) {
                bail!("Snapshot `{}` is listed more than once", entry.name);
            }
        }

        let mut disks = HashSet::new();

        for entry in config.disks() {
            if !disks.insert((&entry.scope, &entry.name)) {
                bail!(
                    "Disk `{}` in {} is listed more than once",
                    entry.name,
                    entry.scope
                );
            }

            entry.spec(&self.env.project).validate()?;
        }

        if snapshots.is_empty() && disks.is_empty() {
            writeln!(
                self.env.stdout,
                "{} Neither snapshots nor disks are configured",
                "warn:".yellow()
            )?;
        }

        writeln!(self.env.stdout, ".. [ OK ]")?;

        Ok(())
    }

    fn validate_source_disks(&mut self) -> Result<()> {
        let config = self.env.config;
        let mut missing = 0;

        writeln!(self.env.stdout, "Checking source disks")?;

        for entry in config.snapshots() {
            let project = entry.disk_project(&self.env.project).to_owned();

            write!(
                self.env.stdout,
                "  - {}",
                entry
                    .scope
                    .disk_path(&project, &entry.disk)
                    .as_str()
                    .italic()
            )?;

            match self.env.locator().resolve(&project, &entry.scope, &entry.disk) {
                Ok(_) => {
                    writeln!(self.env.stdout, " {}", "[ OK ]".green())?;
                }

                Err(err) => {
                    missing += 1;

                    writeln!(self.env.stdout, " {}", "[ FAILED ]".red())?;
                    writeln!(self.env.stdout, "    {}", err)?;
                }
            }
        }

        if missing > 0 {
            bail!("Couldn't find {} of the source disks", missing);
        }

        writeln!(self.env.stdout, ".. [ OK ]")?;

        Ok(())
    }
}

fn describe(policy: WaitPolicy) -> String {
    let interval = humantime::format_duration(policy.interval());

    match policy.worst_case() {
        Some(worst_case) => format!(
            "polling every {}, giving up after {}",
            interval,
            humantime::format_duration(worst_case)
        ),

        None => format!(
            "polling every {}, {}",
            interval,
            "without any limit (might block forever)".yellow()
        ),
    }
}
