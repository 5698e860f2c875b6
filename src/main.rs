mod commands;
mod config;
mod environment;
mod gce;
mod locator;
mod utils;
mod waiter;


mod prelude {
    pub use crate::{
        commands::*, config::*, environment::*, gce::*, locator::*, utils::*, waiter::*,
    };
    pub use anyhow::{anyhow, bail, Context, Result};
    pub use colored::Colorize;
    pub use itertools::Itertools;
    pub use serde::Deserialize;
    pub use std::io::Write;

    #[cfg(test)]
    pub use indoc::indoc;

    #[cfg(test)]
    pub use pretty_assertions as pa;
}

use self::prelude::*;
use clap::{Parser, Subcommand};
use env_logger::Env;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::io;
use std::ops::DerefMut;
use std::path::PathBuf;
use std::time::Duration;

/// Compute Engine disk snapshots, automated
#[derive(Debug, Parser)]
#[command(version)]
pub struct Args {
    /// Runs application in a simulated safe-mode without creating, restoring
    /// or deleting anything
    #[arg(short, long, alias = "dry_run")]
    dry_run: bool,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Project to work on; overrides `project-id` from the configuration file
    #[arg(short, long, alias = "project_id")]
    project_id: Option<String>,

    /// By default, gce-snapper tries to locate the `gcloud` executable inside
    /// your PATH variable - when this fails for you, using this parameter you
    /// can provide location of the `gcloud` executable by hand
    #[arg(short, long)]
    gcloud_path: Option<PathBuf>,

    /// How long to wait for each provider operation (e.g. `10m`); overrides
    /// `wait.timeout` from the configuration file
    #[arg(short, long, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    cmd: Command,
}

impl Args {
    fn project_id(&self) -> Option<ProjectId> {
        self.project_id.as_deref().map(ProjectId::new)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Creates a snapshot for each entry of the `snapshots` section
    CreateSnapshots,

    /// Restores a disk for each entry of the `disks` section and waits until
    /// it's ready
    RestoreDisks,

    /// Lists snapshots existing in the project
    ListSnapshots {
        /// Filter passed to the provider as-is, e.g. `name=snapshot-1`
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Deletes snapshots listed in the `snapshots` section
    DeleteSnapshots,

    /// Validates configuration and checks that the source disks exist
    Validate,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let stdout = &mut io::stdout();

    if let Command::Validate = &args.cmd {
        return commands::validate(stdout, args);
    }

    let config = Config::load(&args.config)?;
    let project = config.project(args.project_id().as_ref())?;
    let mut gce = init_gce(&args)?;

    if args.dry_run {
        println!(
            "{} --dry-run is active, no changes will be applied\n",
            "Note:".green(),
        );
    }

    let mut env = Environment {
        stdout,
        config: &config,
        gce: gce.deref_mut(),
        clock: Box::new(SystemClock),
        cancellation: init_cancellation()?,
        project,
        dry_run: args.dry_run,
        operation_timeout: args.timeout,
    };

    match args.cmd {
        Command::CreateSnapshots => CreateSnapshots::new(&mut env).run(),
        Command::RestoreDisks => RestoreDisks::new(&mut env).run(),
        Command::ListSnapshots { filter } => ListSnapshots::new(&mut env, filter).run(),
        Command::DeleteSnapshots => DeleteSnapshots::new(&mut env).run(),
        Command::Validate => unreachable!(),
    }
}

fn init_gce(args: &Args) -> Result<Box<dyn GceClient>> {
    let gce = if let Some(gcloud_path) = &args.gcloud_path {
        GceProcessClient::new(gcloud_path)
    } else {
        GceProcessClient::find()
    };

    let gce = gce.context("Couldn't initialize gcloud client")?;

    Ok(Box::new(gce))
}

/// Ctrl+C (or SIGTERM) stops waiting for the current operation and skips the
/// remaining entries; operations already started on the provider's side keep
/// running.
fn init_cancellation() -> Result<Cancellation> {
    let cancellation = Cancellation::new();

    for signal in [SIGINT, SIGTERM] {
        signal_hook::flag::register(signal, cancellation.flag())
            .context("Couldn't install signal handler")?;
    }

    Ok(cancellation)
}
