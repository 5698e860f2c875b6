mod create_snapshots;
mod delete_snapshots;
mod list_snapshots;
mod restore_disks;
mod validate;

pub use self::{
    create_snapshots::*, delete_snapshots::*, list_snapshots::*, restore_disks::*, validate::*,
};

use crate::prelude::*;

/// What happened to a single configuration entry.
enum EntryOutcome {
    Done {
        details: Vec<String>,
        warnings: Vec<OperationWarning>,
    },

    DryRun,
}

/// Prints an entry's outcome right after its last step, updating the summary
/// along the way; `on_done` records the entry's success in the summary.
fn report_entry(
    stdout: &mut dyn Write,
    summary: &mut Summary,
    result: Result<EntryOutcome>,
    on_done: fn(&mut Summary),
) -> Result<()> {
    match result {
        Ok(EntryOutcome::Done { details, warnings }) => {
            on_done(summary);
            summary.add_warnings(warnings.len());

            writeln!(stdout, " {}", "[ OK ]".green())?;

            for detail in details {
                writeln!(stdout, "    {}", detail)?;
            }

            for warning in warnings {
                writeln!(stdout, "    {} {}", "warning:".yellow(), warning)?;
            }
        }

        Ok(EntryOutcome::DryRun) => {
            summary.add_skipped_entry();

            writeln!(stdout, " {}", "[ DRY RUN ]".yellow())?;
        }

        Err(err) => {
            summary.add_error();

            writeln!(stdout, " {}", "[ FAILED ]".red())?;
            writeln!(stdout)?;

            let is_transient = err
                .downcast_ref::<GceError>()
                .map_or(false, GceError::is_transient);

            for line in format!("{:?}", err).lines() {
                writeln!(stdout, "  {}", line)?;
            }

            if is_transient {
                writeln!(stdout)?;

                writeln!(
                    stdout,
                    "  {} this looks like a temporary problem - re-running the command might help",
                    "hint:".yellow()
                )?;
            }
        }
    }

    writeln!(stdout)?;

    Ok(())
}
