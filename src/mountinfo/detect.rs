use crate::command::CommandRunner;
use crate::error::ResultOkLogExt;

use super::parser::parse_mount_line;
use super::{Error, Result};

/// Extracts the `workdir` option of the single overlay mount.
///
/// This is the lenient form of [`try_extract_overlay_workdir`]: every failure
/// is logged at debug level and reported as `None`.
///
/// # Arguments
///
/// * `runner` - Runs the mount listing command.
/// * `argv` - Mount listing restricted to overlay mounts, e.g. `mount -t overlay`.
pub fn extract_overlay_workdir<R: CommandRunner>(runner: &R, argv: &[String]) -> Option<String> {
    try_extract_overlay_workdir(runner, argv).ok_log_at(log::Level::Debug)
}

/// Extracts the `workdir` option of the single overlay mount.
///
/// The listing must contain exactly one line. Zero or several overlay mounts
/// are an ambiguous signal and never guessed from.
///
/// # Errors
///
/// - [`Error::Command`] if the listing command cannot be run or exits non-zero.
/// - [`Error::MissingOverlayMount`] if the listing is empty.
/// - [`Error::AmbiguousOverlayMounts`] if the listing has more than one line.
/// - [`Error::Parse`] if the line has no option list.
/// - [`Error::MissingWorkdir`] if no `workdir=` option is present.
pub fn try_extract_overlay_workdir<R: CommandRunner>(
    runner: &R,
    argv: &[String],
) -> Result<String> {
    let output = runner.run_checked(argv)?;
    let stdout = output.stdout_lossy();
    let stdout = stdout.trim();
    if stdout.is_empty() {
        return Err(Error::MissingOverlayMount);
    }

    let mut lines = stdout.lines();
    let (Some(line), None) = (lines.next(), lines.next()) else {
        return Err(Error::AmbiguousOverlayMounts {
            count: stdout.lines().count(),
        });
    };

    let entry = parse_mount_line(line)?;
    let workdir = entry.workdir().ok_or(Error::MissingWorkdir)?;
    log::debug!(
        "Found overlay mount at `{}` with workdir `{workdir}`",
        entry.mount_point.unwrap_or("?")
    );

    Ok(workdir.to_owned())
}
