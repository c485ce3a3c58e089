use super::{Error, Result};
use crate::fsutil;
use std::path::Path;

/// Command names of PID 1 that only show up on a real host.
const HOST_INIT_PREFIXES: [&[u8]; 2] = [b"systemd ", b"init "];

/// Returns true if the scheduler status of PID 1 suggests PID-namespace isolation.
///
/// The first line of `/proc/1/sched` starts with the command name of PID 1.
/// On a host that is `systemd` or `init`; inside a container it is whatever the
/// container was started with (e.g. `docker-init`, `sh`, `python3`).
///
/// # Arguments
///
/// * `path` - Path to the scheduler status file, usually `/proc/1/sched`.
///
/// # Returns
///
/// * `Ok(false)` if the file does not exist or names a host init process.
/// * `Ok(true)` for any other first line.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file exists but cannot be opened or read.
pub fn sched_indicates_container(path: impl AsRef<Path>) -> Result<bool> {
    let Some(line) = fsutil::read_first_line(path)? else {
        return Ok(false);
    };

    Ok(!HOST_INIT_PREFIXES
        .iter()
        .any(|prefix| line.starts_with(prefix)))
}

/// Returns true if the container marker file exists.
///
/// Only existence matters, the content is never read.
///
/// # Errors
///
/// Returns [`Error::ExistenceCheck`] if the existence cannot be determined,
/// e.g. because a parent directory is not searchable.
pub fn marker_file_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();

    path.try_exists().map_err(|source| Error::ExistenceCheck {
        path: path.to_path_buf(),
        source,
    })
}
