//! Docker image hook: runs a command in a fresh container with the current
//! directory mounted, also when invoked from inside a container.
//!
//! The library answers two questions from inside a process, using only
//! observable state:
//!
//! - am I running inside a container ([`environment::ContainmentDetector`])?
//! - which container is hosting me ([`resolver::IdentityResolver`])?
//!
//! Each answer combines several individually unreliable signals (cgroup
//! metadata, PID 1 scheduler status, marker files, the overlay mount table
//! and the container engine inventory) with explicit fallbacks.

use std::ffi::OsString;
use std::io::Write;

use cgroup::CgroupSignals;
use command::SystemCommandRunner;
use config::Config;
use hook::{Detector, HookRunner};

pub mod cgroup;
pub mod command;
pub mod config;
pub mod container;
pub mod environment;
pub mod error;
pub mod fsutil;
pub mod hook;
pub mod inventory;
pub mod mountinfo;
pub mod resolver;

/// Runs the hook with the given arguments and returns the process exit code.
///
/// The configuration is read from the process environment; see [`run_with`].
pub fn run<I, O, E>(args: I, stdout: &mut O, stderr: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    O: Write,
    E: Write,
{
    match Config::from_env() {
        Ok(config) => run_with(&config, args, stdout, stderr),
        Err(err) => report(&hook::Error::from(err), stderr),
    }
}

/// Runs the hook with an explicit configuration and returns the process exit code.
///
/// The wrapped command's stdout and stderr are copied verbatim to `stdout` and
/// `stderr`, and its exit code is returned. If the hook fails before the
/// wrapped command produced an exit code, e.g. because the container engine
/// CLI cannot be started, the error is written to `stderr` and `1` is returned.
pub fn run_with<I, O, E>(config: &Config, args: I, stdout: &mut O, stderr: &mut E) -> i32
where
    I: IntoIterator<Item = OsString>,
    O: Write,
    E: Write,
{
    match try_run(config, args, stdout, stderr) {
        Ok(code) => code,
        Err(err) => report(&err, stderr),
    }
}

fn report<E: Write>(err: &hook::Error, stderr: &mut E) -> i32 {
    log::error!("{err}");
    // Nothing left to report to if stderr itself is gone.
    let _ = writeln!(stderr, "{err}");
    1
}

fn try_run<I, O, E>(config: &Config, args: I, stdout: &mut O, stderr: &mut E) -> hook::Result<i32>
where
    I: IntoIterator<Item = OsString>,
    O: Write,
    E: Write,
{
    let cwd = std::env::current_dir().map_err(hook::Error::CurrentDir)?;
    log::debug!("Working directory: {}", cwd.display());

    let detector = Detector::from_config(
        CgroupSignals::new(&config.cgroup_path),
        SystemCommandRunner,
        config,
    );
    let hook = HookRunner::new(detector, SystemCommandRunner, config);

    hook.run(args, &cwd, stdout, stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Configuration of a plain host: no signal files exist.
    fn host_config(dir: &tempfile::TempDir, docker_cmd: &[&str]) -> Config {
        Config {
            sched_path: dir.path().join("sched"),
            marker_path: dir.path().join(".dockerenv"),
            cgroup_path: dir.path().join("cgroup"),
            docker_cmd: command::argv(docker_cmd.iter().copied()),
            ..Config::default()
        }
    }

    #[test]
    fn test_unstartable_engine_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let config = host_config(&dir, &["/definitely/not/docker"]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let code = run_with(&config, [OsString::from("alpine")], &mut out, &mut err);

        assert_eq!(code, 1);
        assert!(out.is_empty());
        let err = String::from_utf8(err).unwrap();
        assert!(err.contains("/definitely/not/docker"), "{err}");
    }

    #[test]
    fn test_exit_code_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        // `run --rm ...` become positional parameters of the script.
        let config = host_config(&dir, &["sh", "-c", "echo out; echo err >&2; exit 3"]);
        let mut out = Vec::new();
        let mut err = Vec::new();

        let code = run_with(&config, [OsString::from("alpine")], &mut out, &mut err);

        assert_eq!(code, 3);
        assert_eq!(out, b"out\n");
        assert_eq!(err, b"err\n");
    }
}
