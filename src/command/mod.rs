//! Blocking execution of external commands.
//!
//! Every external interaction of the detectors (mount listing, container
//! inventory, container inspection, the wrapped command itself) goes through
//! [`CommandRunner`], so tests can substitute scripted output.
use std::borrow::Cow;
use std::process::Command;

mod error;

pub use error::{Error, Result};

/// Outcome of a command that was started and ran to completion.
///
/// A non-zero exit code is still a `CommandResult`; only failing to start the
/// process at all is reported as [`Error::Spawn`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandResult {
    pub fn new(exit_code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns stdout decoded as UTF-8, replacing invalid sequences.
    pub fn stdout_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Turns a non-zero exit code into [`Error::NonZeroExit`].
    pub fn check(self, argv: &[String]) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }

        Err(Error::NonZeroExit {
            command: argv.join(" "),
            exit_code: self.exit_code,
            stderr: String::from_utf8_lossy(&self.stderr).trim().to_owned(),
        })
    }
}

/// Runs an external command to completion and captures its output.
pub trait CommandRunner {
    /// Runs `argv[0]` with the remaining elements as arguments.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyArgv`] if `argv` is empty.
    /// - [`Error::Spawn`] if the process could not be started or waited on.
    fn run(&self, argv: &[String]) -> Result<CommandResult>;

    /// Runs the command and additionally treats a non-zero exit code as failure.
    ///
    /// # Errors
    ///
    /// Everything [`CommandRunner::run`] returns, plus [`Error::NonZeroExit`].
    fn run_checked(&self, argv: &[String]) -> Result<CommandResult> {
        self.run(argv)?.check(argv)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, argv: &[String]) -> Result<CommandResult> {
        (**self).run(argv)
    }
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, argv: &[String]) -> Result<CommandResult> {
        let (program, args) = argv.split_first().ok_or(Error::EmptyArgv)?;
        log::trace!("Running command: {}", argv.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| Error::Spawn {
                program: program.clone(),
                source,
            })?;

        Ok(CommandResult {
            exit_code: exit_code(&output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Exit code of a finished process; a signal-terminated one reports `128 + signal`.
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Builds an owned argv from string literals.
pub fn argv<I, S>(parts: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    parts.into_iter().map(Into::into).collect()
}
