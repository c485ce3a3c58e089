//! Runs a command inside a fresh container with the working directory mounted.
//!
//! When the hook itself runs inside a container (docker-in-docker through the
//! host's engine socket), the working directory has to be mounted by its
//! *host* path, since that is what the engine resolves bind mounts against.
//! The own container is identified through [`ContainerContext`] and its mounts
//! are used to translate the path.
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

mod context;
mod error;

pub use context::{ContainerContext, Detector};
pub use error::{Error, Result};

use crate::command::CommandRunner;
use crate::config::Config;

/// Mount point of the working directory inside the wrapped container.
const CONTAINER_WORKDIR: &str = "/src";

/// Builds and runs the wrapped container command.
#[derive(Debug, Clone)]
pub struct HookRunner<C, R> {
    context: C,
    runner: R,
    docker_cmd: Vec<String>,
    user: Option<String>,
    strict: bool,
}

impl<C: ContainerContext, R: CommandRunner> HookRunner<C, R> {
    pub fn new(context: C, runner: R, config: &Config) -> Self {
        Self {
            context,
            runner,
            docker_cmd: config.docker_cmd.clone(),
            user: Some(current_user()),
            strict: config.strict,
        }
    }

    /// Overrides the `uid:gid` the wrapped container runs as; `None` omits `-u`.
    pub fn with_user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    /// Translates `path` inside the own container to the corresponding host path.
    ///
    /// Outside a container, when the own container cannot be inspected, or when
    /// no mount covers `path`, the path is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolve`] in strict mode if the own container cannot be
    /// identified. In lenient mode this never fails.
    pub fn host_path(&self, path: &Path) -> Result<PathBuf> {
        if !self.context.is_in_container() {
            return Ok(path.to_path_buf());
        }

        let resolution = self.context.resolve_container();
        let id = if self.strict {
            resolution.into_strict()?
        } else {
            resolution.into_lenient()
        };
        if id.is_empty() {
            log::debug!("Own container unknown, mounting `{}` as is", path.display());
            return Ok(path.to_path_buf());
        }

        let Some(record) = self.context.inspect_container(&id) else {
            log::debug!("Own container `{id}` is not visible to the engine");
            return Ok(path.to_path_buf());
        };

        match record.host_path(path) {
            Some(host) => {
                log::debug!("Mapped `{}` to host path `{}`", path.display(), host.display());
                Ok(host)
            }
            None => {
                log::debug!("No mount of container `{id}` covers `{}`", path.display());
                Ok(path.to_path_buf())
            }
        }
    }

    /// Builds the container run command that mounts `cwd` at `/src`.
    ///
    /// # Errors
    ///
    /// See [`HookRunner::host_path`].
    pub fn docker_cmd(&self, cwd: &Path) -> Result<Vec<String>> {
        let mut cmd = self.docker_cmd.clone();
        cmd.extend(["run".to_owned(), "--rm".to_owned()]);
        if let Some(user) = &self.user {
            cmd.extend(["-u".to_owned(), user.clone()]);
        }

        let host_cwd = self.host_path(cwd)?;
        cmd.extend([
            "-v".to_owned(),
            format!("{}:{CONTAINER_WORKDIR}:rw,Z", host_cwd.display()),
            "--workdir".to_owned(),
            CONTAINER_WORKDIR.to_owned(),
        ]);

        Ok(cmd)
    }

    /// Runs the container command for `cwd` with `args` appended.
    ///
    /// # Errors
    ///
    /// - [`Error::NonUnicodeArg`] if an argument is not valid UTF-8.
    /// - Everything [`HookRunner::docker_cmd`] and [`HookRunner::forward`] return.
    pub fn run<I, O, E>(&self, args: I, cwd: &Path, stdout: &mut O, stderr: &mut E) -> Result<i32>
    where
        I: IntoIterator<Item = OsString>,
        O: Write,
        E: Write,
    {
        let mut argv = self.docker_cmd(cwd)?;
        for arg in args {
            argv.push(arg.into_string().map_err(Error::NonUnicodeArg)?);
        }

        self.forward(&argv, stdout, stderr)
    }

    /// Runs `argv`, copies its output verbatim and returns its exit code.
    ///
    /// A non-zero exit code is not an error; it is returned like any other.
    ///
    /// # Errors
    ///
    /// - [`Error::Command`] if the command cannot be started.
    /// - [`Error::Output`] if writing the captured output fails.
    pub fn forward<O: Write, E: Write>(
        &self,
        argv: &[String],
        stdout: &mut O,
        stderr: &mut E,
    ) -> Result<i32> {
        let result = self.runner.run(argv)?;
        log::debug!("`{}` exited with {}", argv.join(" "), result.exit_code);

        stdout
            .write_all(&result.stdout)
            .and_then(|()| stdout.flush())
            .map_err(Error::Output)?;
        stderr
            .write_all(&result.stderr)
            .and_then(|()| stderr.flush())
            .map_err(Error::Output)?;

        Ok(result.exit_code)
    }
}

/// `uid:gid` of the current process.
fn current_user() -> String {
    format!("{}:{}", nix::unistd::getuid(), nix::unistd::getgid())
}
