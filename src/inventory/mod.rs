//! Container inventory queries through the container engine CLI.
mod error;

pub use error::{Error, Result};

use crate::command::CommandRunner;
use crate::config::Config;
use crate::container::{ContainerID, ContainerRecord};
use crate::error::ResultOkLogExt;

/// Lists and inspects the containers known to the container engine.
#[derive(Debug, Clone)]
pub struct Inventory<R> {
    runner: R,
    list_cmd: Vec<String>,
    inspect_cmd: Vec<String>,
}

impl<R: CommandRunner> Inventory<R> {
    /// Creates an inventory.
    ///
    /// # Arguments
    ///
    /// * `runner` - Executes the engine commands.
    /// * `list_cmd` - Prints the IDs of all running containers, one per line.
    /// * `inspect_cmd` - Prints the metadata of one container; the ID is appended.
    pub fn new(runner: R, list_cmd: Vec<String>, inspect_cmd: Vec<String>) -> Self {
        Self {
            runner,
            list_cmd,
            inspect_cmd,
        }
    }

    pub fn from_config(runner: R, config: &Config) -> Self {
        Self::new(
            runner,
            config.inventory_cmd.clone(),
            config.inspect_cmd.clone(),
        )
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Returns the IDs of all running containers in listing order.
    ///
    /// # Errors
    ///
    /// - [`Error::List`] if the listing command cannot be run or exits non-zero.
    /// - [`Error::Record`] if a listed ID is not a valid [`ContainerID`].
    pub fn list_running(&self) -> Result<Vec<ContainerID>> {
        let output = self.runner.run_checked(&self.list_cmd).map_err(Error::List)?;

        output
            .stdout_lossy()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ContainerID::new(line).map_err(Error::from))
            .collect()
    }

    /// Inspects a single container.
    ///
    /// # Errors
    ///
    /// - [`Error::Inspect`] if the inspect command cannot be run or exits non-zero.
    /// - [`Error::Record`] if the output is not exactly one JSON object.
    pub fn inspect(&self, id: &ContainerID) -> Result<ContainerRecord> {
        let mut argv = self.inspect_cmd.clone();
        argv.push(id.to_string());

        let output = self
            .runner
            .run_checked(&argv)
            .map_err(|source| Error::Inspect {
                id: id.to_string(),
                source,
            })?;

        Ok(ContainerRecord::from_inspect_output(id, &output.stdout)?)
    }

    /// Finds the running container whose storage work directory equals `workdir`.
    ///
    /// This is the lenient form of [`Inventory::try_find_container_by_workdir`]:
    /// any failure is logged at debug level and yields the empty ID.
    pub fn find_container_by_workdir(&self, workdir: &str) -> ContainerID {
        self.try_find_container_by_workdir(workdir)
            .ok_log_at(log::Level::Debug)
            .unwrap_or_default()
    }

    /// Finds the running container whose `GraphDriver.Data.WorkDir` equals `workdir`.
    ///
    /// Containers are inspected in listing order and the first match is
    /// returned without inspecting the rest. No match yields the empty ID, as
    /// does an empty `workdir`.
    ///
    /// A failed inspection aborts the whole scan instead of skipping the
    /// container: a container vanishing mid-scan means the listing is stale.
    ///
    /// # Errors
    ///
    /// Everything [`Inventory::list_running`] and [`Inventory::inspect`] return.
    pub fn try_find_container_by_workdir(&self, workdir: &str) -> Result<ContainerID> {
        if workdir.is_empty() {
            return Ok(ContainerID::empty());
        }

        let ids = self.list_running()?;
        if ids.is_empty() {
            log::debug!("No running containers listed");
            return Ok(ContainerID::empty());
        }

        for id in ids {
            let record = self.inspect(&id)?;
            if record.work_dir() == Some(workdir) {
                log::debug!("Container `{id}` uses workdir `{workdir}`");
                return Ok(id);
            }
        }

        log::debug!("No running container uses workdir `{workdir}`");
        Ok(ContainerID::empty())
    }
}
