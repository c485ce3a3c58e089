//! Resolution of the ID of the container hosting this process.
//!
//! Two strategies are combined:
//!
//! 1. The cgroup-derived ID. Fast and authoritative when available.
//! 2. The overlay fallback: read the `workdir` of the root overlay mount and
//!    find the running container whose storage uses that work directory.
//!
//! The second strategy runs only when the first one yields nothing.
mod error;

pub use error::{Error, Result};

use crate::cgroup::{self, BaseSignals};
use crate::command::CommandRunner;
use crate::config::Config;
use crate::container::ContainerID;
use crate::error::ResultOkLogExt;
use crate::inventory::Inventory;
use crate::mountinfo;

/// Outcome of a resolution attempt.
///
/// `Resolved` with an empty ID means no container context was found, which is
/// a normal outcome. `Unresolvable` means a signal failed unexpectedly and no
/// other signal made up for it.
#[derive(Debug)]
pub enum Resolution {
    Resolved(ContainerID),
    Unresolvable(Error),
}

impl Resolution {
    /// Empty-on-failure policy: identification failures are never fatal.
    pub fn into_lenient(self) -> ContainerID {
        match self {
            Resolution::Resolved(id) => id,
            Resolution::Unresolvable(err) => {
                log::warn!("{err}");
                ContainerID::empty()
            }
        }
    }

    /// Fatal-on-failure policy: an empty ID is an error too.
    ///
    /// # Errors
    ///
    /// - [`Error::Unresolved`] if no signal produced an ID.
    /// - The contained error for [`Resolution::Unresolvable`].
    pub fn into_strict(self) -> Result<ContainerID> {
        match self {
            Resolution::Resolved(id) if id.is_empty() => Err(Error::Unresolved),
            Resolution::Resolved(id) => Ok(id),
            Resolution::Unresolvable(err) => Err(err),
        }
    }
}

/// Combines the cgroup-derived ID with the overlay/inventory fallback.
#[derive(Debug, Clone)]
pub struct IdentityResolver<B, R> {
    base: B,
    inventory: Inventory<R>,
    overlay_mount_cmd: Vec<String>,
}

impl<B: BaseSignals, R: CommandRunner> IdentityResolver<B, R> {
    pub fn new(base: B, inventory: Inventory<R>, overlay_mount_cmd: Vec<String>) -> Self {
        Self {
            base,
            inventory,
            overlay_mount_cmd,
        }
    }

    pub fn from_config(base: B, runner: R, config: &Config) -> Self {
        Self::new(
            base,
            Inventory::from_config(runner, config),
            config.overlay_mount_cmd.clone(),
        )
    }

    pub fn inventory(&self) -> &Inventory<R> {
        &self.inventory
    }

    /// The cgroup-derived ID, or the empty ID when none is available.
    ///
    /// Read failures other than "not found" are logged and also yield the empty ID.
    pub fn cgroup_container_id(&self) -> ContainerID {
        self.try_cgroup_container_id()
            .ok_log_at(log::Level::Warn)
            .unwrap_or_default()
    }

    /// The cgroup-derived ID; "not found" is the empty ID, not an error.
    fn try_cgroup_container_id(&self) -> cgroup::Result<ContainerID> {
        match self.base.container_id() {
            Err(err) if err.is_not_found() => {
                log::debug!("{err}");
                Ok(ContainerID::empty())
            }
            other => other,
        }
    }

    /// The ID found by matching the overlay work directory against the inventory.
    pub fn overlay_container_id(&self) -> ContainerID {
        let runner = self.inventory.runner();
        match mountinfo::extract_overlay_workdir(runner, &self.overlay_mount_cmd) {
            Some(workdir) => self.inventory.find_container_by_workdir(&workdir),
            None => ContainerID::empty(),
        }
    }

    /// Resolves the own container ID, keeping failures distinguishable.
    pub fn resolve(&self) -> Resolution {
        let cgroup_err = match self.try_cgroup_container_id() {
            Ok(id) if !id.is_empty() => return Resolution::Resolved(id),
            Ok(_) => None,
            Err(err) => {
                log::warn!("Falling back to overlay matching: {err}");
                Some(err)
            }
        };

        let id = self.overlay_container_id();
        match cgroup_err {
            Some(err) if id.is_empty() => Resolution::Unresolvable(Error::Cgroup(err)),
            _ => Resolution::Resolved(id),
        }
    }

    /// Resolves the own container ID; the empty ID when there is none.
    pub fn resolve_container_id(&self) -> ContainerID {
        self.resolve().into_lenient()
    }
}
