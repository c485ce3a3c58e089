use crate::cgroup::BaseSignals;
use crate::command::CommandRunner;
use crate::config::Config;
use crate::container::{ContainerID, ContainerRecord};
use crate::environment::ContainmentDetector;
use crate::error::ResultOkLogExt;
use crate::resolver::{IdentityResolver, Resolution};

/// What the hook needs to know about the container it may be running in.
pub trait ContainerContext {
    /// Whether the current process runs inside a container.
    fn is_in_container(&self) -> bool;

    /// Resolves the ID of the container hosting the current process.
    fn resolve_container(&self) -> Resolution;

    /// Inspects a container; `None` if it cannot be inspected.
    fn inspect_container(&self, id: &ContainerID) -> Option<ContainerRecord>;
}

impl<C: ContainerContext + ?Sized> ContainerContext for &C {
    fn is_in_container(&self) -> bool {
        (**self).is_in_container()
    }

    fn resolve_container(&self) -> Resolution {
        (**self).resolve_container()
    }

    fn inspect_container(&self, id: &ContainerID) -> Option<ContainerRecord> {
        (**self).inspect_container(id)
    }
}

/// [`ContainerContext`] built from the containment detector and the identity resolver.
#[derive(Debug, Clone)]
pub struct Detector<B, R> {
    containment: ContainmentDetector<B>,
    resolver: IdentityResolver<B, R>,
}

impl<B: BaseSignals + Clone, R: CommandRunner> Detector<B, R> {
    pub fn from_config(base: B, runner: R, config: &Config) -> Self {
        Self {
            containment: ContainmentDetector::from_config(base.clone(), config),
            resolver: IdentityResolver::from_config(base, runner, config),
        }
    }
}

impl<B: BaseSignals, R: CommandRunner> ContainerContext for Detector<B, R> {
    fn is_in_container(&self) -> bool {
        self.containment.is_in_container()
    }

    fn resolve_container(&self) -> Resolution {
        self.resolver.resolve()
    }

    fn inspect_container(&self, id: &ContainerID) -> Option<ContainerRecord> {
        self.resolver
            .inventory()
            .inspect(id)
            .ok_log_at(log::Level::Debug)
    }
}
