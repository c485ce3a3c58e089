use std::path::PathBuf;

use super::checks::{marker_file_exists, sched_indicates_container};
use crate::cgroup::BaseSignals;
use crate::config::Config;

/// Runtime environments the detector distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    /// Running directly on the host.
    Host,
    /// Running inside a container.
    Container,
}

/// Answers "am I inside a container?" from cheap, local-only signals.
///
/// The answer is the OR of three independent signals:
///
/// 1. the base containment heuristic supplied by [`BaseSignals`],
/// 2. the existence of the container marker file,
/// 3. the command name of PID 1 in its scheduler status file.
///
/// Signals are evaluated in that order and the first positive one wins. The order
/// only affects cost, never the result.
#[derive(Debug, Clone)]
pub struct ContainmentDetector<B> {
    base: B,
    sched_path: PathBuf,
    marker_path: PathBuf,
}

impl<B: BaseSignals> ContainmentDetector<B> {
    pub fn new(base: B, sched_path: impl Into<PathBuf>, marker_path: impl Into<PathBuf>) -> Self {
        Self {
            base,
            sched_path: sched_path.into(),
            marker_path: marker_path.into(),
        }
    }

    pub fn from_config(base: B, config: &Config) -> Self {
        Self::new(base, &config.sched_path, &config.marker_path)
    }

    /// Detects whether the current process runs on the host or inside a container.
    ///
    /// All individual errors are logged as warnings and count as a negative signal.
    pub fn detect(&self) -> RuntimeEnvironment {
        if self.base.is_in_container() {
            log::debug!("Base signal reports a container environment");
            return RuntimeEnvironment::Container;
        }

        match marker_file_exists(&self.marker_path) {
            Ok(true) => {
                log::debug!("Found marker file `{}`", self.marker_path.display());
                return RuntimeEnvironment::Container;
            }
            Ok(false) => {}
            Err(err) => log::warn!("Marker file check failed during runtime detection: {err}"),
        }

        match sched_indicates_container(&self.sched_path) {
            Ok(true) => {
                log::debug!(
                    "PID 1 in `{}` is not a host init process",
                    self.sched_path.display()
                );
                return RuntimeEnvironment::Container;
            }
            Ok(false) => {}
            Err(err) => log::warn!("Scheduler check failed during runtime detection: {err}"),
        }

        RuntimeEnvironment::Host
    }

    pub fn is_in_container(&self) -> bool {
        self.detect() == RuntimeEnvironment::Container
    }
}
