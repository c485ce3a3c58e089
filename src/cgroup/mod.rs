//! Container facts derived from the cgroup membership of PID 1.
//!
//! The cgroup file has one line per hierarchy:
//!
//! ```text
//! <hierarchy-id>:<controller-list>:<cgroup-path>
//! ```
//!
//! With cgroup v1 the container engine places every container below a path
//! ending in the container ID, e.g. `4:cpuset:/docker/<id>`. The `cpuset`
//! controller has existed since cgroups were introduced, so its line is used
//! to recover the ID.
use std::path::PathBuf;

use crate::container::ContainerID;
use crate::error::ResultOkLogExt;
use crate::fsutil;

mod error;

pub use error::{Error, Result};

/// Host-level containment and identity heuristics that the detectors build upon.
pub trait BaseSignals {
    /// Cheap containment heuristic. Must not fail; failures read as `false`.
    fn is_in_container(&self) -> bool;

    /// Container ID derived from cgroup metadata.
    ///
    /// # Errors
    ///
    /// Returns an error for which [`Error::is_not_found`] holds when no ID is
    /// available, and other variants for genuine read failures.
    fn container_id(&self) -> Result<ContainerID>;
}

impl<B: BaseSignals + ?Sized> BaseSignals for &B {
    fn is_in_container(&self) -> bool {
        (**self).is_in_container()
    }

    fn container_id(&self) -> Result<ContainerID> {
        (**self).container_id()
    }
}

/// [`BaseSignals`] backed by a cgroup membership file, usually `/proc/1/cgroup`.
#[derive(Debug, Clone)]
pub struct CgroupSignals {
    path: PathBuf,
}

impl CgroupSignals {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(fsutil::read_to_string_if_exists(&self.path)?)
    }
}

impl BaseSignals for CgroupSignals {
    fn is_in_container(&self) -> bool {
        self.read()
            .ok_log_at(log::Level::Warn)
            .flatten()
            .is_some_and(|content| content.contains("docker"))
    }

    fn container_id(&self) -> Result<ContainerID> {
        let not_found = || Error::ContainerIdNotFound {
            path: self.path.clone(),
        };
        let content = self.read()?.ok_or_else(not_found)?;

        let raw = container_id_from_cgroup(&content).ok_or_else(not_found)?;
        let id = ContainerID::new(raw).map_err(|source| Error::InvalidContainerID {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Found container ID `{id}` in `{}`", self.path.display());

        Ok(id)
    }
}

/// Extracts the last path component of the `cpuset` hierarchy line.
fn container_id_from_cgroup(content: &str) -> Option<&str> {
    content.lines().find_map(|line| {
        let mut fields = line.splitn(3, ':');
        let _hierarchy = fields.next()?;
        if fields.next()? != "cpuset" {
            return None;
        }
        let cgroup_path = fields.next()?.trim();
        let id = cgroup_path.rsplit('/').next()?;
        (!id.is_empty()).then_some(id)
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Canned container ID outcome of [`FixedSignals`].
    #[derive(Debug, Clone)]
    pub enum FixedId {
        Id(&'static str),
        NotFound,
        ReadFailure,
    }

    /// [`BaseSignals`] with canned answers.
    #[derive(Debug, Clone)]
    pub struct FixedSignals {
        pub in_container: bool,
        pub id: FixedId,
    }

    impl FixedSignals {
        pub fn new(in_container: bool, id: FixedId) -> Self {
            Self { in_container, id }
        }
    }

    impl BaseSignals for FixedSignals {
        fn is_in_container(&self) -> bool {
            self.in_container
        }

        fn container_id(&self) -> Result<ContainerID> {
            let path = PathBuf::from("/proc/1/cgroup");
            match self.id {
                FixedId::Id(id) => Ok(ContainerID::new(id).expect("valid test id")),
                FixedId::NotFound => Err(Error::ContainerIdNotFound { path }),
                FixedId::ReadFailure => Err(Error::Read(fsutil::FileReadError::Read {
                    path,
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                })),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOCKER_CGROUP: &str = "\
12:hugetlb:/docker/c33988ec7651ebc867cb24755eaf637a6734088bc7eef59d5799293a9e5450f7
11:cpuset:/docker/c33988ec7651ebc867cb24755eaf637a6734088bc7eef59d5799293a9e5450f7
10:memory:/docker/c33988ec7651ebc867cb24755eaf637a6734088bc7eef59d5799293a9e5450f7
1:name=systemd:/docker/c33988ec7651ebc867cb24755eaf637a6734088bc7eef59d5799293a9e5450f7
";

    const HOST_CGROUP: &str = "\
12:hugetlb:/
11:cpuset:/
10:memory:/user.slice/user-1000.slice
1:name=systemd:/init.scope
";

    fn signals_with(content: &str) -> (tempfile::NamedTempFile, CgroupSignals) {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{content}").unwrap();
        let signals = CgroupSignals::new(tmp.path());
        (tmp, signals)
    }

    #[test]
    fn test_container_id_from_docker_cgroup() {
        let (_tmp, signals) = signals_with(DOCKER_CGROUP);
        assert_eq!(
            signals.container_id().unwrap().as_ref(),
            "c33988ec7651ebc867cb24755eaf637a6734088bc7eef59d5799293a9e5450f7"
        );
        assert!(signals.is_in_container());
    }

    #[test]
    fn test_container_id_on_host_is_not_found() {
        let (_tmp, signals) = signals_with(HOST_CGROUP);
        let err = signals.container_id().unwrap_err();
        assert!(err.is_not_found());
        assert!(!signals.is_in_container());
    }

    #[test]
    fn test_container_id_empty_file_is_not_found() {
        let (_tmp, signals) = signals_with("");
        assert!(signals.container_id().unwrap_err().is_not_found());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let signals = CgroupSignals::new(dir.path().join("cgroup"));
        assert!(signals.container_id().unwrap_err().is_not_found());
        assert!(!signals.is_in_container());
    }

    #[test]
    fn test_unreadable_file_is_not_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let signals = CgroupSignals::new(dir.path());
        let err = signals.container_id().unwrap_err();
        assert!(!err.is_not_found());
        assert!(!signals.is_in_container());
    }

    #[test]
    fn test_cgroup_v2_has_no_cpuset_line() {
        assert_eq!(container_id_from_cgroup("0::/\n"), None);
    }
}
