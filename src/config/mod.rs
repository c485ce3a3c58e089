//! Paths and command lines consulted by the detectors.
//!
//! Every location the detectors read from or execute is a field of [`Config`],
//! so tests and unusual hosts can redirect them without touching any global state.
use std::ffi::OsString;
use std::path::PathBuf;

mod error;

pub use error::{Error, Result};

pub const SCHED_PATH_VAR: &str = "DOCKER_IMAGE_HOOK_SCHED_PATH";
pub const MARKER_PATH_VAR: &str = "DOCKER_IMAGE_HOOK_MARKER_PATH";
pub const CGROUP_PATH_VAR: &str = "DOCKER_IMAGE_HOOK_CGROUP_PATH";
pub const MOUNT_CMD_VAR: &str = "DOCKER_IMAGE_HOOK_MOUNT_CMD";
pub const PS_CMD_VAR: &str = "DOCKER_IMAGE_HOOK_PS_CMD";
pub const INSPECT_CMD_VAR: &str = "DOCKER_IMAGE_HOOK_INSPECT_CMD";
pub const DOCKER_CMD_VAR: &str = "DOCKER_IMAGE_HOOK_DOCKER_CMD";
pub const STRICT_VAR: &str = "DOCKER_IMAGE_HOOK_STRICT";

/// Detector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheduler status file of PID 1.
    pub sched_path: PathBuf,
    /// Marker file created by the container engine in every container.
    pub marker_path: PathBuf,
    /// Cgroup membership file of PID 1.
    pub cgroup_path: PathBuf,
    /// Lists overlay mounts, one per line, in `mount` output format.
    pub overlay_mount_cmd: Vec<String>,
    /// Lists running container IDs, one per line.
    pub inventory_cmd: Vec<String>,
    /// Prints the metadata of one container; the container ID is appended.
    pub inspect_cmd: Vec<String>,
    /// The container engine CLI used to build the wrapped `run` command.
    pub docker_cmd: Vec<String>,
    /// Treat failure to identify the own container as fatal.
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sched_path: PathBuf::from("/proc/1/sched"),
            marker_path: PathBuf::from("/.dockerenv"),
            cgroup_path: PathBuf::from("/proc/1/cgroup"),
            overlay_mount_cmd: crate::command::argv(["mount", "-t", "overlay"]),
            inventory_cmd: crate::command::argv(["docker", "ps", "--format", "{{ .ID }}"]),
            inspect_cmd: crate::command::argv(["docker", "inspect"]),
            docker_cmd: crate::command::argv(["docker"]),
            strict: false,
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var_os(var))
    }

    /// Builds the configuration from the defaults, overridden by any variable
    /// `lookup` returns a value for.
    ///
    /// Paths are taken verbatim. Commands are JSON arrays of strings, e.g.
    /// `["docker", "ps", "--format", "{{ .ID }}"]`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCommand`] if a command variable is not a JSON string array.
    /// - [`Error::EmptyCommand`] if a command variable is an empty array.
    /// - [`Error::NotUnicode`] if a command or boolean variable is not UTF-8.
    /// - [`Error::InvalidBool`] if the strict flag is not a recognized boolean.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(SCHED_PATH_VAR) {
            config.sched_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(MARKER_PATH_VAR) {
            config.marker_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(CGROUP_PATH_VAR) {
            config.cgroup_path = PathBuf::from(path);
        }

        let commands = [
            (MOUNT_CMD_VAR, &mut config.overlay_mount_cmd),
            (PS_CMD_VAR, &mut config.inventory_cmd),
            (INSPECT_CMD_VAR, &mut config.inspect_cmd),
            (DOCKER_CMD_VAR, &mut config.docker_cmd),
        ];
        for (var, slot) in commands {
            if let Some(raw) = lookup(var) {
                *slot = parse_command(var, &raw)?;
            }
        }

        if let Some(raw) = lookup(STRICT_VAR) {
            config.strict = parse_bool(STRICT_VAR, &raw)?;
        }

        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }
}

fn parse_command(var: &'static str, raw: &OsString) -> Result<Vec<String>> {
    let raw = raw.to_str().ok_or(Error::NotUnicode { var })?;
    let argv: Vec<String> =
        serde_json::from_str(raw).map_err(|source| Error::InvalidCommand { var, source })?;
    if argv.is_empty() {
        return Err(Error::EmptyCommand { var });
    }

    Ok(argv)
}

fn parse_bool(var: &'static str, raw: &OsString) -> Result<bool> {
    let raw = raw.to_str().ok_or(Error::NotUnicode { var })?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::InvalidBool {
            var,
            value: raw.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let vars: HashMap<String, OsString> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.sched_path, PathBuf::from("/proc/1/sched"));
        assert_eq!(config.marker_path, PathBuf::from("/.dockerenv"));
        assert_eq!(
            config.inventory_cmd,
            vec!["docker", "ps", "--format", "{{ .ID }}"]
        );
        assert!(!config.strict);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            (SCHED_PATH_VAR, "/tmp/sched"),
            (MARKER_PATH_VAR, "/tmp/.dockerenv"),
            (INSPECT_CMD_VAR, r#"["podman", "inspect"]"#),
            (STRICT_VAR, "true"),
        ]))
        .unwrap();

        assert_eq!(config.sched_path, PathBuf::from("/tmp/sched"));
        assert_eq!(config.marker_path, PathBuf::from("/tmp/.dockerenv"));
        assert_eq!(config.inspect_cmd, vec!["podman", "inspect"]);
        assert_eq!(config.overlay_mount_cmd, vec!["mount", "-t", "overlay"]);
        assert!(config.strict);
    }

    #[test]
    fn test_invalid_command_json() {
        let err = Config::from_lookup(lookup_from(&[(PS_CMD_VAR, "docker ps")])).unwrap_err();
        assert!(matches!(err, Error::InvalidCommand { var: PS_CMD_VAR, .. }));
    }

    #[test]
    fn test_empty_command() {
        let err = Config::from_lookup(lookup_from(&[(MOUNT_CMD_VAR, "[]")])).unwrap_err();
        assert!(matches!(err, Error::EmptyCommand { var: MOUNT_CMD_VAR }));
    }

    #[test]
    fn test_invalid_bool() {
        let err = Config::from_lookup(lookup_from(&[(STRICT_VAR, "maybe")])).unwrap_err();
        match err {
            Error::InvalidBool { value, .. } => assert_eq!(value, "maybe"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
