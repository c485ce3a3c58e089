use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

mod error;

pub use error::{Error, Result};

/// The maximum allowed length for a [`ContainerID`].
const CONTAINER_ID_MAX_LEN: usize = 255;

/// An opaque container identifier.
///
/// The empty ID is a valid value and means "not in a container" or "unknown".
/// Absence is carried by the value itself rather than an `Option`, so IDs
/// compare and propagate uniformly.
///
/// # Examples
///
/// ```
/// # use docker_image_hook::container::ContainerID;
/// let id = ContainerID::new("147ed436a89f").unwrap();
/// assert_eq!(id.as_ref(), "147ed436a89f");
/// assert!(ContainerID::empty().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerID(Arc<str>);

impl ContainerID {
    /// Creates a new `ContainerID` from the given raw id.
    ///
    /// Surrounding whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidContainerID`] if the trimmed input exceeds
    /// [`CONTAINER_ID_MAX_LEN`] or contains inner whitespace.
    pub fn new(src: impl AsRef<str>) -> Result<Self> {
        let src = src.as_ref().trim();
        if src.len() > CONTAINER_ID_MAX_LEN || src.contains(char::is_whitespace) {
            return Err(Error::InvalidContainerID(src.to_owned()));
        }

        Ok(Self(src.into()))
    }

    /// The "no container" sentinel.
    pub fn empty() -> Self {
        Self("".into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl Default for ContainerID {
    fn default() -> Self {
        Self::empty()
    }
}

impl AsRef<str> for ContainerID {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContainerID {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata of one container as printed by the inspect command.
///
/// Only `GraphDriver.Data.WorkDir` is interpreted on decode; every other field
/// is kept as opaque JSON. The mounts are decoded on demand by
/// [`ContainerRecord::mounts`].
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerRecord {
    #[serde(rename = "GraphDriver", default, deserialize_with = "work_dir_only")]
    work_dir: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reads `Data.WorkDir` out of an arbitrary `GraphDriver` value.
///
/// A missing key or a non-string value at any level reads as "no work directory".
fn work_dir_only<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let graph_driver = serde_json::Value::deserialize(deserializer)?;
    Ok(graph_driver
        .pointer("/Data/WorkDir")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned))
}

/// A bind mount or volume of a container.
#[derive(Debug, Clone, Deserialize)]
pub struct MountPoint {
    /// Path on the host.
    #[serde(rename = "Source")]
    pub source: String,
    /// Path inside the container.
    #[serde(rename = "Destination")]
    pub destination: String,
}

impl ContainerRecord {
    /// Decodes inspect output, which must be a JSON array holding exactly one object.
    ///
    /// # Errors
    ///
    /// - [`Error::Decode`] if the output is not a JSON array of objects.
    /// - [`Error::RecordCount`] if the array does not hold exactly one record.
    pub fn from_inspect_output(id: &ContainerID, output: &[u8]) -> Result<Self> {
        let mut records: Vec<ContainerRecord> =
            serde_json::from_slice(output).map_err(|source| Error::Decode {
                id: id.to_string(),
                source,
            })?;

        if records.len() != 1 {
            return Err(Error::RecordCount {
                id: id.to_string(),
                count: records.len(),
            });
        }

        Ok(records.swap_remove(0))
    }

    /// Returns `GraphDriver.Data.WorkDir`, if present.
    pub fn work_dir(&self) -> Option<&str> {
        self.work_dir.as_deref()
    }

    /// Returns the `Id` field, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.extra.get("Id").and_then(serde_json::Value::as_str)
    }

    /// Decodes the `Mounts` field.
    ///
    /// Entries without a string `Source` and `Destination` are skipped.
    pub fn mounts(&self) -> Vec<MountPoint> {
        let Some(mounts) = self.extra.get("Mounts").and_then(serde_json::Value::as_array) else {
            return Vec::new();
        };

        mounts
            .iter()
            .filter_map(|mount| {
                MountPoint::deserialize(mount)
                    .map_err(|err| log::debug!("Skipping mount {mount}: {err}"))
                    .ok()
            })
            .collect()
    }

    /// Maps a path inside this container to the corresponding host path.
    ///
    /// The first mount whose destination is a component-wise prefix of `path`
    /// wins. Returns `None` if no mount covers `path`.
    pub fn host_path(&self, path: &Path) -> Option<PathBuf> {
        self.mounts().into_iter().find_map(|mount| {
            if mount.destination.is_empty() || mount.source.is_empty() {
                return None;
            }
            let rest = path.strip_prefix(&mount.destination).ok()?;
            if rest.as_os_str().is_empty() {
                Some(PathBuf::from(&mount.source))
            } else {
                Some(Path::new(&mount.source).join(rest))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSPECT: &str = r#"[
        {
            "Id": "147ed436a89f0000",
            "Name": "/hook",
            "GraphDriver": {
                "Data": {
                    "LowerDir": "/var/lib/docker/overlay2/abc-init/diff",
                    "MergedDir": "/var/lib/docker/overlay2/abc/merged",
                    "UpperDir": "/var/lib/docker/overlay2/abc/diff",
                    "WorkDir": "/var/lib/docker/overlay2/abc/work"
                },
                "Name": "overlay2"
            },
            "Mounts": [
                {"Type": "bind", "Source": "/home/user/project", "Destination": "/src", "RW": true},
                {"Type": "bind", "Source": "/var/run/docker.sock", "Destination": "/var/run/docker.sock"}
            ]
        }
    ]"#;

    fn id(raw: &str) -> ContainerID {
        ContainerID::new(raw).unwrap()
    }

    #[test]
    fn test_container_id_trims_and_validates() {
        assert_eq!(id(" abc\n").as_ref(), "abc");
        assert!(ContainerID::new("a b").is_err());
        assert!(ContainerID::new("a".repeat(CONTAINER_ID_MAX_LEN + 1)).is_err());
        assert!(id("").is_empty());
        assert_eq!(ContainerID::default(), ContainerID::empty());
    }

    #[test]
    fn test_decode_single_record() {
        let record = ContainerRecord::from_inspect_output(&id("147ed436a89f"), INSPECT.as_bytes())
            .unwrap();
        assert_eq!(record.work_dir(), Some("/var/lib/docker/overlay2/abc/work"));
        assert_eq!(record.id(), Some("147ed436a89f0000"));
        assert_eq!(
            record.extra.get("Name").and_then(|v| v.as_str()),
            Some("/hook")
        );
    }

    #[test]
    fn test_decode_rejects_empty_and_multiple() {
        let err = ContainerRecord::from_inspect_output(&id("a"), b"[]").unwrap_err();
        assert!(matches!(err, Error::RecordCount { count: 0, .. }));

        let err = ContainerRecord::from_inspect_output(&id("a"), b"[{}, {}]").unwrap_err();
        assert!(matches!(err, Error::RecordCount { count: 2, .. }));
    }

    #[test]
    fn test_decode_rejects_malformed() {
        let err = ContainerRecord::from_inspect_output(&id("a"), b"").unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));

        let err = ContainerRecord::from_inspect_output(&id("a"), br#"{"Id": "a"}"#).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }

    #[test]
    fn test_work_dir_missing_or_null() {
        let record = ContainerRecord::from_inspect_output(&id("a"), b"[{}]").unwrap();
        assert_eq!(record.work_dir(), None);

        let record =
            ContainerRecord::from_inspect_output(&id("a"), br#"[{"GraphDriver": {"Data": null}}]"#)
                .unwrap();
        assert_eq!(record.work_dir(), None);
    }

    #[test]
    fn test_host_path() {
        let record = ContainerRecord::from_inspect_output(&id("a"), INSPECT.as_bytes()).unwrap();
        assert_eq!(
            record.host_path(Path::new("/src")),
            Some(PathBuf::from("/home/user/project"))
        );
        assert_eq!(
            record.host_path(Path::new("/src/sub/dir")),
            Some(PathBuf::from("/home/user/project/sub/dir"))
        );
        assert_eq!(record.host_path(Path::new("/srcfoo")), None);
        assert_eq!(record.host_path(Path::new("/tmp")), None);
    }

    #[test]
    fn test_host_path_without_mounts() {
        let record =
            ContainerRecord::from_inspect_output(&id("a"), br#"[{"Mounts": null}]"#).unwrap();
        assert_eq!(record.host_path(Path::new("/src")), None);
    }

    #[test]
    fn test_unexpected_field_types_are_opaque() {
        let record = ContainerRecord::from_inspect_output(
            &id("a"),
            br#"[{"Id": 1, "GraphDriver": {"Name": 2, "Data": {"WorkDir": "/w"}}, "Mounts": 3}]"#,
        )
        .unwrap();
        assert_eq!(record.work_dir(), Some("/w"));
        assert_eq!(record.id(), None);
        assert!(record.mounts().is_empty());
    }

    #[test]
    fn test_non_string_work_dir_is_absent() {
        let record = ContainerRecord::from_inspect_output(
            &id("a"),
            br#"[{"GraphDriver": {"Data": {"WorkDir": 7}}}]"#,
        )
        .unwrap();
        assert_eq!(record.work_dir(), None);

        let record =
            ContainerRecord::from_inspect_output(&id("a"), br#"[{"GraphDriver": "overlay2"}]"#)
                .unwrap();
        assert_eq!(record.work_dir(), None);
    }

    #[test]
    fn test_host_path_skips_malformed_mounts() {
        let record = ContainerRecord::from_inspect_output(
            &id("a"),
            br#"[{"Mounts": [
                {"Source": null, "Destination": "/src"},
                {"Source": "/home/user/project", "Destination": "/src"}
            ]}]"#,
        )
        .unwrap();
        assert_eq!(record.mounts().len(), 1);
        assert_eq!(
            record.host_path(Path::new("/src/app")),
            Some(PathBuf::from("/home/user/project/app"))
        );
    }
}
